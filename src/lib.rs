//! Validate and clean US mailing addresses through the Smarty US Street API.
//!
//! [`validate_address`] turns a loosely-typed value into either a clean
//! [`Address`] or a [`FailureReason`]. [`AddressFieldValidator`] wraps it for
//! frameworks that ask for a boolean and look the reason up afterwards.

pub mod address;
pub mod config;
pub mod error;
pub mod smarty;
pub mod validator;
pub mod verify;

pub use address::{Address, AddressFields, AddressInput};
pub use config::SmartyConfig;
pub use error::{ConfigError, VerifyError};
pub use smarty::{Candidate, SmartyClient, StreetVerifier};
pub use validator::{validate_address, AddressFieldValidator, FailureReason, Validation};
pub use verify::{verify, VerificationOutcome};
