use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use serde_json::{Map, Value};
use crate::address::{Address, AddressInput, InputError};
use crate::error::VerifyError;
use crate::smarty::StreetVerifier;
use crate::verify::verify;

pub const NOT_AN_ADDRESS: &str = "must be either an address string or hash.";
pub const NOT_US: &str = "must be a US address.";
pub const NOT_DELIVERABLE: &str = "was not a deliverable address. suggestions:";
pub const UNVALIDATED: &str = "could not be validated as an address.";

/// Why an address was rejected, with any candidates worth offering instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReason {
    pub message: String,
    pub suggestions: Option<Vec<Address>>,
}

impl FailureReason {
    fn new(message: &str) -> Self {
        Self { message: message.to_string(), suggestions: None }
    }

    fn undeliverable(suggestions: Option<Vec<Address>>) -> Self {
        Self { message: NOT_DELIVERABLE.to_string(), suggestions }
    }

    pub fn suggestions(&self) -> &[Address] {
        self.suggestions.as_deref().unwrap_or_default()
    }
}

impl From<InputError> for FailureReason {
    fn from(err: InputError) -> Self {
        match err {
            InputError::Shape => Self::new(NOT_AN_ADDRESS),
            InputError::NotUs => Self::new(NOT_US),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for suggestion in self.suggestions() {
            write!(f, "\n  {}", suggestion)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Clean(Address),
    Rejected(FailureReason),
}

impl Validation {
    pub fn is_clean(&self) -> bool {
        matches!(self, Validation::Clean(_))
    }
}

/// Check a loosely-typed value and verify it as a US address.
///
/// Shape and country problems are reported without contacting the service.
pub async fn validate_address<V: StreetVerifier>(verifier: &V, value: &Value) -> Result<Validation, VerifyError> {
    let input = match AddressInput::from_value(value).and_then(|i| i.check_country().map(|_| i)) {
        Ok(input) => input,
        Err(e) => {
            log::debug!("address rejected before lookup: {:?}", e);
            return Ok(Validation::Rejected(e.into()));
        }
    };

    let outcome = verify(verifier, &input).await?;
    Ok(match outcome.matched {
        Some(address) if outcome.verified => Validation::Clean(address),
        _ => Validation::Rejected(FailureReason::undeliverable(outcome.suggestions)),
    })
}

/// Field hook for a validation framework that wants a boolean per field and
/// asks for the reason separately.
///
/// Pending reasons live here, keyed by field name, and are handed out once.
/// The key is not tied to a container: when one validator serves several
/// containers, read each container's reasons before validating the next, or a
/// later failure on the same field name replaces the earlier one.
pub struct AddressFieldValidator<V> {
    verifier: V,
    failures: RefCell<HashMap<String, FailureReason>>,
}

impl<V: StreetVerifier> AddressFieldValidator<V> {
    pub fn new(verifier: V) -> Self {
        Self {
            verifier,
            failures: RefCell::new(HashMap::new()),
        }
    }

    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    /// Validate `container[field]`, replacing it with the clean address on success.
    ///
    /// On failure the value is left as it was and the reason is kept for
    /// [`Self::reason_for_failure`].
    pub async fn validate_and_clean(&self, container: &mut Map<String, Value>, field: &str) -> Result<bool, VerifyError> {
        let value = container.get(field).cloned().unwrap_or(Value::Null);
        match validate_address(&self.verifier, &value).await? {
            Validation::Clean(address) => {
                let cleaned = address.to_value()?;
                self.failures.borrow_mut().remove(field);
                container.insert(field.to_string(), cleaned);
                Ok(true)
            }
            Validation::Rejected(reason) => {
                log::info!("field [{}] {}", field, reason.message);
                self.failures.borrow_mut().insert(field.to_string(), reason);
                Ok(false)
            }
        }
    }

    /// Take the pending reason for `field`, or a generic one if there is none.
    pub fn reason_for_failure(&self, field: &str) -> FailureReason {
        self.failures.borrow_mut()
            .remove(field)
            .unwrap_or_else(|| FailureReason::new(UNVALIDATED))
    }
}
