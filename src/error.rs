use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Infrastructure failures while talking to the verification service.
///
/// An address that simply fails verification is never one of these.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("cannot build smarty client: {0}")]
    Client(#[source] BoxError),
    #[error("cannot queue lookup: {0}")]
    Batch(#[source] BoxError),
    #[error("smarty request failed: {0}")]
    Transport(#[source] BoxError),
    #[error("no lookup returned from smarty")]
    EmptyBatch,
    #[error("cannot encode cleaned address: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("`{0}` environment variable must be set")]
    Missing(&'static str),
    #[error("invalid value for `{name}`: {value}")]
    Invalid { name: &'static str, value: String },
}
