//! Error type shared by parsing and writing

use thiserror::Error;

/// Errors returned at the public `Document` and format boundaries.
///
/// Malformed markup is never an error: the parser degrades it to text. What remains
/// are usage errors, I/O failures and invariant violations caught at the boundary.
#[derive(Debug, Error)]
pub enum OrgError {
    #[error("document has already been parsed")]
    AlreadyParsed,

    #[error("document must be parsed before it can be written")]
    NotParsed,

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not resolve include '{directive}': {reason}")]
    Include { directive: String, reason: String },

    #[error("internal error: {0}")]
    Internal(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("format '{0}' not found")]
    UnknownFormat(String),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl OrgError {
    /// Convert a payload caught by `catch_unwind` into an error.
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        OrgError::Internal(message)
    }
}
