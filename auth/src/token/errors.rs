use thiserror::Error;

/// Error type for access-token operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    Encoding(String),

    #[error("Token is structurally malformed")]
    Malformed,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,
}
