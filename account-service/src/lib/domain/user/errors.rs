use auth::PasswordError;
use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for identity-store operations.
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    UserAlreadyExists(String),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(String),
}

impl UserError {
    /// Duplicate-username collision, with the message the API contract uses.
    pub fn username_taken() -> Self {
        UserError::UserAlreadyExists("Username already exists".to_string())
    }

    /// Duplicate-email collision, with the message the API contract uses.
    pub fn email_taken() -> Self {
        UserError::UserAlreadyExists("Email already in use".to_string())
    }
}
