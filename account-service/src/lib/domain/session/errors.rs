use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

use crate::domain::user::errors::UserError;

/// Error for the login / register / refresh / logout flows.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// Unknown username and wrong password collapse into this one variant
    /// so responses cannot be used to enumerate accounts.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("{0}")]
    UserAlreadyExists(String),

    #[error("Refresh token not found in database!")]
    InvalidRefreshToken,

    #[error("Refresh token was expired. Please make a new login request")]
    RefreshTokenExpired,

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<UserError> for SessionError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::UserAlreadyExists(message) => SessionError::UserAlreadyExists(message),
            UserError::Password(e) => SessionError::Password(e),
            // A NotFound out of the credential store is a plumbing fault
            // here; the flows handle missing users explicitly via Option.
            UserError::NotFound(message) => {
                SessionError::Database(format!("User lookup failed: {}", message))
            }
            UserError::Database(message) => SessionError::Database(message),
        }
    }
}
