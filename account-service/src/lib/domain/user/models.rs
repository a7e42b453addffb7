use std::fmt;

use auth::Role;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// Represents a registered identity. The username and a non-empty email are
/// unique across live identities; the empty string stands for "no email"
/// and is allowed to repeat.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command for an administrator creating a user with an explicit role.
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Command to update an existing user.
///
/// Optional fields are left unchanged when absent; the role is always
/// applied. An empty password string also means "keep the current one".
#[derive(Debug, Clone)]
pub struct UpdateUserCommand {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Role,
}
