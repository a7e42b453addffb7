use async_trait::async_trait;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Port for administrative user management.
///
/// Every operation here sits behind the ADMIN-gated routes; the HTTP layer
/// enforces the role before any of these run.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Retrieve all users.
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Database` - Store operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Create a user with an explicit role.
    ///
    /// Unlike self-registration this may grant ADMIN.
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Username taken, or non-empty email taken
    /// * `Database` - Store operation failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Update an existing user.
    ///
    /// Uniqueness is re-checked only for fields that actually change.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UserAlreadyExists` - New username or non-empty email taken
    /// * `Database` - Store operation failed
    async fn update_user(&self, id: &UserId, command: UpdateUserCommand)
        -> Result<User, UserError>;

    /// Delete an existing user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Database` - Store operation failed
    async fn delete_user(&self, id: &UserId) -> Result<(), UserError>;
}

/// Persistence operations for the credential store.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Unique constraint violated on username or email
    /// * `Database` - Store operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;

    /// Check whether a username is already taken.
    async fn exists_by_username(&self, username: &str) -> Result<bool, UserError>;

    /// Check whether an email is already taken.
    async fn exists_by_email(&self, email: &str) -> Result<bool, UserError>;

    /// Retrieve all users.
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Update an existing user row.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UserAlreadyExists` - Unique constraint violated on username or email
    /// * `Database` - Store operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Remove a user row.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Database` - Store operation failed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}
