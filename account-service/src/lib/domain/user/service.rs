use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;

/// Domain service for administrative user management.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with an injected credential store.
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    async fn check_duplicates(&self, username: &str, email: &str) -> Result<(), UserError> {
        if self.repository.exists_by_username(username).await? {
            return Err(UserError::username_taken());
        }
        // Empty emails mark "no email" and are allowed to repeat.
        if !email.is_empty() && self.repository.exists_by_email(email).await? {
            return Err(UserError::email_taken());
        }
        Ok(())
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        self.check_duplicates(&command.username, &command.email)
            .await?;

        let password_hash = self.password_hasher.hash(&command.password)?;
        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            role: command.role,
            created_at: Utc::now(),
        };

        tracing::info!(username = %user.username, role = %user.role, "Admin creating user");
        self.repository.create(user).await
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if let Some(new_username) = command.username {
            if new_username != user.username
                && self.repository.exists_by_username(&new_username).await?
            {
                return Err(UserError::username_taken());
            }
            user.username = new_username;
        }

        if let Some(new_email) = command.email {
            if !new_email.is_empty()
                && new_email != user.email
                && self.repository.exists_by_email(&new_email).await?
            {
                return Err(UserError::email_taken());
            }
            user.email = new_email;
        }

        // An absent or empty password keeps the stored hash.
        if let Some(new_password) = command.password.filter(|p| !p.is_empty()) {
            user.password_hash = self.password_hasher.hash(&new_password)?;
        }

        user.role = command.role;

        tracing::info!(user_id = %user.id, role = %user.role, "Admin updating user");
        self.repository.update(user).await
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "Admin deleted user");
        Ok(())
    }
}
