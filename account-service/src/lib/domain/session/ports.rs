use async_trait::async_trait;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::AuthenticatedSession;
use crate::domain::session::models::RefreshToken;
use crate::domain::session::models::RefreshedAccess;
use crate::domain::session::models::RegisterCommand;
use crate::domain::user::models::UserId;

/// Port for the authentication state machine.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Verify credentials and open a session.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password,
    ///   indistinguishably
    /// * `Database` - Store operation failed
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedSession, SessionError>;

    /// Register a new identity and open a session for it.
    ///
    /// The new identity is always role USER.
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Username taken, or non-empty email taken
    /// * `Database` - Store operation failed
    async fn register(
        &self,
        command: RegisterCommand,
    ) -> Result<AuthenticatedSession, SessionError>;

    /// Exchange a refresh token for a new access token.
    ///
    /// The refresh token is consumed by lookup only; it is neither rotated
    /// nor extended.
    ///
    /// # Errors
    /// * `InvalidRefreshToken` - No such token
    /// * `RefreshTokenExpired` - Token past expiry (the row is deleted)
    /// * `Database` - Store operation failed
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedAccess, SessionError>;

    /// Revoke the user's refresh token, if any. Idempotent.
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn logout(&self, user_id: &UserId) -> Result<(), SessionError>;
}

/// Persistence operations for refresh tokens.
///
/// The store enforces the one-live-token-per-user invariant; `upsert` must
/// replace atomically so concurrent logins never leave two live rows.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// Insert the token, atomically replacing any existing row for the
    /// same user.
    async fn upsert(&self, token: RefreshToken) -> Result<RefreshToken, SessionError>;

    /// Exact-match lookup by token string.
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, SessionError>;

    /// Delete the user's token if present. No-op when absent.
    async fn delete_by_user(&self, user_id: &UserId) -> Result<(), SessionError>;
}
