use std::sync::Arc;

use async_trait::async_trait;
use auth::Role;
use auth::TokenSigner;
use chrono::Duration;
use chrono::Utc;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::AuthenticatedSession;
use crate::domain::session::models::RefreshToken;
use crate::domain::session::models::RefreshedAccess;
use crate::domain::session::models::RegisterCommand;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::session::ports::SessionServicePort;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// Authentication orchestrator.
///
/// Drives login/register against the credential store and the password
/// hasher, and the refresh/logout lifecycle against the refresh-token
/// store. Access tokens come from the injected [`TokenSigner`] so tests can
/// pin a fixed secret.
pub struct SessionService<UR, RR>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    users: Arc<UR>,
    refresh_tokens: Arc<RR>,
    token_signer: Arc<TokenSigner>,
    password_hasher: auth::PasswordHasher,
    refresh_ttl: Duration,
}

impl<UR, RR> SessionService<UR, RR>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    pub fn new(
        users: Arc<UR>,
        refresh_tokens: Arc<RR>,
        token_signer: Arc<TokenSigner>,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            token_signer,
            password_hasher: auth::PasswordHasher::new(),
            refresh_ttl,
        }
    }

    /// Mint the token pair for an authenticated identity.
    ///
    /// The access token is signed first, then the refresh token is stored
    /// with a single atomic replace, so there is no window in which a user
    /// who had a token ends up with none.
    async fn open_session(&self, user: User) -> Result<AuthenticatedSession, SessionError> {
        let access_token = self
            .token_signer
            .issue(&user.username, user.id.0, user.role)?;

        let refresh_token = RefreshToken::issue(user.id, self.refresh_ttl);
        let refresh_token = self.refresh_tokens.upsert(refresh_token).await?;

        Ok(AuthenticatedSession {
            access_token,
            refresh_token: refresh_token.token,
            user,
        })
    }

    /// Return the token untouched, or delete it and fail if past expiry.
    async fn verify_not_expired(&self, token: RefreshToken) -> Result<RefreshToken, SessionError> {
        if token.is_expired_at(Utc::now()) {
            self.refresh_tokens.delete_by_user(&token.user_id).await?;
            return Err(SessionError::RefreshTokenExpired);
        }
        Ok(token)
    }
}

#[async_trait]
impl<UR, RR> SessionServicePort for SessionService<UR, RR>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedSession, SessionError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            tracing::warn!(username, "Login attempt for unknown user");
            return Err(SessionError::InvalidCredentials);
        };

        if !self.password_hasher.verify(password, &user.password_hash) {
            tracing::warn!(username, "Login attempt with bad credentials");
            return Err(SessionError::InvalidCredentials);
        }

        tracing::info!(username, user_id = %user.id, "Login successful");
        self.open_session(user).await
    }

    async fn register(
        &self,
        command: RegisterCommand,
    ) -> Result<AuthenticatedSession, SessionError> {
        if self.users.exists_by_username(&command.username).await? {
            return Err(SessionError::UserAlreadyExists(
                "Username already exists".to_string(),
            ));
        }
        if !command.email.is_empty() && self.users.exists_by_email(&command.email).await? {
            return Err(SessionError::UserAlreadyExists(
                "Email already in use".to_string(),
            ));
        }

        let password_hash = self.password_hasher.hash(&command.password)?;
        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            // Self-registration can never grant ADMIN.
            role: Role::User,
            created_at: Utc::now(),
        };

        let user = self.users.create(user).await?;
        tracing::info!(username = %user.username, user_id = %user.id, "User registered");

        self.open_session(user).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedAccess, SessionError> {
        let Some(token) = self.refresh_tokens.find_by_token(refresh_token).await? else {
            return Err(SessionError::InvalidRefreshToken);
        };

        let token = self.verify_not_expired(token).await?;

        let Some(user) = self.users.find_by_id(&token.user_id).await? else {
            // Owner row is gone; the token is worthless.
            return Err(SessionError::InvalidRefreshToken);
        };

        let access_token = self
            .token_signer
            .issue(&user.username, user.id.0, user.role)?;

        Ok(RefreshedAccess {
            access_token,
            refresh_token: token.token,
        })
    }

    async fn logout(&self, user_id: &UserId) -> Result<(), SessionError> {
        self.refresh_tokens.delete_by_user(user_id).await?;
        tracing::info!(user_id = %user_id, "Logout, refresh token revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use auth::RawToken;
    use mockall::mock;

    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, crate::user::errors::UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, crate::user::errors::UserError>;
            async fn find_by_username(&self, username: &str) -> Result<Option<User>, crate::user::errors::UserError>;
            async fn exists_by_username(&self, username: &str) -> Result<bool, crate::user::errors::UserError>;
            async fn exists_by_email(&self, email: &str) -> Result<bool, crate::user::errors::UserError>;
            async fn list_all(&self) -> Result<Vec<User>, crate::user::errors::UserError>;
            async fn update(&self, user: User) -> Result<User, crate::user::errors::UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), crate::user::errors::UserError>;
        }
    }

    mock! {
        pub TestRefreshTokenRepository {}

        #[async_trait]
        impl RefreshTokenRepository for TestRefreshTokenRepository {
            async fn upsert(&self, token: RefreshToken) -> Result<RefreshToken, SessionError>;
            async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, SessionError>;
            async fn delete_by_user(&self, user_id: &UserId) -> Result<(), SessionError>;
        }
    }

    fn service(
        users: MockTestUserRepository,
        refresh_tokens: MockTestRefreshTokenRepository,
    ) -> SessionService<MockTestUserRepository, MockTestRefreshTokenRepository> {
        SessionService::new(
            Arc::new(users),
            Arc::new(refresh_tokens),
            Arc::new(TokenSigner::new(SECRET, Duration::hours(24))),
            Duration::days(7),
        )
    }

    fn stored_user(password: &str, role: Role) -> User {
        let hasher = auth::PasswordHasher::new();
        User {
            id: UserId::new(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: hasher.hash(password).unwrap(),
            role,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_claims() {
        let mut users = MockTestUserRepository::new();
        let mut refresh_tokens = MockTestRefreshTokenRepository::new();

        let user = stored_user("pw1", Role::User);
        let user_id = user.id;
        users
            .expect_find_by_username()
            .withf(|username| username == "alice")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        refresh_tokens
            .expect_upsert()
            .withf(move |token| token.user_id == user_id)
            .times(1)
            .returning(|token| Ok(token));

        let service = service(users, refresh_tokens);
        let session = service.login("alice", "pw1").await.unwrap();

        let verifier = TokenSigner::new(SECRET, Duration::hours(24));
        let claims = verifier
            .verify(&RawToken::new(session.access_token))
            .unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.user_id, user_id.0);
        assert_eq!(claims.role, Role::User);
        assert!(!session.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn test_login_unknown_user_and_wrong_password_are_identical() {
        let mut users = MockTestUserRepository::new();
        let refresh_tokens = MockTestRefreshTokenRepository::new();

        let user = stored_user("pw1", Role::User);
        users
            .expect_find_by_username()
            .withf(|username| username == "alice")
            .returning(move |_| Ok(Some(user.clone())));
        users
            .expect_find_by_username()
            .withf(|username| username == "nobody")
            .returning(|_| Ok(None));

        let service = service(users, refresh_tokens);

        let wrong_password = service.login("alice", "wrong").await.unwrap_err();
        let unknown_user = service.login("nobody", "pw1").await.unwrap_err();

        assert!(matches!(wrong_password, SessionError::InvalidCredentials));
        assert!(matches!(unknown_user, SessionError::InvalidCredentials));
        // Same message too, so the HTTP layer cannot leak the difference.
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_register_assigns_user_role() {
        let mut users = MockTestUserRepository::new();
        let mut refresh_tokens = MockTestRefreshTokenRepository::new();

        users
            .expect_exists_by_username()
            .times(1)
            .returning(|_| Ok(false));
        users
            .expect_exists_by_email()
            .times(1)
            .returning(|_| Ok(false));
        users
            .expect_create()
            .withf(|user| user.role == Role::User && user.password_hash.starts_with("$argon2"))
            .times(1)
            .returning(|user| Ok(user));
        refresh_tokens
            .expect_upsert()
            .times(1)
            .returning(|token| Ok(token));

        let service = service(users, refresh_tokens);

        let session = service
            .register(RegisterCommand {
                username: "bob".to_string(),
                password: "pw2".to_string(),
                email: "bob@example.com".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(session.user.role, Role::User);
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let mut users = MockTestUserRepository::new();
        let refresh_tokens = MockTestRefreshTokenRepository::new();

        users
            .expect_exists_by_username()
            .times(1)
            .returning(|_| Ok(true));
        users.expect_create().times(0);

        let service = service(users, refresh_tokens);

        let result = service
            .register(RegisterCommand {
                username: "alice".to_string(),
                password: "pw".to_string(),
                email: String::new(),
            })
            .await;

        assert!(matches!(result, Err(SessionError::UserAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut users = MockTestUserRepository::new();
        let refresh_tokens = MockTestRefreshTokenRepository::new();

        users
            .expect_exists_by_username()
            .times(1)
            .returning(|_| Ok(false));
        users
            .expect_exists_by_email()
            .withf(|email| email == "alice@example.com")
            .times(1)
            .returning(|_| Ok(true));
        users.expect_create().times(0);

        let service = service(users, refresh_tokens);

        let result = service
            .register(RegisterCommand {
                username: "alice2".to_string(),
                password: "pw".to_string(),
                email: "alice@example.com".to_string(),
            })
            .await;

        assert!(matches!(result, Err(SessionError::UserAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_refresh_unknown_token() {
        let users = MockTestUserRepository::new();
        let mut refresh_tokens = MockTestRefreshTokenRepository::new();

        refresh_tokens
            .expect_find_by_token()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(users, refresh_tokens);

        let result = service.refresh("no-such-token").await;
        assert!(matches!(result, Err(SessionError::InvalidRefreshToken)));
    }

    #[tokio::test]
    async fn test_refresh_expired_token_is_deleted() {
        let users = MockTestUserRepository::new();
        let mut refresh_tokens = MockTestRefreshTokenRepository::new();

        let user_id = UserId::new();
        let expired = RefreshToken {
            token: "expired-token".to_string(),
            user_id,
            expiry_date: Utc::now() - Duration::hours(1),
        };
        refresh_tokens
            .expect_find_by_token()
            .withf(|token| token == "expired-token")
            .times(1)
            .returning(move |_| Ok(Some(expired.clone())));
        refresh_tokens
            .expect_delete_by_user()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(|_| Ok(()));

        let service = service(users, refresh_tokens);

        let result = service.refresh("expired-token").await;
        assert!(matches!(result, Err(SessionError::RefreshTokenExpired)));
    }

    #[tokio::test]
    async fn test_refresh_returns_same_refresh_token() {
        let mut users = MockTestUserRepository::new();
        let mut refresh_tokens = MockTestRefreshTokenRepository::new();

        let user = stored_user("pw1", Role::Admin);
        let user_id = user.id;
        let live = RefreshToken {
            token: "live-token".to_string(),
            user_id,
            expiry_date: Utc::now() + Duration::days(1),
        };
        refresh_tokens
            .expect_find_by_token()
            .times(1)
            .returning(move |_| Ok(Some(live.clone())));
        refresh_tokens.expect_delete_by_user().times(0);
        users
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(users, refresh_tokens);

        let refreshed = service.refresh("live-token").await.unwrap();
        assert_eq!(refreshed.refresh_token, "live-token");

        let verifier = TokenSigner::new(SECRET, Duration::hours(24));
        let claims = verifier
            .verify(&RawToken::new(refreshed.access_token))
            .unwrap();
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.user_id, user_id.0);
    }

    #[tokio::test]
    async fn test_logout_revokes_token() {
        let users = MockTestUserRepository::new();
        let mut refresh_tokens = MockTestRefreshTokenRepository::new();

        let user_id = UserId::new();
        refresh_tokens
            .expect_delete_by_user()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(|_| Ok(()));

        let service = service(users, refresh_tokens);

        assert!(service.logout(&user_id).await.is_ok());
    }
}
