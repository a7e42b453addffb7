use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::domain::session::errors::SessionError;
use account_service::domain::session::models::RefreshToken;
use account_service::domain::session::ports::RefreshTokenRepository;
use account_service::domain::session::service::SessionService;
use account_service::domain::user::errors::UserError;
use account_service::domain::user::models::User;
use account_service::domain::user::models::UserId;
use account_service::domain::user::ports::UserRepository;
use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::create_router;
use account_service::inbound::http::router::AppState;
use async_trait::async_trait;
use auth::Role;
use auth::TokenSigner;
use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use chrono::Duration;
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::json;
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"integration_test_secret_32_bytes!!";

/// Credential store held in memory, mirroring the database's uniqueness
/// rules for username and non-empty email.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.username == user.username) {
            return Err(UserError::username_taken());
        }
        if !user.email.is_empty() && users.values().any(|u| u.email == user.email) {
            return Err(UserError::email_taken());
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, UserError> {
        Ok(!email.is_empty()
            && self.users.lock().unwrap().values().any(|u| u.email == email))
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        Ok(self.users.lock().unwrap().values().cloned().collect())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.users
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

/// Refresh-token store held in memory. Keyed by user, so replacement is
/// atomic under the lock exactly as the database upsert is.
#[derive(Default)]
pub struct InMemoryRefreshTokenRepository {
    tokens: Mutex<HashMap<UserId, RefreshToken>>,
}

impl InMemoryRefreshTokenRepository {
    pub fn token_count(&self) -> usize {
        self.tokens.lock().unwrap().len()
    }

    pub fn live_token_for(&self, user_id: &UserId) -> Option<String> {
        self.tokens
            .lock()
            .unwrap()
            .get(user_id)
            .map(|t| t.token.clone())
    }

    /// Force a stored token's expiry into the past.
    pub fn expire(&self, token: &str) {
        let mut tokens = self.tokens.lock().unwrap();
        for stored in tokens.values_mut() {
            if stored.token == token {
                stored.expiry_date = Utc::now() - Duration::hours(1);
            }
        }
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.tokens
            .lock()
            .unwrap()
            .values()
            .any(|t| t.token == token)
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn upsert(&self, token: RefreshToken) -> Result<RefreshToken, SessionError> {
        self.tokens
            .lock()
            .unwrap()
            .insert(token.user_id, token.clone());
        Ok(token)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, SessionError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .values()
            .find(|t| t.token == token)
            .cloned())
    }

    async fn delete_by_user(&self, user_id: &UserId) -> Result<(), SessionError> {
        self.tokens.lock().unwrap().remove(user_id);
        Ok(())
    }
}

/// Full service wired to in-memory stores, plus handles for inspecting them.
pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUserRepository>,
    pub refresh_tokens: Arc<InMemoryRefreshTokenRepository>,
    pub token_signer: Arc<TokenSigner>,
}

pub fn test_app() -> TestApp {
    let users = Arc::new(InMemoryUserRepository::default());
    let refresh_tokens = Arc::new(InMemoryRefreshTokenRepository::default());
    let token_signer = Arc::new(TokenSigner::new(TEST_SECRET, Duration::hours(24)));

    let state = AppState {
        session_service: Arc::new(SessionService::new(
            Arc::clone(&users),
            Arc::clone(&refresh_tokens),
            Arc::clone(&token_signer),
            Duration::days(7),
        )),
        user_service: Arc::new(UserService::new(Arc::clone(&users))),
        token_signer: Arc::clone(&token_signer),
    };

    TestApp {
        router: create_router(state),
        users,
        refresh_tokens,
        token_signer,
    }
}

impl TestApp {
    /// Insert an identity directly into the store, bypassing registration.
    pub async fn seed_user(&self, username: &str, password: &str, role: Role) -> User {
        let hasher = auth::PasswordHasher::new();
        let user = User {
            id: UserId::new(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: hasher.hash(password).unwrap(),
            role,
            created_at: Utc::now(),
        };
        self.users.create(user).await.unwrap()
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request("POST", uri, token, Some(body)).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", uri, token, None).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("DELETE", uri, token, None).await
    }

    pub async fn put(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request("PUT", uri, token, Some(body)).await
    }

    async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            json!(null)
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }
}
