use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::AuthenticatedSession;
use crate::domain::user::errors::UserError;
use crate::domain::user::errors::UserIdError;
use crate::domain::user::models::User;

pub mod create_user;
pub mod delete_user;
pub mod get_user;
pub mod list_users;
pub mod login;
pub mod logout;
pub mod refresh_token;
pub mod register;
pub mod update_user;

/// HTTP-facing error.
///
/// Every variant renders as `{"error": message}` with the matching status.
/// Internal failures get a generic body; the detail goes to the log only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "Internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidCredentials
            | SessionError::InvalidRefreshToken
            | SessionError::RefreshTokenExpired => ApiError::Unauthorized(err.to_string()),
            SessionError::UserAlreadyExists(message) => ApiError::BadRequest(message),
            // Issuance failures and store I/O faults are server-side, never
            // reported as an authentication failure.
            SessionError::Token(_) | SessionError::Password(_) | SessionError::Database(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::UserAlreadyExists(message) => ApiError::BadRequest(message),
            UserError::Password(_) | UserError::Database(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<UserIdError> for ApiError {
    fn from(err: UserIdError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Body returned by login and register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSessionResponse {
    pub message: String,
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl AuthSessionResponse {
    pub fn new(message: &str, session: AuthenticatedSession) -> Self {
        Self {
            message: message.to_string(),
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            user_id: session.user.id.to_string(),
            username: session.user.username,
            email: session.user.email,
            role: session.user.role.to_string(),
        }
    }
}

/// Sanitized user view for the admin endpoints. Never carries the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
            created_at: user.created_at,
        }
    }
}
