use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::AuthSessionResponse;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::session::ports::SessionServicePort;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

pub async fn login<UR, RR>(
    State(state): State<AppState<UR, RR>>,
    Json(body): Json<LoginRequest>,
) -> Result<(StatusCode, Json<AuthSessionResponse>), ApiError>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    let session = state
        .session_service
        .login(&body.username, &body.password)
        .await
        .map_err(ApiError::from)?;

    Ok((
        StatusCode::OK,
        Json(AuthSessionResponse::new("Login successful", session)),
    ))
}
