use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::AuthSessionResponse;
use crate::domain::session::models::RegisterCommand;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::session::ports::SessionServicePort;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    username: String,
    password: String,
    // Absent email is stored as the empty string.
    #[serde(default)]
    email: Option<String>,
}

pub async fn register<UR, RR>(
    State(state): State<AppState<UR, RR>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthSessionResponse>), ApiError>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    let command = RegisterCommand {
        username: body.username,
        password: body.password,
        email: body.email.unwrap_or_default(),
    };

    let session = state
        .session_service
        .register(command)
        .await
        .map_err(ApiError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthSessionResponse::new(
            "User registered successfully",
            session,
        )),
    ))
}
