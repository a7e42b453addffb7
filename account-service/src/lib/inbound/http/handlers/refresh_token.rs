use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::session::ports::SessionServicePort;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub token: String,
    pub refresh_token: String,
}

pub async fn refresh_token<UR, RR>(
    State(state): State<AppState<UR, RR>>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<Json<RefreshTokenResponse>, ApiError>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    let Some(token) = body.refresh_token else {
        return Err(ApiError::BadRequest("Refresh token is required".to_string()));
    };

    let refreshed = state
        .session_service
        .refresh(&token)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(RefreshTokenResponse {
        token: refreshed.access_token,
        refresh_token: refreshed.refresh_token,
    }))
}
