use axum::extract::State;
use axum::Extension;
use axum::Json;
use serde_json::json;
use serde_json::Value;

use super::ApiError;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::session::ports::SessionServicePort;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

/// Revoke the caller's refresh token. Succeeds whether or not one existed.
pub async fn logout<UR, RR>(
    State(state): State<AppState<UR, RR>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, ApiError>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    state
        .session_service
        .logout(&UserId(current.claims.user_id))
        .await
        .map_err(ApiError::from)?;

    Ok(Json(json!({ "message": "Logout successful" })))
}
