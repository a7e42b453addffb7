use axum::extract::Path;
use axum::extract::State;
use axum::Json;
use serde_json::json;
use serde_json::Value;

use super::ApiError;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn delete_user<UR, RR>(
    State(state): State<AppState<UR, RR>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    let user_id = UserId::from_string(&id)?;

    state
        .user_service
        .delete_user(&user_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(json!({ "message": "User deleted successfully" })))
}
