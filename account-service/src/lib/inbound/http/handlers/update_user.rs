use auth::Role;
use axum::extract::Path;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use serde_json::Value;

use super::ApiError;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    admin: bool,
}

pub async fn update_user<UR, RR>(
    State(state): State<AppState<UR, RR>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<Value>, ApiError>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    let user_id = UserId::from_string(&id)?;

    let command = UpdateUserCommand {
        username: body.username,
        email: body.email,
        password: body.password,
        role: if body.admin { Role::Admin } else { Role::User },
    };

    let user = state
        .user_service
        .update_user(&user_id, command)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(json!({
        "message": "User updated successfully",
        "username": user.username,
        "role": user.role.to_string(),
    })))
}
