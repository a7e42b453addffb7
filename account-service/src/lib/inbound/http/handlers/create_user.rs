use auth::Role;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use serde_json::Value;

use super::ApiError;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserRequest {
    username: String,
    password: String,
    confirm_password: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    admin: bool,
}

pub async fn create_user<UR, RR>(
    State(state): State<AppState<UR, RR>>,
    Json(body): Json<AddUserRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    if body.password != body.confirm_password {
        return Err(ApiError::BadRequest("Passwords do not match".to_string()));
    }

    let command = CreateUserCommand {
        username: body.username,
        email: body.email.unwrap_or_default(),
        password: body.password,
        role: if body.admin { Role::Admin } else { Role::User },
    };

    let user = state
        .user_service
        .create_user(command)
        .await
        .map_err(ApiError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "username": user.username,
            "role": user.role.to_string(),
        })),
    ))
}
