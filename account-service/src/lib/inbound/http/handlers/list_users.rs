use axum::extract::State;
use axum::Json;

use super::ApiError;
use super::UserData;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn list_users<UR, RR>(
    State(state): State<AppState<UR, RR>>,
) -> Result<Json<Vec<UserData>>, ApiError>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    let users = state
        .user_service
        .list_users()
        .await
        .map_err(ApiError::from)?;

    Ok(Json(users.iter().map(UserData::from).collect()))
}
