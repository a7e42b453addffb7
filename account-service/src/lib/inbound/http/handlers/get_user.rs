use axum::extract::Path;
use axum::extract::State;
use axum::Json;

use super::ApiError;
use super::UserData;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn get_user<UR, RR>(
    State(state): State<AppState<UR, RR>>,
    Path(id): Path<String>,
) -> Result<Json<UserData>, ApiError>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    let user_id = UserId::from_string(&id)?;

    let user = state
        .user_service
        .get_user(&user_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(UserData::from(&user)))
}
