use auth::AccessClaims;
use auth::Capability;
use auth::RawToken;
use auth::Role;
use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

/// Verified principal for the current request.
///
/// Present in request extensions only after `authenticate` has accepted the
/// bearer token; its claims are always post-verification.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub claims: AccessClaims,
}

/// Middleware that verifies the bearer token and attaches the principal.
///
/// Any failure here means "no principal": the request is rejected with 401
/// and never reaches a role check.
pub async fn authenticate<UR, RR>(
    State(state): State<AppState<UR, RR>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    let token = extract_bearer_token(&req)?;

    let claims = state.token_signer.verify(&token).map_err(|e| {
        tracing::warn!(error = %e, "Access token rejected");
        error_response(StatusCode::UNAUTHORIZED, "Invalid or expired token")
    })?;

    req.extensions_mut().insert(CurrentUser { claims });

    Ok(next.run(req).await)
}

/// Middleware gating a route on the ADMIN role.
///
/// Must sit behind `authenticate`; a request that somehow arrives without a
/// principal is treated as unauthenticated, never as any role.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, Response> {
    let Some(current) = req.extensions().get::<CurrentUser>() else {
        return Err(error_response(
            StatusCode::UNAUTHORIZED,
            "Missing authentication",
        ));
    };

    if !Capability::role(Role::Admin).permits(current.claims.role) {
        tracing::warn!(
            username = %current.claims.username,
            role = %current.claims.role,
            "Admin route denied"
        );
        return Err(error_response(StatusCode::FORBIDDEN, "Admin role required"));
    }

    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Result<RawToken, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            error_response(StatusCode::UNAUTHORIZED, "Missing Authorization header")
        })?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| error_response(StatusCode::UNAUTHORIZED, "Invalid Authorization header"))?;

    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return Err(error_response(
            StatusCode::UNAUTHORIZED,
            "Invalid Authorization header format. Expected: Bearer <token>",
        ));
    };

    Ok(RawToken::new(token))
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
