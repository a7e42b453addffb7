use std::sync::Arc;
use std::time::Duration;

use auth::TokenSigner;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_user::create_user;
use super::handlers::delete_user::delete_user;
use super::handlers::get_user::get_user;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::refresh_token::refresh_token;
use super::handlers::register::register;
use super::handlers::update_user::update_user;
use super::middleware::authenticate;
use super::middleware::require_admin;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::session::service::SessionService;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::service::UserService;

/// Shared state for all routes.
///
/// Generic over the store implementations so the integration tests can run
/// the full router against in-memory ports.
pub struct AppState<UR, RR>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    pub session_service: Arc<SessionService<UR, RR>>,
    pub user_service: Arc<UserService<UR>>,
    pub token_signer: Arc<TokenSigner>,
}

// Manual impl: a derive would demand UR: Clone / RR: Clone.
impl<UR, RR> Clone for AppState<UR, RR>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    fn clone(&self) -> Self {
        Self {
            session_service: Arc::clone(&self.session_service),
            user_service: Arc::clone(&self.user_service),
            token_signer: Arc::clone(&self.token_signer),
        }
    }
}

pub fn create_router<UR, RR>(state: AppState<UR, RR>) -> Router
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    let public_routes = Router::new()
        .route("/api/auth/login", post(login::<UR, RR>))
        .route("/api/auth/register", post(register::<UR, RR>))
        .route("/api/auth/refresh-token", post(refresh_token::<UR, RR>));

    let authenticated_routes = Router::new()
        .route("/api/auth/logout", post(logout::<UR, RR>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate::<UR, RR>,
        ));

    // Layer order matters: authenticate wraps require_admin, so the token
    // is verified before any role decision.
    let admin_routes = Router::new()
        .route(
            "/api/admin/users",
            get(list_users::<UR, RR>).post(create_user::<UR, RR>),
        )
        .route(
            "/api/admin/users/:id",
            get(get_user::<UR, RR>)
                .put(update_user::<UR, RR>)
                .delete(delete_user::<UR, RR>),
        )
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate::<UR, RR>,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
