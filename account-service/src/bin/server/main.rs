use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::session::service::SessionService;
use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::create_router;
use account_service::inbound::http::router::AppState;
use account_service::outbound::repositories::PostgresRefreshTokenRepository;
use account_service::outbound::repositories::PostgresUserRepository;
use auth::TokenSigner;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        access_ttl_ms = config.jwt.access_ttl_ms,
        refresh_ttl_ms = config.jwt.refresh_ttl_ms,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let signing_secret: Vec<u8> = match config.jwt.secret.as_deref() {
        Some(secret) if !secret.is_empty() => secret.as_bytes().to_vec(),
        _ => {
            tracing::warn!(
                "No signing secret configured; generated an ephemeral one. \
                 Access tokens will not survive a restart"
            );
            auth::generate_secret().to_vec()
        }
    };

    let token_signer = Arc::new(TokenSigner::new(
        &signing_secret,
        Duration::milliseconds(config.jwt.access_ttl_ms),
    ));

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let refresh_token_repository = Arc::new(PostgresRefreshTokenRepository::new(pg_pool));

    let state = AppState {
        session_service: Arc::new(SessionService::new(
            Arc::clone(&user_repository),
            refresh_token_repository,
            Arc::clone(&token_signer),
            Duration::milliseconds(config.jwt.refresh_ttl_ms),
        )),
        user_service: Arc::new(UserService::new(user_repository)),
        token_signer,
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state)).await?;

    Ok(())
}
