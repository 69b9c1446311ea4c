use std::sync::Arc;

use auth::Authenticator;
use identity_service::config::Config;
use identity_service::domain::account::service::IdentityService;
use identity_service::inbound::http::router::cors_layer;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::federation::GoogleIdentityClient;
use identity_service::outbound::repositories::PostgresAccountRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        cors_allowed_origin = ?config.server.cors_allowed_origin,
        token_ttl_hours = config.jwt.expiration_hours,
        google_redirect_uri = %config.google.redirect_uri,
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        config.jwt.token_ttl(),
    ));
    if !authenticator.is_signing_configured() {
        tracing::error!(
            "JWT secret is not configured; every token issuance will fail until JWT__SECRET is set"
        );
    }

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let account_repository = Arc::new(PostgresAccountRepository::new(pg_pool));
    let google_client = Arc::new(GoogleIdentityClient::new(&config.google)?);

    let identity_service = Arc::new(IdentityService::new(
        account_repository,
        google_client,
        Arc::clone(&authenticator),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let cors = cors_layer(config.server.cors_allowed_origin.as_deref())?;
    let http_application = create_router(identity_service, authenticator, cors);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
