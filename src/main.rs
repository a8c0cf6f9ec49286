//! Stackgate server binary.
//!
//! Wires configuration into concrete adapters and serves the API. All
//! strategy choices (content source, webhook verification) are resolved here,
//! once, at startup.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use stackgate::adapters::auth::JwtSessionVerifier;
use stackgate::adapters::content::ContentSource;
use stackgate::adapters::http::{api_router, AppState, WebhookGuard};
use stackgate::adapters::postgres::PostgresEntitlementStore;
use stackgate::config::{AppConfig, ContentStrategy};
use stackgate::domain::SignatureVerifier;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.log_level))
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!().run(&pool).await?;

    let content = match config.content.strategy()? {
        ContentStrategy::Local(root) => {
            tracing::warn!(
                root = %root.display(),
                "local content strategy active; entitlement checks are disabled"
            );
            ContentSource::local(root)
        }
        ContentStrategy::Remote { repo, token } => ContentSource::remote(repo, token.clone()),
    };

    if !config.webhook.is_configured() {
        tracing::error!(
            "webhook signing secret is not configured; payment deliveries will answer 500"
        );
    }
    let webhook = WebhookGuard::new(
        config
            .webhook
            .signing_secret
            .as_ref()
            .map(|secret| SignatureVerifier::new(secret.clone())),
        config.webhook.product_id.clone(),
    );

    let state = AppState::new(
        Arc::new(PostgresEntitlementStore::new(pool)),
        Arc::new(JwtSessionVerifier::new(&config.auth.session_secret)),
        Arc::new(content),
        webhook,
    );

    let origins = config
        .server
        .cors_origins_list()
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    let app = api_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(CorsLayer::new().allow_origin(AllowOrigin::list(origins)));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "stackgate listening");
    axum::serve(listener, app).await?;

    Ok(())
}
