// Forbid unwrap() in production code to prevent panics on bad input.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use std::net::SocketAddr;
use std::sync::Arc;

use itemserver::auth::{AuthGate, CredentialStore};
use itemserver::config::ServerConfig;
use itemserver::time::SystemTimeSource;
use itemserver::{AppState, ItemStore, router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "itemserver=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: listen_port={}, token_ttl_secs={}",
        config.listen_port,
        config.token_ttl_secs
    );

    let jwt_config = match config.jwt_config() {
        Ok(jwt_config) => jwt_config,
        Err(e) => {
            tracing::error!("Invalid JWT configuration: {e}");
            std::process::exit(1);
        }
    };

    let gate = AuthGate::new(
        CredentialStore::new(),
        jwt_config,
        Arc::new(SystemTimeSource),
    );
    let state = AppState::new(ItemStore::new(), gate);
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.listen_port));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind: {e}");
            std::process::exit(1);
        });

    axum::serve(listener, app).await.unwrap_or_else(|e| {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    });
}
