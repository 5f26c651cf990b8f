#![cfg_attr(test, allow(clippy::disallowed_methods))]
// Forbid unwrap() in production code; credentials and tokens come from untrusted clients.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use std::net::SocketAddr;
use std::sync::Arc;

use gateway::auth::{AuthService, InMemoryUserStore, JwtConfig, TokenCodec, UserStore};
use gateway::config::ServerConfig;
use gateway::time::SystemTimeSource;
use gateway::{AppState, app};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gateway=debug,tower_http=debug".into()),
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
        "Loaded configuration: listen_port={}, token_validity={}s, store_timeout={}ms",
        config.listen_port,
        config.token_validity.as_secs(),
        config.store_timeout.as_millis()
    );

    let jwt_config = match JwtConfig::new_hs256(config.jwt_secret.as_bytes()) {
        Ok(jwt_config) => jwt_config,
        Err(e) => {
            tracing::error!("Invalid signing configuration: {e}");
            std::process::exit(1);
        }
    };
    let codec = TokenCodec::with_validity(
        &jwt_config,
        config.token_validity,
        Arc::new(SystemTimeSource),
    );

    let store = Arc::new(InMemoryUserStore::new());
    if let Some(seed) = &config.seed_user {
        if let Err(e) = store.create(&seed.username, &seed.password).await {
            tracing::error!("Failed to register seed user: {e}");
            std::process::exit(1);
        }
        tracing::info!("Registered seed user '{}'", seed.username);
    }

    let auth = AuthService::from_store(codec, store).with_store_timeout(config.store_timeout);
    let app = app(AppState::new(auth));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
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
