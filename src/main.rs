use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use uitree_sidecar::api::{routes::create_router, state::AppState};
use uitree_sidecar::automation::platform::fixture::FixtureProvider;
use uitree_sidecar::automation::types::ScreenInfo;
use uitree_sidecar::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load environment
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    let provider = match &config.fixture_path {
        Some(path) => {
            tracing::info!("Serving UI fixture {}", path.display());
            FixtureProvider::from_json_file(path)?
        }
        None => {
            tracing::warn!("UITREE_FIXTURE not set, serving an empty screen");
            FixtureProvider::new(ScreenInfo::default(), Vec::new())
        }
    };

    // Create application state
    let state = Arc::new(AppState::new(Arc::new(provider), config.engine.clone()));

    // Build router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("UI tree sidecar starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
