//! statichost API server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use statichost_api::{AppState, routes};
use statichost_core::CompilerConfig;
use statichost_executor::DockerExecutor;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let secret = std::env::var("SECRET_KEY")
        .map_err(|_| anyhow::anyhow!("SECRET_KEY must be set"))?;
    let root = PathBuf::from(
        std::env::var("PAGES_ROOT").unwrap_or_else(|_| "/statichosts/pages".to_string()),
    );
    let bind_addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        .parse()?;

    if !root.exists() {
        warn!(root = %root.display(), "Pages root does not exist, creating it");
        std::fs::create_dir_all(&root)?;
    }

    // Connect to Docker once at process start; reachability is probed per
    // deploy and by /health.
    let executor = Arc::new(DockerExecutor::connect()?);
    info!("Docker client initialized");

    let state = AppState::new(executor, root, CompilerConfig::default(), secret);

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    info!("Starting server on {}", bind_addr);
    let listener = TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
