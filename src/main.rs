//! sqlgen HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use sqlgen::config::Config;
use sqlgen::embedding::TextEmbedder;
use sqlgen::gateway::{HandlerState, create_router_with_state};
use sqlgen::generation::{GenaiBackend, ValidatedGenerator};
use sqlgen::pipeline::{QueryPipeline, ResourceRegistry};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        model = %config.model,
        safety = %config.safety_screen,
        "sqlgen starting"
    );

    if config.embedding_url.is_none() {
        tracing::warn!("No SQLGEN_EMBEDDING_URL configured, running embedder in stub mode");
    }
    let embedder = Arc::new(TextEmbedder::load(config.embedder_config())?);

    let registry = Arc::new(ResourceRegistry::connect(&config, embedder).await?);
    let generator = ValidatedGenerator::new(GenaiBackend::default(), config.generator_config());
    let pipeline = Arc::new(QueryPipeline::new(registry, generator));

    let app = create_router_with_state(HandlerState::new(pipeline));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("sqlgen shutdown complete");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var("SQLGEN_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    else {
        return 1;
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
