//! RateSmart Server
//!
//! Review intelligence service for small businesses: sentiment scoring and
//! fake-review detection on every review write.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

use ratesmart_server::{create_router, AppState, ConfigOverrides, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "ratesmart-server")]
#[command(about = "RateSmart review intelligence service", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Listen address
    #[arg(short = 'l', long)]
    listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    port: Option<u16>,

    /// Shared admin bearer token
    #[arg(long, env = "RATESMART_ADMIN_TOKEN", hide_env_values = true)]
    admin_token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting RateSmart server");

    let overrides = ConfigOverrides {
        listen: cli.listen,
        port: cli.port,
        admin_token: cli.admin_token,
    };
    let config = ServerConfig::load(&cli.config, &overrides)?;
    info!("Configuration loaded successfully");
    info!("CORS origins: {:?}", config.cors_allowed_origins);
    if config.uses_default_admin_token() {
        warn!("Using the default admin token; set RATESMART_ADMIN_TOKEN in production");
    }

    let metrics_handle = init_metrics()?;

    let addr: SocketAddr = format!("{}:{}", config.listen, config.port).parse()?;
    let state = AppState::new(config, Some(metrics_handle))?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("ratesmart=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ratesmart=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "ratesmart_requests_total",
        "Total number of HTTP requests by method and status"
    );
    metrics::describe_counter!(
        "ratesmart_reviews_analyzed_total",
        "Reviews analyzed on save, by sentiment"
    );
    metrics::describe_counter!(
        "ratesmart_reviews_flagged_total",
        "Reviews flagged as likely fake, by first triggered rule"
    );
    metrics::describe_histogram!(
        "ratesmart_analysis_latency_us",
        metrics::Unit::Microseconds,
        "Review analysis latency in microseconds"
    );
    metrics::describe_counter!("ratesmart_errors_total", "Server errors by status");

    info!("Metrics exporter initialized");
    Ok(handle)
}
