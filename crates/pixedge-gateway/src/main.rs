//! pixedge - edge caching proxy for image assets

use clap::Parser;
use pixedge_gateway::{run_server_with_shutdown, GatewayConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "pixedge")]
#[command(about = "Edge caching proxy and upload gateway for image assets")]
#[command(version)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "PIXEDGE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8787", env = "PIXEDGE_PORT")]
    port: u16,

    /// Base URL of the transform origin
    #[arg(long, default_value = "http://localhost:8080", env = "ORIGIN_URL")]
    origin_url: String,

    /// Public base URL used to build cache keys
    #[arg(long, default_value = "http://localhost", env = "PIXEDGE_PUBLIC_URL")]
    public_url: String,

    /// Origin fetch timeout in seconds
    #[arg(long, default_value = "30", env = "PIXEDGE_ORIGIN_TIMEOUT")]
    origin_timeout: u64,

    /// Maximum number of cached responses
    #[arg(long, default_value = "1024", env = "PIXEDGE_CACHE_CAPACITY")]
    cache_capacity: usize,

    /// Directory for uploaded objects (in-memory when unset)
    #[arg(long, env = "PIXEDGE_OBJECT_DIR")]
    object_dir: Option<PathBuf>,

    /// Disable CORS headers
    #[arg(long, env = "PIXEDGE_NO_CORS")]
    no_cors: bool,

    /// Enable debug logging
    #[arg(short, long, env = "PIXEDGE_DEBUG")]
    debug: bool,

    /// Emit logs as JSON
    #[arg(long, env = "PIXEDGE_LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("pixedge_gateway={},tower_http=debug", log_level).into());
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting pixedge on {}:{}", args.host, args.port);

    let config = GatewayConfig {
        host: args.host,
        port: args.port,
        origin_url: args.origin_url,
        public_url: args.public_url,
        origin_timeout_secs: args.origin_timeout,
        cache_capacity: args.cache_capacity,
        object_store_dir: args.object_dir,
        cors_enabled: !args.no_cors,
        ..Default::default()
    };

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutdown signal received");
    };

    run_server_with_shutdown(config, shutdown).await
}
