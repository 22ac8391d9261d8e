//! Cookie limiter demonstration server.
//!
//! ```text
//!     Client ──▶ TraceLayer ──▶ CookieLimiterLayer ──▶ demo handlers
//!            ◀──            ◀── strip / delete / finish ◀──
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use cookie_limiter::config;
use cookie_limiter::observability::{logging, metrics};
use cookie_limiter::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "cookie-limiter")]
#[command(about = "Serve a demo app behind the cookie consent middleware", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = config::resolve_config(cli.config.as_deref(), cli.bind)?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("cookie-limiter v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        consent_token = %config.policy.consent_token,
        white_list = ?config.policy.white_list,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
