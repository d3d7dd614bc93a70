//! Routify demo server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum/hyper ──▶ request-id + trace layers ──▶ Dispatcher
//!                                                                     │
//!                         ┌───────────────────────────────────────────┘
//!                         ▼
//!                 global middleware ──▶ route lookup ──▶ route middleware
//!                                            │                   │
//!                                          404                   ▼
//!                                                   body parse (POST/PUT/PATCH)
//!                                                                │
//!     Client Response                                            ▼
//!     ◀────────────────────────────── ResponseContext ◀──── handler
//! ```

use std::path::PathBuf;

use clap::Parser;

use routify::config::{load_config, ServerConfig};
use routify::observability::{init_logging, metrics};
use routify::{demo, Server};

#[derive(Parser)]
#[command(name = "routify")]
#[command(about = "Minimal HTTP request router demo server", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides the config file).
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(port) = cli.port {
        config.listener.port = port;
    }

    init_logging(&config.observability)?;

    tracing::info!(
        host = %config.listener.host,
        port = config.listener.port,
        max_body_size = config.limits.max_body_size,
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

    let server = Server::new(demo::app(), config);
    server
        .start_with(|addr| {
            tracing::info!("Test the API with these commands:");
            for line in demo::usage(addr.port()) {
                tracing::info!("  {line}");
            }
        })
        .await?;

    Ok(())
}
