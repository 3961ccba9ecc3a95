//! Order gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser / order-cli
//!          │
//!          ▼
//!   ┌──────────────┐   ┌────────────────┐   ┌──────────────┐
//!   │ http server  │──▶│  order proxy   │──▶│ retry policy │
//!   │ (axum)       │   │  (endpoint)    │   │  + backoff   │
//!   └──────┬───────┘   └───────▲────────┘   └──────┬───────┘
//!          │                   │                   ▼
//!          │           ┌───────┴────────┐   ┌──────────────┐
//!          │           │   normalizer   │◀──│  timed call  │──▶ upstream
//!          │           └────────────────┘   └──────────────┘
//!          │
//!          ├──▶ session gate (login cookie) → page shells
//!          └──▶ catalog lookups (products, users)
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::net::TcpListener;

use order_gateway::catalog::Catalog;
use order_gateway::config::load_config;
use order_gateway::lifecycle::{signals, Shutdown};
use order_gateway::observability::{logging, metrics};
use order_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "order-gateway")]
#[command(about = "Order entry gateway with a bounded-retry upstream proxy", long_about = None)]
struct Args {
    /// Path to a TOML config file. Defaults plus environment overrides are
    /// used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("order-gateway: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_logging(&config.observability);
    tracing::info!("order-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    match run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: order_gateway::GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_url = config.upstream.base_url.as_deref().unwrap_or("<none>"),
        path = %config.upstream.path,
        timeout_ms = config.upstream.timeout_ms,
        retries = config.upstream.retries,
        base_delay_ms = config.upstream.base_delay_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?);
    }

    let catalog = Catalog::load(&config.catalog)?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config, catalog)?;
    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
