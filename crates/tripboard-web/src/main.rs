//! Trip and task dashboard server.
//!
//! # Usage
//!
//! ```bash
//! GEMINI_API_KEY=... cargo run -p tripboard-web
//! GEMINI_API_KEY=... cargo run -p tripboard-web -- --port 8080
//! GEMINI_API_KEY=... cargo run -p tripboard-web -- --model gemini-2.5-flash
//! ```
//!
//! Then open the printed URL in a browser. Without `GEMINI_API_KEY` the
//! dashboard still works; location suggestions come back empty.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tripboard::api::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL};
use tripboard::{API_KEY_ENV, Dashboard, GatewayConfig, SuggestionGateway};
use tripboard_web::{WebConfig, spawn_web};

/// Trip and task dashboard.
#[derive(Parser)]
#[command(about = "Trip budget and task dashboard with location suggestions")]
struct Args {
    /// Interface to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port for the web UI server.
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Model used for location suggestions.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Base URL of the generative language API.
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Per-request timeout for suggestion lookups, in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tripboard=debug,tripboard_web=debug"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
    if api_key.is_empty() {
        warn!("{API_KEY_ENV} is not set; location suggestions will be empty");
    }

    let gateway_config = GatewayConfig::new(api_key)
        .with_api_base(args.api_base)
        .with_model(args.model)
        .with_timeout(Duration::from_secs(args.timeout_secs));
    let gateway = SuggestionGateway::from_config(&gateway_config).map_err(|e| e.to_string())?;

    let dashboard = Arc::new(Dashboard::new());
    let web_config = WebConfig {
        bind_addr: SocketAddr::new(args.host, args.port),
    };
    let addr = spawn_web(dashboard, gateway, web_config)
        .await
        .map_err(|e| format!("failed to bind {}:{}: {e}", args.host, args.port))?;
    println!("Dashboard: http://{addr}");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("failed to listen for shutdown signal: {e}"))?;
    info!("Shutting down");
    Ok(())
}
