//! Browser front end for the trip dashboard.
//!
//! `tripboard-web` serves a single server-rendered page plus form endpoints
//! that mutate a shared [`Dashboard`], and a JSON endpoint that proxies
//! location lookups through a [`SuggestionGateway`].
//!
//! # Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use tripboard::{Dashboard, GatewayConfig, SuggestionGateway};
//! use tripboard_web::{WebConfig, spawn_web};
//!
//! let dashboard = Arc::new(Dashboard::new());
//! let gateway = SuggestionGateway::from_config(&GatewayConfig::new(api_key))?;
//! let addr = spawn_web(dashboard, gateway, WebConfig::default()).await?;
//! println!("Dashboard: http://{addr}");
//! ```
//!
//! # Routes
//!
//! | Method | Path | Effect |
//! |---|---|---|
//! | GET | `/` | Render the dashboard |
//! | GET | `/api/state` | Dashboard snapshot as JSON |
//! | POST | `/get_suggestions` | `{"query": ...}` to a JSON array of locations |
//! | POST | `/set_budget` | Overwrite the budget, redirect to `/` |
//! | POST | `/add_task` | Add a task, redirect to `/` |
//! | POST | `/delete_task/{id}` | Remove a task, redirect to `/` |
//! | POST | `/add_expense` | Record an expense, redirect to `/` |
//! | POST | `/delete_expense/{id}` | Remove an expense, redirect to `/` |

pub mod api;
pub mod page;
pub mod server;
pub mod snapshot;

pub use api::AppState;
pub use snapshot::DashboardSnapshot;

use std::net::SocketAddr;
use std::sync::Arc;

use tripboard::{Dashboard, SuggestionGateway};

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:5000`.
    pub bind_addr: SocketAddr,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
        }
    }
}

/// Spawn the web server on a Tokio task and return the bound address.
///
/// The server runs until the Tokio runtime shuts down.
pub async fn spawn_web(
    dashboard: Arc<Dashboard>,
    gateway: SuggestionGateway,
    config: WebConfig,
) -> std::io::Result<SocketAddr> {
    let router = server::build_router(AppState { dashboard, gateway });
    server::start_server(router, config.bind_addr).await
}
