//! Axum server setup and router construction.

use std::net::SocketAddr;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::api::{self, AppState};

/// Build the full axum router.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/api/state", get(api::get_state))
        .route("/get_suggestions", post(api::post_suggestions))
        .route("/set_budget", post(api::set_budget))
        .route("/add_task", post(api::add_task))
        .route("/delete_task/{task_id}", post(api::delete_task))
        .route("/add_expense", post(api::add_expense))
        .route("/delete_expense/{expense_id}", post(api::delete_expense))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}

/// Bind, spawn the serve loop, and return the bound address.
pub async fn start_server(router: Router, bind_addr: SocketAddr) -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;
    info!("Listening on http://{addr}");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!("Server stopped: {e}");
        }
    });

    Ok(addr)
}
