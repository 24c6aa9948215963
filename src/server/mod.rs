//! HTTP surface: JSON endpoints for an external dashboard front end.
//!
//! K_i: Handlers only read the shared [`Dashboard`]; there is no write path.
//! K_i: Every degraded state is a 200 with an explicit variant, so the front
//!      end always has something to render.

mod routes;

pub use routes::router;

use crate::dashboard::Dashboard;
use crate::models::{CountylensError, Result, ServerConfig};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Bind `config` and serve until Ctrl-C.
pub async fn serve(dashboard: Arc<Dashboard>, config: &ServerConfig) -> Result<()> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| CountylensError::io(format!("binding {addr}"), e))?;
    info!(%addr, "Dashboard API listening");

    axum::serve(listener, router(dashboard)?)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CountylensError::io("serving HTTP", e))?;

    info!("Dashboard API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
