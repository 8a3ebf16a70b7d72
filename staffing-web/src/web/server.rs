//! HTTP server

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;

use super::handlers::{assignments, people, projects, transfer};
use crate::store::TableStore;

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn TableStore>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(assignments::index))
        .route("/people", get(people::list).post(people::create))
        .route("/projects", get(projects::list).post(projects::create))
        .route("/assign", get(assignments::form).post(assignments::create))
        .route("/export_excel", get(transfer::export_excel))
        .route(
            "/import_csv",
            get(transfer::import_form)
                .post(transfer::import_csv)
                .layer(DefaultBodyLimit::max(transfer::IMPORT_BODY_LIMIT)),
        )
        .with_state(state)
}

/// Serve until Ctrl+C
pub async fn serve(bind: SocketAddr, store: Arc<dyn TableStore>) -> Result<()> {
    let app = router(Arc::new(AppState { store }));

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    log::info!("Listening on http://{}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}
