//! JSON API over the shared conversation session.

mod routes;
mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub use state::SharedState;

/// Builds the API router around `state`.
pub fn router(state: Arc<SharedState>) -> Router {
    Router::new()
        .route("/api/chat", post(routes::chat_handler))
        .route("/api/history", get(routes::history_handler))
        .route("/api/clear", post(routes::clear_handler))
        .route("/api/status", get(routes::status_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serves the API on `host:port` until Ctrl-C.
pub async fn serve(state: Arc<SharedState>, host: &str, port: u16) -> Result<()> {
    let listener = TcpListener::bind((host, port))
        .await
        .wrap_err_with(|| format!("Failed to bind HTTP server to {}:{}", host, port))?;

    info!("HTTP server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("HTTP server shutting down");
        })
        .await
        .wrap_err("HTTP server failed")?;

    Ok(())
}
