// src/server.rs

//! Liveness HTTP endpoint.

use std::net::SocketAddr;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::error::Result;

/// Build the service router.
pub fn router() -> Router {
    Router::new().route("/", get(index))
}

/// Static liveness message.
async fn index() -> Json<Value> {
    Json(json!({ "message": "feedloop running" }))
}

/// Serve the router until shutdown is requested (SIGINT).
pub async fn serve(addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Liveness endpoint listening on {}", addr);

    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_index_reports_running() {
        let Json(value) = index().await;
        assert_eq!(value["message"], "feedloop running");
    }
}
