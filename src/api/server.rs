// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Embedding Service HTTP server

use crate::api::embed::generate_embeddings_handler;
use crate::config::ServiceConfig;
use crate::embeddings::EmbeddingModel;
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub const GENERATE_EMBEDDINGS_ROUTE: &str = "/generate-embeddings";

/// State shared by every request: the read-only model loaded at startup
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn EmbeddingModel>,
}

impl AppState {
    pub fn new(model: Arc<dyn EmbeddingModel>) -> Self {
        Self { model }
    }
}

/// Builds the service router
///
/// The request body size is not capped: `texts` has no length limit.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(GENERATE_EMBEDDINGS_ROUTE, post(generate_embeddings_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Binds `config.listen_addr` and serves until Ctrl-C
pub async fn start_server(config: &ServiceConfig, model: Arc<dyn EmbeddingModel>) -> Result<()> {
    let addr = config.socket_addr().map_err(anyhow::Error::msg)?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        "Embedding service listening on {} (model: {}, {} dimensions)",
        listener.local_addr()?,
        model.model_name(),
        model.dimension()
    );
    info!("  Embed: POST http://{}{}", addr, GENERATE_EMBEDDINGS_ROUTE);

    serve(listener, AppState::new(model), shutdown_signal()).await?;

    info!("Embedding service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
