// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use codedoc_embed::{api::start_server, config::ServiceConfig, embeddings::load_model, version};
use std::env;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    info!("Starting {}", version::get_version_string());
    debug!("Build info: {}", version::get_version_info());

    let config = ServiceConfig::from_env();
    config.validate().map_err(anyhow::Error::msg)?;

    // The model is loaded once and shared read-only by all requests
    let model = load_model(&config.model)
        .await
        .context("Failed to load embedding model")?;

    start_server(&config, model).await
}
