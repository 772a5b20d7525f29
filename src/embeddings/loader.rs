// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding model loading
//!
//! Builds the process-wide model handle from a [`ModelConfig`]. For the ONNX
//! backend, model files are taken from the configured local paths; any path
//! left unset is fetched from the HuggingFace hub (and cached there), the same
//! way the pretrained library resolves `all-MiniLM-L6-v2` on first use.

use super::{EmbeddingError, EmbeddingModel, HashEmbeddingModel, OnnxEmbeddingModel};
use crate::config::{EmbeddingBackend, ModelConfig};
use hf_hub::api::sync::Api;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// ONNX export inside the sentence-transformers hub repository
pub const HUB_MODEL_FILE: &str = "onnx/model.onnx";

/// Tokenizer inside the sentence-transformers hub repository
pub const HUB_TOKENIZER_FILE: &str = "tokenizer.json";

/// Loads the configured embedding model once for the process lifetime
///
/// # Errors
/// - invalid configuration
/// - model files missing locally and not downloadable
/// - ONNX Runtime initialization fails
/// - loaded model dimension differs from `config.dimensions`
pub async fn load_model(config: &ModelConfig) -> Result<Arc<dyn EmbeddingModel>, EmbeddingError> {
    config.validate().map_err(EmbeddingError::Config)?;

    info!(
        "Loading embedding model {} (backend: {})",
        config.name, config.backend
    );

    let model: Arc<dyn EmbeddingModel> = match config.backend {
        EmbeddingBackend::Hash => {
            Arc::new(HashEmbeddingModel::named(config.name.clone(), config.dimensions)?)
        }
        EmbeddingBackend::Onnx => {
            let resolve_config = config.clone();
            let (model_path, tokenizer_path) =
                tokio::task::spawn_blocking(move || resolve_model_files(&resolve_config))
                    .await??;

            let model = OnnxEmbeddingModel::new(
                config.name.clone(),
                model_path,
                tokenizer_path,
                config.max_length,
            )
            .await
            .map_err(|e| {
                error!("Failed to load model {}: {}", config.name, e);
                e
            })?
            .with_batch_size(config.batch_size);

            if model.dimension() != config.dimensions {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: config.dimensions,
                    actual: model.dimension(),
                });
            }

            Arc::new(model)
        }
    };

    info!(
        "Embedding model {} ready ({} dimensions)",
        model.model_name(),
        model.dimension()
    );
    Ok(model)
}

/// Returns `(model.onnx, tokenizer.json)` paths, downloading what is not configured
///
/// Blocking: performs network I/O when a path is missing.
pub fn resolve_model_files(config: &ModelConfig) -> Result<(PathBuf, PathBuf), EmbeddingError> {
    if let (Some(model_path), Some(tokenizer_path)) = (&config.model_path, &config.tokenizer_path)
    {
        return Ok((model_path.clone(), tokenizer_path.clone()));
    }

    info!("Fetching model files from HuggingFace hub: {}", config.repo);
    let api = Api::new()?;
    let repo = api.model(config.repo.clone());

    let model_path = match &config.model_path {
        Some(path) => path.clone(),
        None => repo.get(HUB_MODEL_FILE)?,
    };
    let tokenizer_path = match &config.tokenizer_path {
        Some(path) => path.clone(),
        None => repo.get(HUB_TOKENIZER_FILE)?,
    };

    info!(
        "Model files resolved: {} / {}",
        model_path.display(),
        tokenizer_path.display()
    );
    Ok((model_path, tokenizer_path))
}
