// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::annotate::{ensure_input_exists, AnnotationReport, Annotator};
use crate::config::{
    EmbeddingBackend, ModelConfig, DEFAULT_ANNOTATE_INPUT, DEFAULT_BATCH_SIZE, DEFAULT_DIMENSIONS,
    DEFAULT_MAX_LENGTH, DEFAULT_MODEL_NAME, DEFAULT_MODEL_REPO,
};
use crate::embeddings::load_model;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Adds summary embeddings to an extracted documentation JSON file
#[derive(Parser, Debug)]
#[command(name = "codedoc-annotate")]
#[command(version)]
#[command(about = "Add textSummary embeddings to a documentation extract, in place", long_about = None)]
pub struct AnnotateCli {
    /// JSON file to annotate; rewritten in place
    #[arg(env = "ANNOTATE_INPUT_PATH", default_value = DEFAULT_ANNOTATE_INPUT)]
    pub input: PathBuf,

    /// Embedding backend: onnx or hash
    #[arg(long, env = "EMBEDDING_BACKEND", default_value_t = EmbeddingBackend::Onnx)]
    pub backend: EmbeddingBackend,

    /// Model name used in logs
    #[arg(long, env = "EMBEDDING_MODEL_NAME", default_value = DEFAULT_MODEL_NAME)]
    pub model_name: String,

    /// HuggingFace hub repository to download missing model files from
    #[arg(long, env = "EMBEDDING_MODEL_REPO", default_value = DEFAULT_MODEL_REPO)]
    pub model_repo: String,

    /// Local ONNX model file
    #[arg(long, env = "EMBEDDING_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Local tokenizer JSON file
    #[arg(long, env = "EMBEDDING_TOKENIZER_PATH")]
    pub tokenizer_path: Option<PathBuf>,

    /// Expected embedding dimension
    #[arg(long, env = "EMBEDDING_DIMENSIONS", default_value_t = DEFAULT_DIMENSIONS)]
    pub dimensions: usize,

    /// Truncation length in tokens
    #[arg(long, env = "EMBEDDING_MAX_LENGTH", default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,

    /// Texts per inference call
    #[arg(long, env = "EMBEDDING_BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
}

impl AnnotateCli {
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            backend: self.backend,
            name: self.model_name.clone(),
            repo: self.model_repo.clone(),
            model_path: self.model_path.clone(),
            tokenizer_path: self.tokenizer_path.clone(),
            dimensions: self.dimensions,
            max_length: self.max_length,
            batch_size: self.batch_size,
        }
    }
}

/// Execute an annotation run
///
/// The input is checked before the model is loaded so a wrong path fails
/// without a model download.
pub async fn execute(cli: AnnotateCli) -> Result<AnnotationReport> {
    ensure_input_exists(&cli.input)?;

    let config = cli.model_config();
    config.validate().map_err(anyhow::Error::msg)?;

    let model = load_model(&config)
        .await
        .context("Failed to load embedding model")?;

    info!("Annotating {}", cli.input.display());
    let report = Annotator::new(model).annotate(&cli.input).await?;
    Ok(report)
}
