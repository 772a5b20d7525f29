// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Embedding model configuration

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_MODEL_NAME: &str = "all-MiniLM-L6-v2";
pub const DEFAULT_MODEL_REPO: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const DEFAULT_DIMENSIONS: usize = 384;
pub const DEFAULT_MAX_LENGTH: usize = crate::embeddings::onnx_model::DEFAULT_MAX_LENGTH;
pub const DEFAULT_BATCH_SIZE: usize = crate::embeddings::onnx_model::DEFAULT_BATCH_SIZE;

/// Which embedding implementation to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingBackend {
    /// all-MiniLM-L6-v2 through ONNX Runtime
    #[default]
    Onnx,
    /// Deterministic hash vectors, no model files
    Hash,
}

impl FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "onnx" => Ok(EmbeddingBackend::Onnx),
            "hash" => Ok(EmbeddingBackend::Hash),
            other => Err(format!(
                "unknown embedding backend '{}' (expected 'onnx' or 'hash')",
                other
            )),
        }
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingBackend::Onnx => write!(f, "onnx"),
            EmbeddingBackend::Hash => write!(f, "hash"),
        }
    }
}

/// Configuration for loading the embedding model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Backend implementation
    pub backend: EmbeddingBackend,
    /// Model name used in logs
    pub name: String,
    /// HuggingFace hub repository used when local paths are not set
    pub repo: String,
    /// Local ONNX model file
    pub model_path: Option<PathBuf>,
    /// Local tokenizer JSON file
    pub tokenizer_path: Option<PathBuf>,
    /// Expected output dimension
    pub dimensions: usize,
    /// Truncation length in tokens
    pub max_length: usize,
    /// Texts per inference call
    pub batch_size: usize,
}

impl ModelConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            backend: match env::var("EMBEDDING_BACKEND") {
                Ok(value) => value.parse().unwrap_or_else(|e: String| {
                    warn!("{}, using {}", e, defaults.backend);
                    defaults.backend
                }),
                Err(_) => defaults.backend,
            },
            name: env::var("EMBEDDING_MODEL_NAME").unwrap_or(defaults.name),
            repo: env::var("EMBEDDING_MODEL_REPO").unwrap_or(defaults.repo),
            model_path: env::var("EMBEDDING_MODEL_PATH").ok().map(PathBuf::from),
            tokenizer_path: env::var("EMBEDDING_TOKENIZER_PATH").ok().map(PathBuf::from),
            dimensions: env::var("EMBEDDING_DIMENSIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.dimensions),
            max_length: env::var("EMBEDDING_MAX_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_length),
            batch_size: env::var("EMBEDDING_BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.batch_size),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.dimensions == 0 {
            return Err("Embedding dimensions must be greater than 0".to_string());
        }
        if self.max_length == 0 {
            return Err("Max length must be greater than 0".to_string());
        }
        if self.batch_size == 0 {
            return Err("Batch size must be greater than 0".to_string());
        }
        if self.backend == EmbeddingBackend::Onnx
            && self.repo.trim().is_empty()
            && !self.has_local_files()
        {
            return Err(
                "Either a model repository or both model and tokenizer paths are required"
                    .to_string(),
            );
        }
        Ok(())
    }

    /// Whether both model files are available locally without downloading
    pub fn has_local_files(&self) -> bool {
        self.model_path.is_some() && self.tokenizer_path.is_some()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Onnx,
            name: DEFAULT_MODEL_NAME.to_string(),
            repo: DEFAULT_MODEL_REPO.to_string(),
            model_path: None,
            tokenizer_path: None,
            dimensions: DEFAULT_DIMENSIONS,
            max_length: DEFAULT_MAX_LENGTH,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}
