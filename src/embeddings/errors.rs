// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for embedding model loading and inference

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading an embedding model or computing embeddings
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// ONNX model file missing on disk
    #[error("ONNX model file not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    /// Tokenizer file missing on disk
    #[error("Tokenizer file not found: {}", .0.display())]
    TokenizerNotFound(PathBuf),

    /// Tokenizer JSON could not be loaded or configured
    #[error("Failed to load tokenizer: {0}")]
    TokenizerLoad(String),

    /// Model files could not be fetched from the HuggingFace hub
    #[error("Model download failed: {0}")]
    Download(#[from] hf_hub::api::sync::ApiError),

    /// ONNX Runtime session creation or inference failed
    #[error("ONNX runtime error: {0}")]
    Runtime(String),

    /// Input text could not be tokenized
    #[error("Tokenization failed: {0}")]
    Tokenization(String),

    /// Input tensors could not be assembled
    #[error("Tensor shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Model produced a tensor that is not [batch, seq_len, hidden]
    #[error("Model outputs unexpected shape {0:?} (expected [batch, seq_len, hidden])")]
    OutputShape(Vec<usize>),

    /// Model dimension differs from the configured expectation
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Model returned a different number of vectors than inputs
    #[error("Model returned {actual} embeddings for {expected} inputs")]
    CountMismatch { expected: usize, actual: usize },

    /// A previous inference panicked while holding the session
    #[error("Embedding session lock poisoned")]
    SessionPoisoned,

    /// Blocking inference task was cancelled or panicked
    #[error("Embedding task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Invalid model configuration
    #[error("Invalid model configuration: {0}")]
    Config(String),
}

impl EmbeddingError {
    pub(crate) fn runtime(error: impl std::fmt::Display) -> Self {
        EmbeddingError::Runtime(error.to_string())
    }
}
