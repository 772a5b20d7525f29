// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod annotate;
pub mod api;
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod version;

// Re-export commonly used types
pub use annotate::{annotate, AnnotateError, AnnotationReport, Annotator, Collection, Document};
pub use api::{create_router, start_server, ApiError, AppState};
pub use config::{EmbeddingBackend, ModelConfig, ServiceConfig};
pub use embeddings::{
    load_model, EmbeddingError, EmbeddingModel, HashEmbeddingModel, OnnxEmbeddingModel,
};
