// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Runtime configuration
//!
//! Settings come from environment variables (a `.env` file is honoured by
//! the binaries) with defaults matching all-MiniLM-L6-v2.

pub mod model;
pub mod service;

pub use model::{
    EmbeddingBackend, ModelConfig, DEFAULT_BATCH_SIZE, DEFAULT_DIMENSIONS, DEFAULT_MAX_LENGTH,
    DEFAULT_MODEL_NAME, DEFAULT_MODEL_REPO,
};
pub use service::{ServiceConfig, DEFAULT_LISTEN_ADDR};

/// Documentation extract annotated when no path is given
pub const DEFAULT_ANNOTATE_INPUT: &str = "controllers/Shreyasrana18-Notes-API-functions.json";
