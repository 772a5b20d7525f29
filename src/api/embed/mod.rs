// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding API Module
//!
//! This module provides the POST /generate-embeddings endpoint: a list of
//! strings in, one unit-normalized vector per string out.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{generate_embeddings, generate_embeddings_handler};
pub use request::GenerateEmbeddingsRequest;
pub use response::GenerateEmbeddingsResponse;
