// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request body for POST /generate-embeddings

use crate::api::ApiError;
use serde::{Deserialize, Serialize};

/// Request body for POST /generate-embeddings
///
/// `texts` may be empty and has no length cap. Unknown fields are ignored.
/// The body is decoded as JSON whatever the `Content-Type` header says.
///
/// # Example
/// ```json
/// { "texts": ["adds two numbers", "creates a note"] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateEmbeddingsRequest {
    /// Text strings to embed
    pub texts: Vec<String>,
}

impl GenerateEmbeddingsRequest {
    pub fn new<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        Self {
            texts: texts.into_iter().map(Into::into).collect(),
        }
    }

    /// Decodes a raw request body
    pub fn from_json_bytes(body: &[u8]) -> Result<Self, ApiError> {
        Ok(serde_json::from_slice(body)?)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}
