// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Response body for POST /generate-embeddings

use crate::api::ApiError;
use serde::{Deserialize, Serialize};

/// Response body for POST /generate-embeddings
///
/// One vector per input text, in input order.
///
/// # Example
/// ```json
/// { "embeddings": [[0.1, 0.2, ...], [0.3, 0.4, ...]] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GenerateEmbeddingsResponse {
    pub embeddings: Vec<Vec<f32>>,
}

impl GenerateEmbeddingsResponse {
    /// Number of embeddings in the response
    pub fn embedding_count(&self) -> usize {
        self.embeddings.len()
    }

    /// Checks that every embedding has `expected` dimensions
    ///
    /// A mismatch is a server-side fault, reported as an internal error.
    pub fn validate_dimensions(&self, expected: usize) -> Result<(), ApiError> {
        for (index, embedding) in self.embeddings.iter().enumerate() {
            if embedding.len() != expected {
                return Err(ApiError::InternalError(format!(
                    "embeddings[{}] has {} dimensions (expected {})",
                    index,
                    embedding.len(),
                    expected
                )));
            }
        }
        Ok(())
    }
}

impl From<Vec<Vec<f32>>> for GenerateEmbeddingsResponse {
    fn from(embeddings: Vec<Vec<f32>>) -> Self {
        Self { embeddings }
    }
}
