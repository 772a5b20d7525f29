// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Sentence embedding models
//!
//! The rest of the crate talks to an [`EmbeddingModel`] handle: text in,
//! fixed-length unit-normalized vector out. Two backends exist:
//! - [`OnnxEmbeddingModel`]: all-MiniLM-L6-v2 through ONNX Runtime
//! - [`HashEmbeddingModel`]: deterministic hash-seeded vectors for tests and
//!   offline runs
//!
//! Models are loaded once per process via [`load_model`] and shared as
//! `Arc<dyn EmbeddingModel>`.

pub mod errors;
pub mod hash_model;
pub mod loader;
pub mod onnx_model;

pub use errors::EmbeddingError;
pub use hash_model::HashEmbeddingModel;
pub use loader::{load_model, resolve_model_files};
pub use onnx_model::OnnxEmbeddingModel;

use async_trait::async_trait;

/// Read-only text-to-vector capability shared across requests
///
/// Implementations must return vectors of length [`dimension`](Self::dimension)
/// with unit Euclidean norm, one per input and in input order.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Embeds a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut embeddings = self.embed_batch(&[text.to_string()]).await?;
        match embeddings.len() {
            1 => Ok(embeddings.remove(0)),
            actual => Err(EmbeddingError::CountMismatch {
                expected: 1,
                actual,
            }),
        }
    }

    /// Embeds many texts, preserving order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Output dimension of every vector
    fn dimension(&self) -> usize;

    /// Model name used in logs
    fn model_name(&self) -> &str;
}

/// Scales `vector` in place to unit Euclidean length
///
/// Zero vectors are left as-is (the norm is clamped to 1e-12 like the
/// reference sentence-transformers implementation).
pub fn normalize_l2(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-12);
    for value in vector.iter_mut() {
        *value /= norm;
    }
}

/// Euclidean norm of a vector
pub fn l2_norm(vector: &[f32]) -> f32 {
    vector.iter().map(|x| x * x).sum::<f32>().sqrt()
}
