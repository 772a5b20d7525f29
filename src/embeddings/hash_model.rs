// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Deterministic hash-seeded embedding backend
//!
//! Produces stable pseudo-random unit vectors from a text hash. No model
//! files are needed, which makes it the backend for tests, benchmarks and
//! offline smoke runs (`EMBEDDING_BACKEND=hash`). Vectors carry no semantic
//! meaning.

use super::{normalize_l2, EmbeddingError, EmbeddingModel};
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Model name reported by the hash backend
pub const HASH_MODEL_NAME: &str = "hash-embedding";

#[derive(Debug, Clone)]
pub struct HashEmbeddingModel {
    model_name: String,
    dimension: usize,
}

impl HashEmbeddingModel {
    pub fn new(dimension: usize) -> Result<Self, EmbeddingError> {
        Self::named(HASH_MODEL_NAME, dimension)
    }

    pub fn named(model_name: impl Into<String>, dimension: usize) -> Result<Self, EmbeddingError> {
        if dimension == 0 {
            return Err(EmbeddingError::Config(
                "Embedding dimension must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            model_name: model_name.into(),
            dimension,
        })
    }

    /// Computes the unit vector for `text` without going through the trait
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut current_seed = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dimension);
        for i in 0..self.dimension {
            // Linear congruential step, mixed with the position
            current_seed =
                (current_seed.wrapping_mul(1664525).wrapping_add(1013904223)) ^ (i as u64);

            // Map to [-1, 1]
            let value = (current_seed as f64 / u64::MAX as f64) * 2.0 - 1.0;
            embedding.push(value as f32);
        }

        normalize_l2(&mut embedding);
        embedding
    }
}

#[async_trait]
impl EmbeddingModel for HashEmbeddingModel {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.embed_sync(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|text| self.embed_sync(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
