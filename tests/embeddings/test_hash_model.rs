// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Hash backend behaviour through the `EmbeddingModel` trait

use codedoc_embed::embeddings::{l2_norm, EmbeddingModel, HashEmbeddingModel};
use std::sync::Arc;

#[tokio::test]
async fn test_batch_matches_single_embeddings() {
    let model = HashEmbeddingModel::new(384).unwrap();
    let texts = vec![
        "Creates a note".to_string(),
        "Deletes a note".to_string(),
        "Lists notes for a user".to_string(),
    ];

    let batch = model.embed_batch(&texts).await.unwrap();
    assert_eq!(batch.len(), texts.len());

    for (embedding, text) in batch.iter().zip(&texts) {
        assert_eq!(embedding, &model.embed(text).await.unwrap());
        assert_eq!(embedding.len(), 384);
        assert!((l2_norm(embedding) - 1.0).abs() < 1e-5);
    }
}

#[tokio::test]
async fn test_different_texts_differ() {
    let model = HashEmbeddingModel::new(64).unwrap();
    let a = model.embed("GET /notes").await.unwrap();
    let b = model.embed("POST /notes").await.unwrap();
    assert_ne!(a, b);
}

#[tokio::test]
async fn test_usable_as_shared_trait_object() {
    let model: Arc<dyn EmbeddingModel> = Arc::new(HashEmbeddingModel::new(8).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let model = Arc::clone(&model);
            tokio::spawn(async move { model.embed(&format!("text {}", i)).await })
        })
        .collect();

    for handle in handles {
        let embedding = handle.await.unwrap().unwrap();
        assert_eq!(embedding.len(), 8);
    }
}
