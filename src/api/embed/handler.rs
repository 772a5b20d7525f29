// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /generate-embeddings HTTP handler

use super::{GenerateEmbeddingsRequest, GenerateEmbeddingsResponse};
use crate::api::server::AppState;
use crate::api::ApiError;
use crate::embeddings::{EmbeddingError, EmbeddingModel};
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Json, State};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Embeds `texts` in order; an empty input never reaches the model
pub async fn generate_embeddings(
    model: &dyn EmbeddingModel,
    texts: &[String],
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if texts.is_empty() {
        return Ok(vec![]);
    }

    let embeddings = model.embed_batch(texts).await?;
    if embeddings.len() != texts.len() {
        return Err(EmbeddingError::CountMismatch {
            expected: texts.len(),
            actual: embeddings.len(),
        });
    }

    Ok(embeddings)
}

/// POST /generate-embeddings handler
///
/// # Request Body
/// ```json
/// { "texts": ["text1", "text2"] }
/// ```
///
/// # Response Body
/// ```json
/// { "embeddings": [[0.1, ...], [0.2, ...]] }
/// ```
///
/// # Errors
/// - 400 Bad Request: body is not valid JSON
/// - 422 Unprocessable Entity: `texts` missing or not a list of strings
/// - 500 Internal Server Error: embedding model failed
pub async fn generate_embeddings_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<GenerateEmbeddingsResponse>, ApiError> {
    let request = body
        .map_err(ApiError::from)
        .and_then(|bytes| GenerateEmbeddingsRequest::from_json_bytes(&bytes))
        .map_err(|e| {
            warn!("Rejected embedding request: {}", e);
            e
        })?;

    debug!("Embedding request received for {} texts", request.len());
    let started = Instant::now();

    let embeddings = generate_embeddings(state.model.as_ref(), &request.texts)
        .await
        .map_err(|e| {
            error!("Embedding generation failed: {}", e);
            ApiError::ModelInvocation(e.to_string())
        })?;

    let response = GenerateEmbeddingsResponse::from(embeddings);
    response.validate_dimensions(state.model.dimension())?;

    info!(
        "Generated {} embeddings in {}ms",
        response.embedding_count(),
        started.elapsed().as_millis()
    );

    Ok(Json(response))
}
