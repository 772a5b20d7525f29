// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Embedding Model Wrapper
//!
//! This module provides a wrapper around ONNX Runtime for running
//! the all-MiniLM-L6-v2 sentence transformer model.
//!
//! Features:
//! - ONNX model loading from disk
//! - GPU acceleration via CUDA (with automatic CPU fallback)
//! - BERT tokenization with truncation and batch padding
//! - Mean pooling over token embeddings followed by L2 normalization
//! - Output dimension probed at load time (384 for all-MiniLM-L6-v2)

use super::{normalize_l2, EmbeddingError, EmbeddingModel};
use async_trait::async_trait;
use ndarray::{Array2, ArrayView2, Axis, Ix2};
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info, warn};

/// Maximum sequence length of all-MiniLM-L6-v2
pub const DEFAULT_MAX_LENGTH: usize = 256;

/// Texts per inference call when embedding large batches
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// ONNX-based sentence embedding model
///
/// The session is shared behind `Arc<Mutex<_>>` because ONNX Runtime needs
/// exclusive access for `run`; clones are cheap and share the same session.
/// Inference runs on tokio's blocking pool.
#[derive(Clone)]
pub struct OnnxEmbeddingModel {
    /// ONNX Runtime session
    session: Arc<Mutex<Session>>,

    /// BERT tokenizer configured for truncation at `max_length`
    tokenizer: Arc<Tokenizer>,

    /// Model name (e.g., "all-MiniLM-L6-v2")
    model_name: String,

    /// Output dimension, probed at load time
    dimension: usize,

    /// Maximum sequence length in tokens
    max_length: usize,

    /// Texts per inference call
    batch_size: usize,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("max_length", &self.max_length)
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingModel {
    /// Loads an ONNX embedding model and its tokenizer from disk
    ///
    /// Runs one validation inference to learn the output dimension.
    ///
    /// # Errors
    /// - model or tokenizer file missing or invalid
    /// - ONNX Runtime initialization fails
    /// - model output is not `[batch, seq_len, hidden]`
    ///
    /// # Example
    /// ```ignore
    /// let model = OnnxEmbeddingModel::new(
    ///     "all-MiniLM-L6-v2",
    ///     "./models/all-MiniLM-L6-v2-onnx/onnx/model.onnx",
    ///     "./models/all-MiniLM-L6-v2-onnx/tokenizer.json",
    ///     256,
    /// ).await?;
    /// ```
    pub async fn new<P: AsRef<Path>>(
        model_name: impl Into<String>,
        model_path: P,
        tokenizer_path: P,
        max_length: usize,
    ) -> Result<Self, EmbeddingError> {
        let model_name = model_name.into();
        let model_path = model_path.as_ref();
        let tokenizer_path = tokenizer_path.as_ref();

        if !model_path.exists() {
            return Err(EmbeddingError::ModelNotFound(model_path.to_path_buf()));
        }
        if !tokenizer_path.exists() {
            return Err(EmbeddingError::TokenizerNotFound(
                tokenizer_path.to_path_buf(),
            ));
        }
        if max_length == 0 {
            return Err(EmbeddingError::Config(
                "max_length must be greater than 0".to_string(),
            ));
        }

        // Try CUDA first, fall back to CPU if unavailable
        info!("Initializing ONNX embedding model {}", model_name);
        let session = match build_session(model_path, true) {
            Ok(session) => {
                info!("CUDA execution provider initialized");
                session
            }
            Err(e) => {
                warn!("CUDA execution provider failed: {}", e);
                warn!("Falling back to CPU execution provider");
                build_session(model_path, false)?
            }
        };

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| EmbeddingError::TokenizerLoad(e.to_string()))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| EmbeddingError::TokenizerLoad(e.to_string()))?;
        // Padding is applied per batch below
        tokenizer.with_padding(None);

        let session = Mutex::new(session);
        let probe = infer(&session, &tokenizer, &["validation test".to_string()])?;
        let dimension = probe.first().map(Vec::len).unwrap_or(0);
        if dimension == 0 {
            return Err(EmbeddingError::OutputShape(vec![probe.len(), 0]));
        }

        info!(
            "ONNX embedding model {} loaded ({} dimensions, max {} tokens)",
            model_name, dimension, max_length
        );

        Ok(Self {
            session: Arc::new(session),
            tokenizer: Arc::new(tokenizer),
            model_name,
            dimension,
            max_length,
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }

    /// Sets the number of texts per inference call (minimum 1)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Embeds one chunk synchronously; callers run this on the blocking pool
    fn run_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let embeddings = infer(&self.session, &self.tokenizer, texts)?;

        if embeddings.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: embeddings.len(),
            });
        }
        if let Some(bad) = embeddings.iter().find(|e| e.len() != self.dimension) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: bad.len(),
            });
        }

        Ok(embeddings)
    }
}

#[async_trait]
impl EmbeddingModel for OnnxEmbeddingModel {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(self.batch_size) {
            let model = self.clone();
            let chunk = chunk.to_vec();
            let chunk_embeddings =
                tokio::task::spawn_blocking(move || model.run_batch(&chunk)).await??;
            embeddings.extend(chunk_embeddings);
        }

        debug!("Embedded {} texts with {}", texts.len(), self.model_name);
        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

fn build_session(model_path: &Path, use_cuda: bool) -> Result<Session, EmbeddingError> {
    let builder = Session::builder().map_err(EmbeddingError::runtime)?;
    let builder = if use_cuda {
        builder.with_execution_providers([CUDAExecutionProvider::default().build()])
    } else {
        builder.with_execution_providers([CPUExecutionProvider::default().build()])
    }
    .map_err(EmbeddingError::runtime)?;

    builder
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(EmbeddingError::runtime)?
        .with_intra_threads(4)
        .map_err(EmbeddingError::runtime)?
        .commit_from_file(model_path)
        .map_err(EmbeddingError::runtime)
}

/// Tokenizes, pads to the longest text, runs the session and pools
fn infer(
    session: &Mutex<Session>,
    tokenizer: &Tokenizer,
    texts: &[String],
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if texts.is_empty() {
        return Ok(vec![]);
    }

    let encodings = texts
        .iter()
        .map(|text| {
            tokenizer
                .encode(text.as_str(), true)
                .map_err(|e| EmbeddingError::Tokenization(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let batch = encodings.len();
    let max_len = encodings
        .iter()
        .map(|enc| enc.get_ids().len())
        .max()
        .unwrap_or(0);
    if max_len == 0 {
        return Err(EmbeddingError::Tokenization(
            "tokenizer produced no tokens".to_string(),
        ));
    }

    let mut input_ids_batch = Vec::with_capacity(batch * max_len);
    let mut attention_mask_batch = Vec::with_capacity(batch * max_len);

    for encoding in &encodings {
        let ids = encoding.get_ids();
        let mask = encoding.get_attention_mask();
        let padding_needed = max_len - ids.len();

        input_ids_batch.extend(ids.iter().map(|&id| id as i64));
        input_ids_batch.extend(std::iter::repeat(0i64).take(padding_needed));
        attention_mask_batch.extend(mask.iter().map(|&m| m as i64));
        attention_mask_batch.extend(std::iter::repeat(0i64).take(padding_needed));
    }

    // Kept for mean pooling after the mask tensor is handed to the session
    let attention_mask_for_pooling = attention_mask_batch.clone();

    let input_ids = Value::from_array(Array2::from_shape_vec((batch, max_len), input_ids_batch)?)
        .map_err(EmbeddingError::runtime)?;
    let attention_mask =
        Value::from_array(Array2::from_shape_vec((batch, max_len), attention_mask_batch)?)
            .map_err(EmbeddingError::runtime)?;
    let token_type_ids = Value::from_array(Array2::<i64>::zeros((batch, max_len)))
        .map_err(EmbeddingError::runtime)?;

    let mut session = session.lock().map_err(|_| EmbeddingError::SessionPoisoned)?;
    let outputs = session
        .run(ort::inputs![
            "input_ids" => input_ids,
            "attention_mask" => attention_mask,
            "token_type_ids" => token_type_ids
        ])
        .map_err(EmbeddingError::runtime)?;

    // Index [0]: output names differ between exports
    let output = outputs[0]
        .try_extract_array::<f32>()
        .map_err(EmbeddingError::runtime)?;

    let shape = output.shape().to_vec();
    if shape.len() != 3 || shape[0] != batch || shape[1] != max_len {
        return Err(EmbeddingError::OutputShape(shape));
    }

    let mut embeddings = Vec::with_capacity(batch);
    for (batch_idx, mask) in attention_mask_for_pooling.chunks(max_len).enumerate() {
        let tokens = output
            .index_axis(Axis(0), batch_idx)
            .into_dimensionality::<Ix2>()?;
        let mut pooled = mean_pool(tokens, mask);
        normalize_l2(&mut pooled);
        embeddings.push(pooled);
    }

    Ok(embeddings)
}

/// Averages token embeddings `[seq_len, hidden]`, weighted by the attention mask
pub(crate) fn mean_pool(token_embeddings: ArrayView2<'_, f32>, attention_mask: &[i64]) -> Vec<f32> {
    let (seq_len, hidden_dim) = token_embeddings.dim();
    let mut pooled = vec![0.0f32; hidden_dim];
    let mut sum_mask = 0.0f32;

    for (i, &mask) in attention_mask.iter().take(seq_len).enumerate() {
        if mask == 0 {
            continue;
        }
        let mask_value = mask as f32;
        sum_mask += mask_value;
        for (j, value) in token_embeddings.row(i).iter().enumerate() {
            pooled[j] += value * mask_value;
        }
    }

    for val in &mut pooled {
        *val /= sum_mask.max(1e-9);
    }

    pooled
}
