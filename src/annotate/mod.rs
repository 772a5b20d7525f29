// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Batch Annotator
//!
//! Reads a documentation extract (`functionResults`, `routeResults`,
//! `modelResults`), embeds every record's `textSummary` and writes the
//! document back to the same path.

pub mod annotator;
pub mod document;
pub mod errors;

pub use annotator::{ensure_input_exists, AnnotationReport, Annotator, CollectionStats};
pub use document::{Collection, Document, DocumentError, Record};
pub use errors::AnnotateError;

use crate::embeddings::EmbeddingModel;
use std::path::Path;
use std::sync::Arc;

/// Annotates the file at `path` with `model`
pub async fn annotate(
    path: impl AsRef<Path>,
    model: Arc<dyn EmbeddingModel>,
) -> Result<AnnotationReport, AnnotateError> {
    Annotator::new(model).annotate(path).await
}
