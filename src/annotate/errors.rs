// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for the batch annotator

use super::document::{Collection, DocumentError};
use crate::embeddings::EmbeddingError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an annotation run
///
/// Nothing is written unless every record was embedded, so any variant
/// before `Serialize` leaves the input file as it was.
#[derive(Error, Debug)]
pub enum AnnotateError {
    /// Input path does not exist; checked before reading
    #[error("Input file not found: {}", .0.display())]
    FileMissing(PathBuf),

    /// Input exists but could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input is not valid JSON or has the wrong shape
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: DocumentError,
    },

    /// The embedding model failed on a record
    #[error(
        "Failed to embed {collection}[{index}] ({}): {source}",
        .name.as_deref().unwrap_or("unnamed")
    )]
    ModelInvocation {
        collection: Collection,
        index: usize,
        name: Option<String>,
        source: EmbeddingError,
    },

    /// Annotated document could not be serialized
    #[error("Failed to serialize annotated document: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Final write failed
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
