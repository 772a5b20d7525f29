// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Batch annotation of documentation extracts

use super::document::{Collection, Document};
use super::errors::AnnotateError;
use crate::embeddings::EmbeddingModel;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Per-collection outcome of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionStats {
    /// Records that received an embedding
    pub embedded: usize,
    /// Records without a usable text summary
    pub skipped: usize,
}

/// Summary of an annotation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationReport {
    pub function_results: CollectionStats,
    pub route_results: CollectionStats,
    pub model_results: CollectionStats,
}

impl AnnotationReport {
    pub fn stats(&self, collection: Collection) -> CollectionStats {
        match collection {
            Collection::FunctionResults => self.function_results,
            Collection::RouteResults => self.route_results,
            Collection::ModelResults => self.model_results,
        }
    }

    fn stats_mut(&mut self, collection: Collection) -> &mut CollectionStats {
        match collection {
            Collection::FunctionResults => &mut self.function_results,
            Collection::RouteResults => &mut self.route_results,
            Collection::ModelResults => &mut self.model_results,
        }
    }

    pub fn total_embedded(&self) -> usize {
        Collection::ALL
            .into_iter()
            .map(|c| self.stats(c).embedded)
            .sum()
    }

    pub fn total_skipped(&self) -> usize {
        Collection::ALL
            .into_iter()
            .map(|c| self.stats(c).skipped)
            .sum()
    }
}

/// Fails with [`AnnotateError::FileMissing`] when `path` does not exist
pub fn ensure_input_exists(path: &Path) -> Result<(), AnnotateError> {
    if path.exists() {
        Ok(())
    } else {
        Err(AnnotateError::FileMissing(path.to_path_buf()))
    }
}

/// Adds `embedding` to every record with a text summary
pub struct Annotator {
    model: Arc<dyn EmbeddingModel>,
}

impl Annotator {
    pub fn new(model: Arc<dyn EmbeddingModel>) -> Self {
        Self { model }
    }

    /// Annotates the file at `path` in place
    ///
    /// The whole document is read, embedded in memory and written back
    /// pretty-printed only after every record succeeded. The write overwrites
    /// the file directly.
    pub async fn annotate(&self, path: impl AsRef<Path>) -> Result<AnnotationReport, AnnotateError> {
        let path = path.as_ref();
        ensure_input_exists(path)?;

        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| AnnotateError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let mut document: Document = raw.parse().map_err(|source| AnnotateError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let report = self.annotate_document(&mut document).await?;

        let rendered = document
            .to_pretty_string()
            .map_err(AnnotateError::Serialize)?;
        tokio::fs::write(path, rendered)
            .await
            .map_err(|source| AnnotateError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            "Embeddings added to: {} ({} embedded, {} skipped)",
            path.display(),
            report.total_embedded(),
            report.total_skipped()
        );
        Ok(report)
    }

    /// Embeds the records of an in-memory document
    ///
    /// Collections are walked in [`Collection::ALL`] order, records in
    /// document order. Existing embeddings are recomputed.
    pub async fn annotate_document(
        &self,
        document: &mut Document,
    ) -> Result<AnnotationReport, AnnotateError> {
        let mut report = AnnotationReport::default();

        for collection in Collection::ALL {
            for (index, record) in document.records_mut(collection).iter_mut().enumerate() {
                let Some(summary) = record.text_summary() else {
                    debug!("Skipping {}[{}]: no text summary", collection, index);
                    report.stats_mut(collection).skipped += 1;
                    continue;
                };

                let embedding = self.model.embed(summary).await.map_err(|source| {
                    AnnotateError::ModelInvocation {
                        collection,
                        index,
                        name: record.name().map(str::to_string),
                        source,
                    }
                })?;

                if record.has_embedding() {
                    debug!("Replacing existing embedding of {}[{}]", collection, index);
                }
                record.set_embedding(embedding);
                report.stats_mut(collection).embedded += 1;
                info!(
                    "Embedded {} from {}",
                    record.name().unwrap_or("unnamed"),
                    collection
                );
            }
        }

        Ok(report)
    }
}
