// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! `codedoc-annotate` argument handling and execution with the hash backend

use clap::Parser;
use codedoc_embed::cli::{execute, AnnotateCli};
use codedoc_embed::config::EmbeddingBackend;
use serde_json::Value;
use tempfile::TempDir;

#[tokio::test]
async fn test_execute_with_hash_backend() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("extract.json");
    std::fs::write(
        &path,
        r#"{"functionResults": [{"name": "foo", "textSummary": "adds two numbers"}], "routeResults": [], "modelResults": []}"#,
    )
    .unwrap();

    let cli = AnnotateCli::try_parse_from([
        "codedoc-annotate",
        path.to_str().unwrap(),
        "--backend",
        "hash",
        "--dimensions",
        "32",
    ])
    .unwrap();
    assert_eq!(cli.backend, EmbeddingBackend::Hash);

    let report = execute(cli).await.unwrap();
    assert_eq!(report.total_embedded(), 1);

    let output: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        output["functionResults"][0]["embedding"]
            .as_array()
            .unwrap()
            .len(),
        32
    );
}

#[tokio::test]
async fn test_execute_missing_file_fails_before_model_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.json");

    // The ONNX backend with unreachable local files would fail differently,
    // so a FileMissing message proves the input check ran first
    let cli = AnnotateCli::try_parse_from([
        "codedoc-annotate",
        path.to_str().unwrap(),
        "--backend",
        "onnx",
        "--model-path",
        "/nonexistent/model.onnx",
        "--tokenizer-path",
        "/nonexistent/tokenizer.json",
    ])
    .unwrap();

    let err = execute(cli).await.unwrap_err();
    assert!(err.to_string().contains("Input file not found"), "{}", err);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_execute_rejects_zero_dimensions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("extract.json");
    std::fs::write(&path, "{}").unwrap();

    let cli = AnnotateCli::try_parse_from([
        "codedoc-annotate",
        path.to_str().unwrap(),
        "--backend",
        "hash",
        "--dimensions",
        "0",
    ])
    .unwrap();

    assert!(execute(cli).await.is_err());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
}
