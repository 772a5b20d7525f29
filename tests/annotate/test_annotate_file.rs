// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Batch annotator tests against files on disk
//!
//! Every test uses the deterministic hash model, so no model download is needed.

use crate::common::{l2_norm, CountingModel, TEST_DIMENSIONS};
use codedoc_embed::annotate::{annotate, Annotator, CollectionStats};
use codedoc_embed::embeddings::{EmbeddingModel, HashEmbeddingModel};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

fn write_input(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("extract.json");
    std::fs::write(&path, contents).unwrap();
    path
}

fn read_output(path: &PathBuf) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn hash_model() -> Arc<dyn EmbeddingModel> {
    Arc::new(HashEmbeddingModel::new(TEST_DIMENSIONS).unwrap())
}

fn as_vector(value: &Value) -> Vec<f32> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap() as f32)
        .collect()
}

fn assert_close(actual: &[f32], expected: &[f32]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-6, "{} != {}", a, e);
    }
}

#[tokio::test]
async fn test_end_to_end_single_function() {
    let dir = TempDir::new().unwrap();
    let path = write_input(
        &dir,
        r#"{"functionResults": [{"name": "foo", "textSummary": "adds two numbers"}], "routeResults": [], "modelResults": []}"#,
    );

    let report = annotate(&path, hash_model()).await.unwrap();

    assert_eq!(report.function_results.embedded, 1);
    assert_eq!(report.total_embedded(), 1);
    assert_eq!(report.total_skipped(), 0);

    let output = read_output(&path);
    let record = &output["functionResults"][0];
    assert_eq!(record["name"], "foo");
    assert_eq!(record["textSummary"], "adds two numbers");

    let embedding = as_vector(&record["embedding"]);
    assert_eq!(embedding.len(), TEST_DIMENSIONS);
    assert!((l2_norm(&embedding) - 1.0).abs() < 1e-5);

    let expected = HashEmbeddingModel::new(TEST_DIMENSIONS)
        .unwrap()
        .embed_sync("adds two numbers");
    assert_close(&embedding, &expected);

    assert_eq!(output["routeResults"], json!([]));
    assert_eq!(output["modelResults"], json!([]));
}

#[tokio::test]
async fn test_output_is_pretty_printed_with_two_spaces() {
    let dir = TempDir::new().unwrap();
    let path = write_input(
        &dir,
        r#"{"functionResults":[],"routeResults":[{"name":"GET /notes","textSummary":""}],"modelResults":[]}"#,
    );

    annotate(&path, hash_model()).await.unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    let expected = "{\n  \"functionResults\": [],\n  \"routeResults\": [\n    {\n      \"name\": \"GET /notes\",\n      \"textSummary\": \"\"\n    }\n  ],\n  \"modelResults\": []\n}";
    assert_eq!(written, expected);
}

#[tokio::test]
async fn test_rerun_recomputes_identical_embeddings() {
    let dir = TempDir::new().unwrap();
    let input = r#"{
        "functionResults": [
            {"name": "createNote", "textSummary": "Creates a note for the current user"},
            {"name": "deleteNote", "textSummary": "Deletes a note by id"}
        ],
        "routeResults": [{"name": "POST /notes", "textSummary": "Route for creating notes"}],
        "modelResults": [{"name": "Note", "textSummary": "Mongoose schema for a note"}]
    }"#;
    let once = write_input(&dir, input);
    let twice = dir.path().join("twice.json");
    std::fs::write(&twice, input).unwrap();

    let model = CountingModel::new(TEST_DIMENSIONS);
    let annotator = Annotator::new(model.clone());

    annotator.annotate(&once).await.unwrap();
    annotator.annotate(&twice).await.unwrap();
    let report = annotator.annotate(&twice).await.unwrap();

    // Second run embeds every record again instead of skipping
    assert_eq!(report.total_embedded(), 4);
    assert_eq!(model.texts_seen(), 12);

    assert_eq!(
        std::fs::read_to_string(&once).unwrap(),
        std::fs::read_to_string(&twice).unwrap()
    );
}

#[tokio::test]
async fn test_records_without_summary_are_untouched() {
    let dir = TempDir::new().unwrap();
    let path = write_input(
        &dir,
        r#"{
            "functionResults": [
                {"name": "noSummary"},
                {"name": "emptySummary", "textSummary": ""},
                {"name": "nullSummary", "textSummary": null},
                {"name": "withSummary", "textSummary": "Returns all notes"}
            ],
            "routeResults": [],
            "modelResults": []
        }"#,
    );

    let report = annotate(&path, hash_model()).await.unwrap();
    assert_eq!(
        report.function_results,
        CollectionStats {
            embedded: 1,
            skipped: 3
        }
    );

    let output = read_output(&path);
    let records = output["functionResults"].as_array().unwrap();
    for record in &records[..3] {
        assert!(record.get("embedding").is_none(), "{}", record);
    }
    assert!(records[3].get("embedding").is_some());
    assert_eq!(records[2]["textSummary"], Value::Null);
}

#[tokio::test]
async fn test_unknown_fields_and_key_order_preserved() {
    let dir = TempDir::new().unwrap();
    let path = write_input(
        &dir,
        r#"{
            "project": "notes-api",
            "modelResults": [{"textSummary": "User schema", "name": "User", "fields": ["email", "password"]}],
            "functionResults": [],
            "routeResults": [],
            "generatedAt": "2024-05-01"
        }"#,
    );

    annotate(&path, hash_model()).await.unwrap();

    let output = read_output(&path);
    let top_keys: Vec<&str> = output.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        top_keys,
        [
            "project",
            "modelResults",
            "functionResults",
            "routeResults",
            "generatedAt"
        ]
    );

    let record_keys: Vec<&str> = output["modelResults"][0]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(record_keys, ["textSummary", "name", "fields", "embedding"]);
    assert_eq!(output["modelResults"][0]["fields"], json!(["email", "password"]));
}

#[tokio::test]
async fn test_existing_embedding_is_overwritten_in_place() {
    let dir = TempDir::new().unwrap();
    let path = write_input(
        &dir,
        r#"{
            "functionResults": [{"name": "login", "embedding": [0.0, 1.0], "textSummary": "Logs a user in"}],
            "routeResults": [],
            "modelResults": []
        }"#,
    );

    annotate(&path, hash_model()).await.unwrap();

    let output = read_output(&path);
    let record = output["functionResults"][0].as_object().unwrap();
    let keys: Vec<&str> = record.keys().map(String::as_str).collect();
    assert_eq!(keys, ["name", "embedding", "textSummary"]);

    let embedding = as_vector(&record["embedding"]);
    assert_eq!(embedding.len(), TEST_DIMENSIONS);
}

#[tokio::test]
async fn test_missing_and_null_collections() {
    let dir = TempDir::new().unwrap();
    let path = write_input(
        &dir,
        r#"{"functionResults": [{"name": "ping", "textSummary": "Health check"}], "routeResults": null}"#,
    );

    let report = annotate(&path, hash_model()).await.unwrap();
    assert_eq!(report.total_embedded(), 1);
    assert_eq!(report.route_results, CollectionStats::default());

    let output = read_output(&path);
    assert_eq!(output["routeResults"], Value::Null);
    assert!(output.get("modelResults").is_none());
}

#[tokio::test]
async fn test_large_integer_survives_rewrite() {
    let dir = TempDir::new().unwrap();
    let path = write_input(
        &dir,
        r#"{"functionResults": [{"name": "foo", "id": 123456789012345678901234567890, "textSummary": "adds two numbers"}], "routeResults": [], "modelResults": []}"#,
    );

    annotate(&path, hash_model()).await.unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(
        written.contains("      \"id\": 123456789012345678901234567890,\n"),
        "{}",
        written
    );
}

#[tokio::test]
async fn test_non_ascii_summary_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = write_input(
        &dir,
        r#"{"functionResults": [{"name": "résumé", "textSummary": "Génère un résumé ✓"}], "routeResults": [], "modelResults": []}"#,
    );

    annotate(&path, hash_model()).await.unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("Génère un résumé ✓"));
    let output: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(output["functionResults"][0]["name"], "résumé");
}

#[tokio::test]
async fn test_records_embedded_in_collection_order() {
    let dir = TempDir::new().unwrap();
    let path = write_input(
        &dir,
        r#"{
            "modelResults": [{"name": "m", "textSummary": "model"}],
            "routeResults": [{"name": "r", "textSummary": "route"}],
            "functionResults": [{"name": "f1", "textSummary": "first"}, {"name": "f2", "textSummary": "second"}]
        }"#,
    );

    let model = CountingModel::new(TEST_DIMENSIONS);
    let report = annotate(&path, model.clone()).await.unwrap();

    assert_eq!(report.function_results.embedded, 2);
    assert_eq!(report.route_results.embedded, 1);
    assert_eq!(report.model_results.embedded, 1);
    assert_eq!(model.texts_seen(), 4);

    let output = read_output(&path);
    assert_close(
        &as_vector(&output["functionResults"][1]["embedding"]),
        &model.expected("second"),
    );
    assert_close(
        &as_vector(&output["modelResults"][0]["embedding"]),
        &model.expected("model"),
    );
}
