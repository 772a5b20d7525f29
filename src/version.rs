// Version information for the code documentation embedding tools

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-summary-embeddings-2025-10-20";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2025-10-20";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "batch-annotation",
    "generate-embeddings-endpoint",
    "onnx-runtime",
    "huggingface-download",
    "l2-normalized-embeddings",
    "hash-backend",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("codedoc-embed {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info as JSON
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}
