// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod embed;
pub mod errors;
pub mod server;

pub use embed::{
    generate_embeddings, generate_embeddings_handler, GenerateEmbeddingsRequest,
    GenerateEmbeddingsResponse,
};
pub use errors::{ApiError, ErrorResponse};
pub use server::{create_router, serve, start_server, AppState, GENERATE_EMBEDDINGS_ROUTE};
