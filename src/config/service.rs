// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Embedding service configuration

use super::ModelConfig;
use std::env;
use std::net::SocketAddr;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to
    pub listen_addr: String,
    /// Model loaded once at startup
    pub model: ModelConfig,
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            listen_addr: env::var("EMBEDDING_API_ADDR")
                .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string()),
            model: ModelConfig::from_env(),
        }
    }

    /// Parsed listen address
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        self.listen_addr
            .parse()
            .map_err(|e| format!("Invalid listen address '{}': {}", self.listen_addr, e))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.socket_addr()?;
        self.model.validate()
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            model: ModelConfig::default(),
        }
    }
}
