//! Sub-provider error types

use thiserror::Error;

/// Errors raised while composing or configuring sub-providers
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("provider block not configured: {0}")]
    NotConfigured(String),

    #[error("provider data for '{0}' has an unexpected type")]
    WrongType(String),

    #[error("invalid {block} provider block length: expected at most 1, got {len}")]
    BlockCardinality { block: String, len: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProviderError>;
