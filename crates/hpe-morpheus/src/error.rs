//! Morpheus sub-provider error types

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MorpheusError {
    #[error(
        "could not authenticate with the Morpheus API using the username:'{username}', verify that the credentials are correct: {source}"
    )]
    Auth {
        username: String,
        #[source]
        source: Box<MorpheusError>,
    },

    #[error("{context} ({}): {body}", .status.canonical_reason().unwrap_or("Unknown Status"))]
    Api {
        context: String,
        status: StatusCode,
        body: String,
    },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("morpheus client factory not configured")]
    NotConfigured,

    #[error("no credentials configured")]
    MissingCredentials,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("failed to rebuild response: {0}")]
    Http(#[from] http::Error),
}

impl MorpheusError {
    /// HTTP status of an upstream API error
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            MorpheusError::Api { status, .. } => Some(*status),
            MorpheusError::Auth { source, .. } => source.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MorpheusError>;
