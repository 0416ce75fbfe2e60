//! HTTP transport layering
//!
//! A [`Transport`] sends one request and returns the response. The client
//! factory stacks transports: tracing, then authentication, then the base
//! [`HttpTransport`] that owns the `reqwest` connection pool.

use crate::error::{MorpheusError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use url::Url;

/// Upper bound for any single call to the API
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[async_trait]
pub trait Transport: Send + Sync {
    async fn round_trip(&self, request: reqwest::Request) -> Result<reqwest::Response>;
}

/// Base transport over a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build the base client; certificate verification is disabled iff `insecure`
    pub fn new(insecure: bool) -> Result<Self> {
        if insecure {
            tracing::warn!("TLS certificate verification disabled for Morpheus API");
        }

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn round_trip(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        Ok(self.client.execute(request).await?)
    }
}

/// Settings shared between an API client and its auth transport
///
/// `default_headers` are copied onto every outgoing request; the auth
/// transport stores the bearer token there once acquired.
#[derive(Debug)]
pub struct ClientConfig {
    base_url: Url,
    default_headers: RwLock<HeaderMap>,
}

impl ClientConfig {
    pub fn new(url: &str) -> Result<Self> {
        let base_url = Url::parse(url)
            .map_err(|e| MorpheusError::InvalidConfig(format!("invalid url '{}': {}", url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(MorpheusError::InvalidConfig(format!(
                "invalid url '{}': not a base url",
                url
            )));
        }

        Ok(Self {
            base_url,
            default_headers: RwLock::new(HeaderMap::new()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `segments` appended to its path
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn default_header(&self, name: &HeaderName) -> Option<HeaderValue> {
        self.default_headers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn set_default_header(&self, name: HeaderName, value: HeaderValue) {
        self.default_headers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, value);
    }

    /// Copy default headers onto `headers` without overriding existing ones
    pub fn apply_default_headers(&self, headers: &mut HeaderMap) {
        let defaults = self
            .default_headers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for (name, value) in defaults.iter() {
            if !headers.contains_key(name) {
                headers.insert(name.clone(), value.clone());
            }
        }
    }
}
