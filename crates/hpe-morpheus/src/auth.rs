//! Bearer-token authentication transports

use crate::error::{MorpheusError, Result};
use crate::transport::{ClientConfig, REQUEST_TIMEOUT, Transport};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;

const CLIENT_ID: &str = "morpheus-terraform";
const GRANT_TYPE: &str = "password";
const SCOPE: &str = "write";

struct PasswordGrant {
    username: String,
    password: SecretString,
}

/// Acquires a token with a password grant and refreshes it once on 401
///
/// The token is cached as the `Authorization` default header of the shared
/// [`ClientConfig`]. Acquisition is serialized by `token_lock`, so concurrent
/// first requests trigger a single token request.
pub struct CredsTransport {
    base: Arc<dyn Transport>,
    config: Arc<ClientConfig>,
    grant: Option<PasswordGrant>,
    token_lock: Mutex<()>,
}

impl CredsTransport {
    pub fn new(
        base: Arc<dyn Transport>,
        config: Arc<ClientConfig>,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            base,
            config,
            grant: Some(PasswordGrant {
                username: username.into(),
                password,
            }),
            token_lock: Mutex::new(()),
        }
    }

    /// Transport whose every token acquisition fails
    pub fn without_credentials(base: Arc<dyn Transport>, config: Arc<ClientConfig>) -> Self {
        Self {
            base,
            config,
            grant: None,
            token_lock: Mutex::new(()),
        }
    }

    /// Cached header value, fetching a token first if none is cached
    async fn auth_header(&self) -> Result<HeaderValue> {
        let _guard = self.token_lock.lock().await;
        if let Some(value) = self.config.default_header(&AUTHORIZATION) {
            return Ok(value);
        }
        self.fetch_token().await
    }

    /// Unconditionally fetch a new token
    async fn refresh(&self) -> Result<HeaderValue> {
        let _guard = self.token_lock.lock().await;
        self.fetch_token().await
    }

    // Caller holds token_lock.
    async fn fetch_token(&self) -> Result<HeaderValue> {
        let Some(grant) = &self.grant else {
            return Err(MorpheusError::Auth {
                username: String::new(),
                source: Box::new(MorpheusError::MissingCredentials),
            });
        };

        let token = tokio::time::timeout(REQUEST_TIMEOUT, self.request_token(grant))
            .await
            .unwrap_or(Err(MorpheusError::Timeout(REQUEST_TIMEOUT)))
            .map_err(|e| MorpheusError::Auth {
                username: grant.username.clone(),
                source: Box::new(e),
            })?;

        let value = bearer(token.expose_secret())?;
        self.config.set_default_header(AUTHORIZATION, value.clone());
        Ok(value)
    }

    async fn request_token(&self, grant: &PasswordGrant) -> Result<SecretString> {
        let mut url = self.config.endpoint(&["oauth", "token"]);
        url.query_pairs_mut()
            .append_pair("client_id", CLIENT_ID)
            .append_pair("grant_type", GRANT_TYPE)
            .append_pair("scope", SCOPE);

        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("username", &grant.username)
            .append_pair("password", grant.password.expose_secret())
            .finish();

        let mut request = reqwest::Request::new(Method::POST, url);
        let headers = request.headers_mut();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        *request.body_mut() = Some(body.into());

        let response = self.base.round_trip(request).await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(MorpheusError::Api {
                context: "token request failed".to_string(),
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let token: TokenResponse = serde_json::from_slice(&bytes)?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl Transport for CredsTransport {
    async fn round_trip(&self, mut request: reqwest::Request) -> Result<reqwest::Response> {
        if !request.headers().contains_key(AUTHORIZATION) {
            let value = self.auth_header().await?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        let replay = request.try_clone();
        let response = self.base.round_trip(request).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let Some(mut replay) = replay else {
            tracing::debug!("request body cannot be replayed, not refreshing token");
            return Ok(response);
        };

        tracing::debug!("refreshing token");
        let value = self.refresh().await?;
        tracing::debug!("new token successfully acquired");

        replay.headers_mut().insert(AUTHORIZATION, value);
        self.base.round_trip(replay).await
    }
}

/// Sends a pre-issued access token; no refresh
pub struct TokenTransport {
    base: Arc<dyn Transport>,
    token: SecretString,
}

impl TokenTransport {
    pub fn new(base: Arc<dyn Transport>, token: SecretString) -> Self {
        Self { base, token }
    }
}

#[async_trait]
impl Transport for TokenTransport {
    async fn round_trip(&self, mut request: reqwest::Request) -> Result<reqwest::Response> {
        if !request.headers().contains_key(AUTHORIZATION) {
            let value = bearer(self.token.expose_secret())?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }
        self.base.round_trip(request).await
    }
}

fn bearer(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| MorpheusError::InvalidConfig("access token is not a valid header value".to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: SecretString,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::HttpTransport;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn get(server: &MockServer, p: &str) -> reqwest::Request {
        let url = format!("{}{}", server.uri(), p).parse().unwrap();
        reqwest::Request::new(Method::GET, url)
    }

    fn creds(server: &MockServer, password: &str) -> (CredsTransport, Arc<ClientConfig>) {
        let base: Arc<dyn Transport> = Arc::new(HttpTransport::new(false).unwrap());
        let config = Arc::new(ClientConfig::new(&server.uri()).unwrap());
        let transport = CredsTransport::new(
            base,
            Arc::clone(&config),
            "admin",
            SecretString::from(password.to_string()),
        );
        (transport, config)
    }

    #[tokio::test]
    async fn test_password_grant_request_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(query_param("client_id", "morpheus-terraform"))
            .and(query_param("grant_type", "password"))
            .and(query_param("scope", "write"))
            .and(body_string_contains("username=admin"))
            .and(body_string_contains("password=s%26cret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok-1",
                "token_type": "bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/whoami"))
            .and(header("authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (transport, config) = creds(&server, "s&cret");
        let resp = transport.round_trip(get(&server, "/api/whoami")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let cached = config.default_header(&AUTHORIZATION).unwrap();
        assert_eq!(cached, "Bearer tok-1");
        assert!(cached.is_sensitive());
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let (transport, config) = creds(&server, "wrong");
        let err = transport
            .round_trip(get(&server, "/api/whoami"))
            .await
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("username:'admin'"), "{}", msg);
        assert!(msg.contains("invalid_grant"));
        assert!(!msg.contains("wrong"));
        assert!(config.default_header(&AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_missing_credentials_no_network() {
        let server = MockServer::start().await;
        let base: Arc<dyn Transport> = Arc::new(HttpTransport::new(false).unwrap());
        let config = Arc::new(ClientConfig::new(&server.uri()).unwrap());
        let transport = CredsTransport::without_credentials(base, config);

        let err = transport
            .round_trip(get(&server, "/api/whoami"))
            .await
            .unwrap_err();
        assert!(err.to_string().ends_with("no credentials configured"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_token_transport_keeps_explicit_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer explicit"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let base: Arc<dyn Transport> = Arc::new(HttpTransport::new(false).unwrap());
        let transport = TokenTransport::new(base, SecretString::from("configured".to_string()));

        let mut request = get(&server, "/api/whoami");
        request
            .headers_mut()
            .insert(AUTHORIZATION, HeaderValue::from_static("Bearer explicit"));
        let resp = transport.round_trip(request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
