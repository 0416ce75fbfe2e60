//! Parsed `morpheus` provider block

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Contents of the `morpheus { ... }` block
///
/// Secrets are wrapped in `SecretString` so they never show up in `Debug`
/// output or logs.
#[derive(Debug, Deserialize)]
pub struct SubModel {
    pub url: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<SecretString>,

    #[serde(default)]
    pub access_token: Option<SecretString>,

    #[serde(default)]
    pub insecure: Option<bool>,
}

/// How the client authenticates
#[derive(Debug)]
pub enum Credentials {
    Token(SecretString),
    Password {
        username: String,
        password: SecretString,
    },
    None,
}

impl SubModel {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
            access_token: None,
            insecure: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(SecretString::from(token.into()));
        self
    }

    pub fn with_password(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(SecretString::from(password.into()));
        self
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = Some(insecure);
        self
    }

    pub fn insecure(&self) -> bool {
        self.insecure.unwrap_or(false)
    }

    /// Credential branch; a non-empty access token wins
    pub fn credentials(&self) -> Credentials {
        if let Some(token) = self
            .access_token
            .as_ref()
            .filter(|t| !t.expose_secret().is_empty())
        {
            return Credentials::Token(token.clone());
        }

        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Credentials::Password {
                username: username.clone(),
                password: password.clone(),
            },
            _ => Credentials::None,
        }
    }
}
