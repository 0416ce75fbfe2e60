//! Lazily built, credential-aware client factory
//!
//! One factory exists per configured `morpheus` block. It never touches the
//! network at construction; the transport stack is composed on the first
//! [`ClientFactory::new_client`] call and shared by every client it hands
//! out, so the cached token is shared too.

use crate::auth::{CredsTransport, TokenTransport};
use crate::client::MorpheusClient;
use crate::error::Result;
use crate::model::{Credentials, SubModel};
use crate::trace::{self, TraceTransport};
use crate::transport::{ClientConfig, HttpTransport, Transport};
use std::sync::Arc;
use tokio::sync::OnceCell;

struct Stack {
    transport: Arc<dyn Transport>,
    config: Arc<ClientConfig>,
}

pub struct ClientFactory {
    model: SubModel,
    transport: Option<Arc<dyn Transport>>,
    stack: OnceCell<Stack>,
}

impl ClientFactory {
    pub fn new(model: SubModel) -> Self {
        Self::builder(model).build()
    }

    pub fn builder(model: SubModel) -> ClientFactoryBuilder {
        ClientFactoryBuilder {
            model,
            transport: None,
        }
    }

    pub fn model(&self) -> &SubModel {
        &self.model
    }

    /// Fresh API client over the shared transport stack
    ///
    /// Fails only when the URL is invalid or the HTTP client cannot be
    /// built. Credential problems surface on the first request.
    pub async fn new_client(&self) -> Result<MorpheusClient> {
        let stack = self
            .stack
            .get_or_try_init(|| async { self.build_stack() })
            .await?;
        Ok(MorpheusClient::new(
            Arc::clone(&stack.transport),
            Arc::clone(&stack.config),
        ))
    }

    fn build_stack(&self) -> Result<Stack> {
        let config = Arc::new(ClientConfig::new(&self.model.url)?);

        if let Some(transport) = &self.transport {
            tracing::debug!("using injected transport for {}", self.model.url);
            return Ok(Stack {
                transport: Arc::clone(transport),
                config,
            });
        }

        let base: Arc<dyn Transport> = Arc::new(HttpTransport::new(self.model.insecure())?);

        let auth: Arc<dyn Transport> = match self.model.credentials() {
            Credentials::Token(token) => Arc::new(TokenTransport::new(base, token)),
            Credentials::Password { username, password } => Arc::new(CredsTransport::new(
                base,
                Arc::clone(&config),
                username,
                password,
            )),
            Credentials::None => {
                tracing::warn!("no Morpheus credentials configured for {}", self.model.url);
                Arc::new(CredsTransport::without_credentials(base, Arc::clone(&config)))
            }
        };

        let transport: Arc<dyn Transport> = if trace::is_enabled() {
            Arc::new(TraceTransport::new(auth))
        } else {
            auth
        };

        tracing::debug!("built Morpheus transport stack for {}", self.model.url);
        Ok(Stack { transport, config })
    }
}

impl std::fmt::Debug for ClientFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientFactory")
            .field("model", &self.model)
            .field("custom_transport", &self.transport.is_some())
            .field("initialized", &self.stack.initialized())
            .finish()
    }
}

pub struct ClientFactoryBuilder {
    model: SubModel,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientFactoryBuilder {
    /// Use `transport` as-is instead of composing trace, auth and base layers
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> ClientFactory {
        ClientFactory {
            model: self.model,
            transport: self.transport,
            stack: OnceCell::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MorpheusError;

    #[tokio::test]
    async fn test_construction_is_lazy() {
        let factory = ClientFactory::new(SubModel::new("https://morpheus.invalid"));
        assert!(!factory.stack.initialized());

        factory.new_client().await.unwrap();
        assert!(factory.stack.initialized());
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let factory = ClientFactory::new(SubModel::new("::not a url"));
        let err = factory.new_client().await.unwrap_err();
        assert!(matches!(err, MorpheusError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_clients_share_config() {
        let factory = ClientFactory::new(SubModel::new("https://m").with_access_token("t"));
        let a = factory.new_client().await.unwrap();
        let b = factory.new_client().await.unwrap();
        assert!(a.shares_config_with(&b));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let factory = ClientFactory::new(SubModel::new("https://m").with_password("admin", "pw-123"));
        let debug = format!("{:?}", factory);
        assert!(debug.contains("initialized: false"));
        assert!(!debug.contains("pw-123"));
    }
}
