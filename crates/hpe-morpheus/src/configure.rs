//! Configure mixin embedded in every Morpheus resource and data source

use crate::SUB_PROVIDER_NAME;
use crate::client::MorpheusClient;
use crate::clientfactory::ClientFactory;
use crate::error::{MorpheusError, Result};
use async_trait::async_trait;
use hpe_subprovider::{ConfigureClient, Diagnostic, Diagnostics, ProviderData};
use std::sync::Arc;

const MISSING_BLOCK_DETAIL: &str = r#"
Morpheus resource present, but possible missing morpheus provider block.

provider "hpe" {
  morpheus { <- missing or duplicate?
    url = "https://example.com"
  }
}"#;

/// Holds the bound client factory once `configure` succeeds
#[derive(Debug, Default, Clone)]
pub struct MorpheusConfigure {
    factory: Option<Arc<ClientFactory>>,
}

impl MorpheusConfigure {
    pub fn is_configured(&self) -> bool {
        self.factory.is_some()
    }
}

#[async_trait]
impl ConfigureClient for MorpheusConfigure {
    type Client = MorpheusClient;
    type Error = MorpheusError;

    fn block_name(&self) -> &str {
        SUB_PROVIDER_NAME
    }

    fn configure(&mut self, provider_data: Option<&ProviderData>) -> Diagnostics {
        // the provider may not be configured yet
        let Some(provider_data) = provider_data else {
            return Diagnostics::new();
        };

        match provider_data.get::<ClientFactory>(self.block_name()) {
            Ok(factory) => {
                self.factory = Some(factory);
                Diagnostics::new()
            }
            Err(e) => {
                tracing::debug!("no {} provider data: {}", self.block_name(), e);
                Diagnostic::error(
                    format!("{} client creation failed", self.block_name()),
                    MISSING_BLOCK_DETAIL,
                )
                .into()
            }
        }
    }

    async fn new_client(&self) -> Result<MorpheusClient> {
        match &self.factory {
            Some(factory) => factory.new_client().await,
            None => Err(MorpheusError::NotConfigured),
        }
    }
}
