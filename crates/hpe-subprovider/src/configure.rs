//! Configure mixin contract shared by resources and data sources

use crate::diagnostics::Diagnostics;
use crate::provider_data::ProviderData;
use async_trait::async_trait;

/// Binds a sub-provider's client factory out of [`ProviderData`]
///
/// Resources and data sources hold an implementation by value and forward
/// their own `configure` to it.
#[async_trait]
pub trait ConfigureClient: Send + Sync {
    type Client: Send;
    type Error: Send;

    /// `ProviderData` key this mixin reads
    fn block_name(&self) -> &str;

    /// A `None` argument is a no-op
    fn configure(&mut self, provider_data: Option<&ProviderData>) -> Diagnostics;

    /// Fresh client from the bound factory
    async fn new_client(&self) -> Result<Self::Client, Self::Error>;
}
