//! Sub-provider trait definition

use crate::config::BlockAccessor;
use crate::error::Result;
use crate::provider_data::ProviderDataEntry;
use crate::resource::{DataSourceFactory, ResourceFactory};
use crate::schema::Attribute;
use std::collections::BTreeMap;

/// An independently developed slice of the provider
///
/// Each sub-provider owns one list-nested block of the provider
/// configuration, named after [`SubProvider::name`], plus the resources and
/// data sources that use the client built from that block.
pub trait SubProvider: Send + Sync {
    /// Block name and `ProviderData` key, e.g. "morpheus"
    fn name(&self) -> &str;

    /// Attributes of the sub-provider's configuration block
    fn schema(&self) -> BTreeMap<String, Attribute>;

    /// Parse the block and build the value resources will use
    ///
    /// Returns `Ok(None)` when the block is absent; the sub-provider is then
    /// inert and gets no `ProviderData` entry.
    fn configure(&self, block: BlockAccessor<'_>) -> Result<Option<ProviderDataEntry>>;

    fn resources(&self) -> Vec<ResourceFactory>;

    fn data_sources(&self) -> Vec<DataSourceFactory>;
}
