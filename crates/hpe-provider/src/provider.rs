//! Provider composer
//!
//! Merges independently developed sub-providers into one provider: one
//! list-nested block per sub-provider in the schema, one `ProviderData`
//! entry per configured block, and the union of their resources and data
//! sources.

use hpe_morpheus::MorpheusSubProvider;
use hpe_subprovider::{
    Block, BlockAccessor, DataSourceFactory, Diagnostic, Diagnostics, ProviderData,
    ResourceFactory, Schema, SubProvider,
};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Provider type name; prefixes every resource and data source type name
pub const TYPE_NAME: &str = "hpe";

pub struct HpeProvider {
    version: String,
    subproviders: Vec<Arc<dyn SubProvider>>,
}

impl HpeProvider {
    /// Provider with every built-in sub-provider
    pub fn new(version: impl Into<String>) -> Self {
        Self::with_subproviders(version, vec![Arc::new(MorpheusSubProvider::new())])
    }

    pub fn with_subproviders(
        version: impl Into<String>,
        subproviders: Vec<Arc<dyn SubProvider>>,
    ) -> Self {
        Self {
            version: version.into(),
            subproviders,
        }
    }

    pub fn type_name(&self) -> &str {
        TYPE_NAME
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn subproviders(&self) -> &[Arc<dyn SubProvider>] {
        &self.subproviders
    }

    pub fn schema(&self) -> Schema {
        self.subproviders
            .iter()
            .fold(Schema::new(), |schema, sp| {
                let block = Block::list_nested(sp.schema()).size_between(0, 1);
                schema.with_block(sp.name(), block)
            })
    }

    /// Static validation of the provider configuration
    pub fn validate_config(&self, config: &Value) -> Diagnostics {
        self.schema().validate(config)
    }

    /// Validate, then run every sub-provider's configure step
    ///
    /// The first failing sub-provider aborts configuration.
    pub fn configure(&self, config: &Value) -> Result<ProviderData, Diagnostics> {
        let diags = self.validate_config(config);
        if diags.has_error() {
            return Err(diags);
        }

        let mut data = ProviderData::new();
        for sp in &self.subproviders {
            let name = sp.name();
            match sp.configure(BlockAccessor::new(name, config)) {
                Ok(Some(entry)) => {
                    tracing::debug!("sub-provider {} configured", name);
                    data.insert(name, entry);
                }
                Ok(None) => tracing::debug!("sub-provider {} has no block, skipping", name),
                Err(e) => {
                    tracing::error!("sub-provider {} configuration failed: {}", name, e);
                    return Err(Diagnostic::error(
                        format!("{} provider configuration failed", name),
                        e.to_string(),
                    )
                    .with_attribute(name)
                    .into());
                }
            }
        }
        Ok(data)
    }

    pub fn resources(&self) -> Vec<ResourceFactory> {
        self.subproviders
            .iter()
            .flat_map(|sp| sp.resources())
            .collect()
    }

    pub fn data_sources(&self) -> Vec<DataSourceFactory> {
        self.subproviders
            .iter()
            .flat_map(|sp| sp.data_sources())
            .collect()
    }

    /// Report sub-provider name clashes and duplicate type names
    pub fn validate_registrations(&self) -> Diagnostics {
        let mut diags = Diagnostics::new();

        let mut names = HashSet::new();
        for sp in &self.subproviders {
            if !names.insert(sp.name()) {
                diags.add_error(
                    "Duplicate sub-provider",
                    format!("sub-provider block \"{}\" is registered more than once", sp.name()),
                );
            }
        }

        let mut seen = HashSet::new();
        for factory in self.resources() {
            let type_name = factory().type_name(TYPE_NAME);
            if !seen.insert(type_name.clone()) {
                diags.add_error(
                    "Duplicate resource type",
                    format!("resource type \"{}\" is registered more than once", type_name),
                );
            }
        }

        let mut seen = HashSet::new();
        for factory in self.data_sources() {
            let type_name = factory().type_name(TYPE_NAME);
            if !seen.insert(type_name.clone()) {
                diags.add_error(
                    "Duplicate data source type",
                    format!("data source type \"{}\" is registered more than once", type_name),
                );
            }
        }

        diags
    }
}

impl std::fmt::Debug for HpeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.subproviders.iter().map(|sp| sp.name()).collect();
        f.debug_struct("HpeProvider")
            .field("version", &self.version)
            .field("subproviders", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeSubProvider, Marker};
    use serde_json::json;

    fn provider() -> HpeProvider {
        HpeProvider::with_subproviders(
            "1.2.3",
            vec![
                Arc::new(FakeSubProvider::new("alpha")),
                Arc::new(FakeSubProvider::new("beta")),
            ],
        )
    }

    #[test]
    fn test_schema_has_block_per_subprovider() {
        let schema = provider().schema();
        assert_eq!(schema.blocks.len(), 2);
        for name in ["alpha", "beta"] {
            let block = &schema.blocks[name];
            assert_eq!(block.min_items, 0);
            assert_eq!(block.max_items, Some(1));
            assert!(block.attributes.contains_key("endpoint"));
        }
        assert!(schema.attributes.is_empty());
    }

    #[test]
    fn test_configure_absent_blocks_are_inert() {
        let data = provider().configure(&json!({})).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_configure_one_entry_per_block() {
        let data = provider()
            .configure(&json!({"beta": [{"endpoint": "https://b"}]}))
            .unwrap();
        assert!(!data.contains("alpha"));
        let marker = data.get::<Marker>("beta").unwrap();
        assert_eq!(marker.endpoint, "https://b");
    }

    #[test]
    fn test_two_blocks_rejected_before_configure() {
        let sp = Arc::new(FakeSubProvider::new("alpha"));
        let provider = HpeProvider::with_subproviders("1", vec![sp.clone()]);
        let block = json!({"endpoint": "https://a"});

        let diags = provider
            .configure(&json!({"alpha": [block.clone(), block]}))
            .unwrap_err();
        assert!(diags.contains("at most 1 elements, got: 2"));
        assert_eq!(sp.configure_calls(), 0);
    }

    #[test]
    fn test_failing_subprovider_aborts() {
        let provider = HpeProvider::with_subproviders(
            "1",
            vec![
                Arc::new(FakeSubProvider::new("alpha").failing()),
                Arc::new(FakeSubProvider::new("beta")),
            ],
        );
        let diags = provider
            .configure(&json!({
                "alpha": [{"endpoint": "a"}],
                "beta": [{"endpoint": "b"}]
            }))
            .unwrap_err();

        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.summary, "alpha provider configuration failed");
        assert_eq!(diag.attribute.as_deref(), Some("alpha"));
    }

    #[test]
    fn test_aggregation_is_concatenation() {
        let provider = provider();
        let names: Vec<String> = provider
            .resources()
            .into_iter()
            .map(|f| f().type_name(TYPE_NAME))
            .collect();
        assert_eq!(names, vec!["hpe_alpha_thing", "hpe_beta_thing"]);
        assert_eq!(provider.data_sources().len(), 2);
        assert!(provider.validate_registrations().is_empty());
    }

    #[test]
    fn test_duplicate_registrations_detected() {
        let provider = HpeProvider::with_subproviders(
            "1",
            vec![
                Arc::new(FakeSubProvider::new("alpha")),
                Arc::new(FakeSubProvider::new("alpha")),
            ],
        );
        let diags = provider.validate_registrations();
        assert!(diags.contains("sub-provider block \"alpha\" is registered more than once"));
        assert!(diags.contains("resource type \"hpe_alpha_thing\" is registered more than once"));
        assert!(diags.contains("data source type \"hpe_alpha_lookup\" is registered more than once"));
    }

    #[test]
    fn test_default_provider_registrations() {
        let provider = HpeProvider::new("dev");
        assert_eq!(provider.type_name(), "hpe");
        assert_eq!(provider.version(), "dev");
        assert!(provider.validate_registrations().is_empty());
        assert!(provider.schema().blocks.contains_key("morpheus"));
    }
}
