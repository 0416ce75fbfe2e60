//! Morpheus sub-provider

use crate::SUB_PROVIDER_NAME;
use crate::clientfactory::ClientFactory;
use crate::datasources::{cloud, environment, group};
use crate::model::SubModel;
use crate::resources::{role, user};
use hpe_subprovider::{
    Attribute, BlockAccessor, DataSourceFactory, ProviderDataEntry, ResourceFactory, Result,
    SubProvider, Validator,
};
use std::collections::BTreeMap;
use std::sync::Arc;

type NewClientFactory = Arc<dyn Fn(SubModel) -> ClientFactory + Send + Sync>;

pub struct MorpheusSubProvider {
    new_client_factory: NewClientFactory,
}

impl MorpheusSubProvider {
    pub fn new() -> Self {
        Self {
            new_client_factory: Arc::new(ClientFactory::new),
        }
    }

    /// Override how the client factory is built from the parsed block
    pub fn with_client_factory<F>(mut self, f: F) -> Self
    where
        F: Fn(SubModel) -> ClientFactory + Send + Sync + 'static,
    {
        self.new_client_factory = Arc::new(f);
        self
    }
}

impl Default for MorpheusSubProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SubProvider for MorpheusSubProvider {
    fn name(&self) -> &str {
        SUB_PROVIDER_NAME
    }

    fn schema(&self) -> BTreeMap<String, Attribute> {
        let mut attributes = BTreeMap::new();
        attributes.insert(
            "url".to_string(),
            Attribute::required_string()
                .description("Morpheus instance URL")
                .validator(Validator::AnyOf(vec![
                    Validator::also_requires("username"),
                    Validator::also_requires("access_token"),
                ])),
        );
        attributes.insert(
            "username".to_string(),
            Attribute::optional_string()
                .description("Morpheus username for authentication, required if password is set")
                .validator(Validator::also_requires("password")),
        );
        attributes.insert(
            "password".to_string(),
            Attribute::optional_string()
                .sensitive()
                .description("Morpheus password for authentication, required if username is set")
                .validator(Validator::also_requires("username")),
        );
        attributes.insert(
            "access_token".to_string(),
            Attribute::optional_string()
                .sensitive()
                .description("Morpheus access token for authentication")
                .validator(Validator::conflicts_with("username"))
                .validator(Validator::conflicts_with("password")),
        );
        attributes.insert(
            "insecure".to_string(),
            Attribute::optional_bool().description(
                "Explicitly allow the provider to perform \"insecure\" SSL requests. \
                 If omitted, default value is `false`",
            ),
        );
        attributes
    }

    fn configure(&self, block: BlockAccessor<'_>) -> Result<Option<ProviderDataEntry>> {
        let Some(model) = block.decode_single::<SubModel>()? else {
            tracing::debug!("no morpheus provider block");
            return Ok(None);
        };

        tracing::info!("configuring morpheus client for {}", model.url);
        let factory = (self.new_client_factory)(model);
        Ok(Some(Arc::new(factory)))
    }

    fn resources(&self) -> Vec<ResourceFactory> {
        vec![user::UserResource::boxed, role::RoleResource::boxed]
    }

    fn data_sources(&self) -> Vec<DataSourceFactory> {
        vec![
            group::GroupDataSource::boxed,
            cloud::CloudDataSource::boxed,
            environment::EnvironmentDataSource::boxed,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpe_subprovider::{ProviderError, Schema, Block};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_absent_block_is_inert() {
        let config = json!({});
        let entry = MorpheusSubProvider::new()
            .configure(BlockAccessor::new(SUB_PROVIDER_NAME, &config))
            .unwrap();
        assert!(entry.is_none());
    }

    #[test]
    fn test_single_block_yields_factory() {
        let config = json!({"morpheus": [{"url": "https://m", "access_token": "t"}]});
        let entry = MorpheusSubProvider::new()
            .configure(BlockAccessor::new(SUB_PROVIDER_NAME, &config))
            .unwrap()
            .unwrap();
        let factory = entry.downcast::<ClientFactory>().unwrap();
        assert_eq!(factory.model().url, "https://m");
    }

    #[test]
    fn test_two_blocks_rejected() {
        let block = json!({"url": "https://m", "access_token": "t"});
        let config = json!({"morpheus": [block.clone(), block]});
        let err = MorpheusSubProvider::new()
            .configure(BlockAccessor::new(SUB_PROVIDER_NAME, &config))
            .unwrap_err();
        assert!(matches!(err, ProviderError::BlockCardinality { len: 2, .. }));
    }

    #[test]
    fn test_with_client_factory_override() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let sp = MorpheusSubProvider::new().with_client_factory(move |model| {
            counter.fetch_add(1, Ordering::SeqCst);
            ClientFactory::new(model)
        });

        let config = json!({"morpheus": [{"url": "https://m", "access_token": "t"}]});
        sp.configure(BlockAccessor::new(SUB_PROVIDER_NAME, &config))
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_schema_marks_secrets() {
        let schema = MorpheusSubProvider::new().schema();
        assert!(schema["url"].required);
        assert!(schema["password"].sensitive);
        assert!(schema["access_token"].sensitive);
        assert!(!schema["username"].sensitive);
    }

    #[test]
    fn test_schema_validation() {
        let schema = Schema::new().with_block(
            SUB_PROVIDER_NAME,
            Block::list_nested(MorpheusSubProvider::new().schema()).size_between(0, 1),
        );

        let ok = schema.validate(&json!({"morpheus": [{
            "url": "https://m",
            "username": "admin",
            "password": "pw"
        }]}));
        assert!(!ok.has_error(), "{}", ok);

        let conflicting = schema.validate(&json!({"morpheus": [{
            "url": "https://m",
            "username": "admin",
            "password": "pw",
            "access_token": "t"
        }]}));
        assert!(conflicting.has_error());
    }

    #[test]
    fn test_registrations() {
        let sp = MorpheusSubProvider::new();
        let resources: Vec<String> = sp
            .resources()
            .into_iter()
            .map(|f| f().type_name("hpe"))
            .collect();
        assert_eq!(resources, vec!["hpe_morpheus_user", "hpe_morpheus_role"]);

        let data_sources: Vec<String> = sp
            .data_sources()
            .into_iter()
            .map(|f| f().type_name("hpe"))
            .collect();
        assert_eq!(
            data_sources,
            vec!["hpe_morpheus_group", "hpe_morpheus_cloud", "hpe_morpheus_environment"]
        );
    }
}
