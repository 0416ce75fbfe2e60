//! In-process host harness
//!
//! Plays the part of the plugin host: it indexes registrations by type
//! name, configures the provider once, then for every operation builds a
//! fresh resource or data source instance, hands it the provider data and
//! dispatches the call.

use crate::provider::HpeProvider;
use hpe_subprovider::{
    DataSource, DataSourceFactory, Diagnostics, ProviderData, Resource, ResourceFactory,
    ResourceResponse, Schema,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Everything the host needs to know about the provider's shape
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchema {
    pub type_name: String,
    pub version: String,
    pub provider: Schema,
    pub resources: BTreeMap<String, Schema>,
    pub data_sources: BTreeMap<String, Schema>,
}

pub struct ProviderServer {
    provider: HpeProvider,
    resources: BTreeMap<String, ResourceFactory>,
    data_sources: BTreeMap<String, DataSourceFactory>,
    provider_data: Option<Arc<ProviderData>>,
}

impl ProviderServer {
    /// Index the provider's registrations
    ///
    /// Fails when two registrations share a type name.
    pub fn new(provider: HpeProvider) -> Result<Self, Diagnostics> {
        let diags = provider.validate_registrations();
        if diags.has_error() {
            return Err(diags);
        }

        let type_name = provider.type_name().to_string();
        let resources = provider
            .resources()
            .into_iter()
            .map(|factory| (factory().type_name(&type_name), factory))
            .collect();
        let data_sources = provider
            .data_sources()
            .into_iter()
            .map(|factory| (factory().type_name(&type_name), factory))
            .collect();

        Ok(Self {
            provider,
            resources,
            data_sources,
            provider_data: None,
        })
    }

    pub fn provider(&self) -> &HpeProvider {
        &self.provider
    }

    pub fn schema(&self) -> ProviderSchema {
        ProviderSchema {
            type_name: self.provider.type_name().to_string(),
            version: self.provider.version().to_string(),
            provider: self.provider.schema(),
            resources: self
                .resources
                .iter()
                .map(|(name, factory)| (name.clone(), factory().schema()))
                .collect(),
            data_sources: self
                .data_sources
                .iter()
                .map(|(name, factory)| (name.clone(), factory().schema()))
                .collect(),
        }
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn data_source_types(&self) -> impl Iterator<Item = &str> {
        self.data_sources.keys().map(String::as_str)
    }

    pub fn is_configured(&self) -> bool {
        self.provider_data.is_some()
    }

    /// Configure the provider; on success the provider data is kept for
    /// every later operation
    pub fn configure(&mut self, config: &Value) -> Diagnostics {
        match self.provider.configure(config) {
            Ok(data) => {
                tracing::info!(
                    "provider {} configured with {} sub-provider(s)",
                    self.provider.type_name(),
                    data.len()
                );
                self.provider_data = Some(Arc::new(data));
                Diagnostics::new()
            }
            Err(diags) => diags,
        }
    }

    pub fn validate_resource_config(&self, type_name: &str, config: &Value) -> Diagnostics {
        match self.resources.get(type_name) {
            Some(factory) => factory().schema().validate(config),
            None => unknown_type("resource", type_name),
        }
    }

    pub fn validate_data_source_config(&self, type_name: &str, config: &Value) -> Diagnostics {
        match self.data_sources.get(type_name) {
            Some(factory) => factory().schema().validate(config),
            None => unknown_type("data source", type_name),
        }
    }

    /// Fresh, configured resource instance
    fn resource(&self, type_name: &str) -> Result<Box<dyn Resource>, Diagnostics> {
        let factory = self
            .resources
            .get(type_name)
            .ok_or_else(|| unknown_type("resource", type_name))?;
        let mut resource = factory();
        let diags = resource.configure(self.provider_data.as_deref());
        if diags.has_error() {
            return Err(diags);
        }
        Ok(resource)
    }

    fn data_source(&self, type_name: &str) -> Result<Box<dyn DataSource>, Diagnostics> {
        let factory = self
            .data_sources
            .get(type_name)
            .ok_or_else(|| unknown_type("data source", type_name))?;
        let mut data_source = factory();
        let diags = data_source.configure(self.provider_data.as_deref());
        if diags.has_error() {
            return Err(diags);
        }
        Ok(data_source)
    }

    pub async fn create_resource(&self, type_name: &str, plan: &Value) -> ResourceResponse {
        let diags = self.validate_resource_config(type_name, plan);
        if diags.has_error() {
            return ResourceResponse::from_diagnostics(diags);
        }
        match self.resource(type_name) {
            Ok(resource) => resource.create(plan).await,
            Err(diags) => ResourceResponse::from_diagnostics(diags),
        }
    }

    pub async fn read_resource(&self, type_name: &str, state: &Value) -> ResourceResponse {
        match self.resource(type_name) {
            Ok(resource) => resource.read(state).await,
            Err(diags) => ResourceResponse::from_diagnostics(diags),
        }
    }

    pub async fn update_resource(
        &self,
        type_name: &str,
        plan: &Value,
        prior_state: &Value,
    ) -> ResourceResponse {
        match self.resource(type_name) {
            Ok(resource) => resource.update(plan, prior_state).await,
            Err(diags) => ResourceResponse::from_diagnostics(diags),
        }
    }

    pub async fn delete_resource(&self, type_name: &str, state: &Value) -> Diagnostics {
        match self.resource(type_name) {
            Ok(resource) => resource.delete(state).await,
            Err(diags) => diags,
        }
    }

    /// Import `id`, then read the resulting state back like the host does
    pub async fn import_resource(&self, type_name: &str, id: &str) -> ResourceResponse {
        let resource = match self.resource(type_name) {
            Ok(resource) => resource,
            Err(diags) => return ResourceResponse::from_diagnostics(diags),
        };

        let imported = resource.import_state(id).await;
        let Some(state) = imported.state.filter(|_| !imported.diagnostics.has_error()) else {
            return ResourceResponse::from_diagnostics(imported.diagnostics);
        };

        let mut resp = resource.read(&state).await;
        let mut diagnostics = imported.diagnostics;
        diagnostics.extend(resp.diagnostics);
        resp.diagnostics = diagnostics;
        resp
    }

    pub async fn read_data_source(&self, type_name: &str, config: &Value) -> ResourceResponse {
        let diags = self.validate_data_source_config(type_name, config);
        if diags.has_error() {
            return ResourceResponse::from_diagnostics(diags);
        }
        match self.data_source(type_name) {
            Ok(data_source) => data_source.read(config).await,
            Err(diags) => ResourceResponse::from_diagnostics(diags),
        }
    }
}

fn unknown_type(kind: &str, type_name: &str) -> Diagnostics {
    let mut diags = Diagnostics::new();
    diags.add_error(
        format!("Unknown {} type", kind),
        format!("The provider does not support {} type \"{}\".", kind, type_name),
    );
    diags
}
