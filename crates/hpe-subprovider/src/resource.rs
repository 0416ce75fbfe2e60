//! Resource and data source contracts
//!
//! The host calls `configure` on a fresh instance before every operation,
//! passing the published [`ProviderData`] (or `None` before the provider
//! itself is configured, e.g. during validation).

use crate::diagnostics::Diagnostics;
use crate::provider_data::ProviderData;
use crate::schema::Schema;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Result of a resource or data source operation
///
/// `state` is kept even when `diagnostics` carry errors, so partially
/// created objects are still tracked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceResponse {
    pub state: Option<Value>,
    pub diagnostics: Diagnostics,
}

impl ResourceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_diagnostics(diagnostics: Diagnostics) -> Self {
        Self {
            state: None,
            diagnostics,
        }
    }

    /// Serialize `state` as the new state, recording a diagnostic on failure
    pub fn set_state<T: Serialize>(&mut self, state: &T) {
        match serde_json::to_value(state) {
            Ok(value) => self.state = Some(value),
            Err(e) => self
                .diagnostics
                .add_error("Failed to encode state", e.to_string()),
        }
    }

    pub fn add_error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.diagnostics.add_error(summary, detail);
    }

    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }
}

/// Managed resource
#[async_trait]
pub trait Resource: Send + Sync {
    /// Suffix appended to the provider type name, e.g. `morpheus_user`
    fn type_name_suffix(&self) -> &str;

    /// Full type name, e.g. `hpe_morpheus_user`
    fn type_name(&self, provider_type_name: &str) -> String {
        format!("{}_{}", provider_type_name, self.type_name_suffix())
    }

    fn schema(&self) -> Schema;

    fn configure(&mut self, provider_data: Option<&ProviderData>) -> Diagnostics;

    async fn create(&self, plan: &Value) -> ResourceResponse;

    async fn read(&self, state: &Value) -> ResourceResponse;

    async fn update(&self, plan: &Value, prior_state: &Value) -> ResourceResponse;

    async fn delete(&self, state: &Value) -> Diagnostics;

    /// Turn an import id into an initial state the host then reads
    async fn import_state(&self, id: &str) -> ResourceResponse;
}

/// Read-only data source
#[async_trait]
pub trait DataSource: Send + Sync {
    fn type_name_suffix(&self) -> &str;

    fn type_name(&self, provider_type_name: &str) -> String {
        format!("{}_{}", provider_type_name, self.type_name_suffix())
    }

    fn schema(&self) -> Schema;

    fn configure(&mut self, provider_data: Option<&ProviderData>) -> Diagnostics;

    async fn read(&self, config: &Value) -> ResourceResponse;
}

/// Constructor of a fresh resource instance
pub type ResourceFactory = fn() -> Box<dyn Resource>;

/// Constructor of a fresh data source instance
pub type DataSourceFactory = fn() -> Box<dyn DataSource>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct RoleState {
        id: i64,
        name: String,
    }

    #[test]
    fn test_set_state() {
        let mut resp = ResourceResponse::new();
        resp.set_state(&RoleState {
            id: 7,
            name: "ops".to_string(),
        });
        assert_eq!(resp.state, Some(json!({"id": 7, "name": "ops"})));
        assert!(!resp.has_error());
    }

    #[test]
    fn test_state_survives_errors() {
        let mut resp = ResourceResponse::new();
        resp.set_state(&json!({"id": 1}));
        resp.add_error("create user resource", "read back failed");
        assert!(resp.has_error());
        assert_eq!(resp.state, Some(json!({"id": 1})));
    }
}
