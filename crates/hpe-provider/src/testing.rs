use async_trait::async_trait;
use hpe_subprovider::{
    Attribute, AttributeType, BlockAccessor, DataSource, DataSourceFactory, Diagnostics,
    ProviderData, ProviderDataEntry, ProviderError, Resource, ResourceFactory, ResourceResponse,
    Schema, SubProvider,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Deserialize)]
struct FakeBlock {
    endpoint: String,
}

/// Value a configured fake sub-provider hands to its resources
#[derive(Debug)]
pub(crate) struct Marker {
    pub endpoint: String,
}

/// Sub-provider with one resource (`<name>_thing`) and one data source
/// (`<name>_lookup`), backed by nothing
pub(crate) struct FakeSubProvider {
    name: &'static str,
    fail: bool,
    configure_calls: AtomicUsize,
}

impl FakeSubProvider {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fail: false,
            configure_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn configure_calls(&self) -> usize {
        self.configure_calls.load(Ordering::SeqCst)
    }
}

impl SubProvider for FakeSubProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn schema(&self) -> BTreeMap<String, Attribute> {
        BTreeMap::from([("endpoint".to_string(), Attribute::optional_string())])
    }

    fn configure(&self, block: BlockAccessor<'_>) -> hpe_subprovider::Result<Option<ProviderDataEntry>> {
        self.configure_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::InvalidConfig("endpoint unreachable".to_string()));
        }
        let Some(data) = block.decode_single::<FakeBlock>()? else {
            return Ok(None);
        };
        Ok(Some(Arc::new(Marker {
            endpoint: data.endpoint,
        })))
    }

    fn resources(&self) -> Vec<ResourceFactory> {
        match self.name {
            "alpha" => vec![Thing::alpha as ResourceFactory],
            _ => vec![Thing::beta as ResourceFactory],
        }
    }

    fn data_sources(&self) -> Vec<DataSourceFactory> {
        match self.name {
            "alpha" => vec![Lookup::alpha as DataSourceFactory],
            _ => vec![Lookup::beta as DataSourceFactory],
        }
    }
}

fn marker(block: &str, provider_data: Option<&ProviderData>) -> (Option<Arc<Marker>>, Diagnostics) {
    let mut diags = Diagnostics::new();
    let Some(data) = provider_data else {
        return (None, diags);
    };
    match data.get::<Marker>(block) {
        Ok(marker) => (Some(marker), diags),
        Err(e) => {
            diags.add_error(format!("{} not configured", block), e.to_string());
            (None, diags)
        }
    }
}

/// Echoing resource; stamps `endpoint` from its sub-provider into state
pub(crate) struct Thing {
    block: &'static str,
    suffix: &'static str,
    marker: Option<Arc<Marker>>,
}

impl Thing {
    fn alpha() -> Box<dyn Resource> {
        Box::new(Self {
            block: "alpha",
            suffix: "alpha_thing",
            marker: None,
        })
    }

    fn beta() -> Box<dyn Resource> {
        Box::new(Self {
            block: "beta",
            suffix: "beta_thing",
            marker: None,
        })
    }

    fn stamp(&self, state: &Value) -> ResourceResponse {
        let mut resp = ResourceResponse::new();
        let Some(marker) = &self.marker else {
            resp.add_error("thing", "no client");
            return resp;
        };
        let mut state = state.clone();
        if let Some(object) = state.as_object_mut() {
            object.insert("id".to_string(), json!("thing-1"));
            object.insert("endpoint".to_string(), json!(marker.endpoint));
        }
        resp.set_state(&state);
        resp
    }
}

#[async_trait]
impl Resource for Thing {
    fn type_name_suffix(&self) -> &str {
        self.suffix
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .with_attribute("id", Attribute::computed(AttributeType::String))
            .with_attribute("name", Attribute::required_string())
            .with_attribute("endpoint", Attribute::computed(AttributeType::String))
    }

    fn configure(&mut self, provider_data: Option<&ProviderData>) -> Diagnostics {
        let (marker, diags) = marker(self.block, provider_data);
        self.marker = marker;
        diags
    }

    async fn create(&self, plan: &Value) -> ResourceResponse {
        self.stamp(plan)
    }

    async fn read(&self, state: &Value) -> ResourceResponse {
        self.stamp(state)
    }

    async fn update(&self, plan: &Value, _prior_state: &Value) -> ResourceResponse {
        self.stamp(plan)
    }

    async fn delete(&self, _state: &Value) -> Diagnostics {
        Diagnostics::new()
    }

    async fn import_state(&self, id: &str) -> ResourceResponse {
        let mut resp = ResourceResponse::new();
        resp.set_state(&json!({"id": id, "name": format!("imported-{}", id)}));
        resp
    }
}

pub(crate) struct Lookup {
    block: &'static str,
    suffix: &'static str,
    marker: Option<Arc<Marker>>,
}

impl Lookup {
    fn alpha() -> Box<dyn DataSource> {
        Box::new(Self {
            block: "alpha",
            suffix: "alpha_lookup",
            marker: None,
        })
    }

    fn beta() -> Box<dyn DataSource> {
        Box::new(Self {
            block: "beta",
            suffix: "beta_lookup",
            marker: None,
        })
    }
}

#[async_trait]
impl DataSource for Lookup {
    fn type_name_suffix(&self) -> &str {
        self.suffix
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .with_attribute("name", Attribute::required_string())
            .with_attribute("found", Attribute::computed(AttributeType::Bool))
    }

    fn configure(&mut self, provider_data: Option<&ProviderData>) -> Diagnostics {
        let (marker, diags) = marker(self.block, provider_data);
        self.marker = marker;
        diags
    }

    async fn read(&self, config: &Value) -> ResourceResponse {
        let mut resp = ResourceResponse::new();
        resp.set_state(&json!({
            "name": config["name"],
            "found": self.marker.is_some(),
        }));
        resp
    }
}
