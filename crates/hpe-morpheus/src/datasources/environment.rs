//! `hpe_morpheus_environment` data source

use super::{Lookup, LookupErrors, single_by_name};
use crate::api::Environment;
use crate::client::MorpheusClient;
use crate::configure::MorpheusConfigure;
use crate::resources::decode_model;
use async_trait::async_trait;
use hpe_subprovider::{
    Attribute, AttributeType, ConfigureClient, DataSource, Diagnostics, ProviderData,
    ResourceResponse, Schema,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const SUMMARY: &str = "read environment data source";

pub const ERROR_NO_ENVIRONMENT_FOUND: &str = "no environment found";
pub const ERROR_MULTIPLE_ENVIRONMENTS: &str = "multiple environments were returned";

const ERRORS: LookupErrors = LookupErrors {
    not_found: ERROR_NO_ENVIRONMENT_FOUND,
    multiple: ERROR_MULTIPLE_ENVIRONMENTS,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentModel {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub visibility: Option<String>,
    pub active: Option<bool>,
}

impl From<Environment> for EnvironmentModel {
    fn from(env: Environment) -> Self {
        Self {
            id: env.id,
            name: env.name,
            code: env.code,
            description: env.description,
            visibility: env.visibility,
            active: env.active,
        }
    }
}

#[derive(Debug, Default)]
pub struct EnvironmentDataSource {
    morpheus: MorpheusConfigure,
}

impl EnvironmentDataSource {
    pub fn boxed() -> Box<dyn DataSource> {
        Box::new(Self::default())
    }
}

async fn get_environment(client: &MorpheusClient, lookup: Lookup) -> Result<Environment, String> {
    match lookup {
        Lookup::Id(id) => client
            .get_environment(id)
            .await
            .map_err(|e| format!("GET failed for environment {}: {}", id, e)),
        Lookup::Name(name) => {
            let environments = client
                .list_environments(Some(&name))
                .await
                .map_err(|e| format!("GET failed for environment {}: {}", name, e))?;
            single_by_name(environments, &name, &ERRORS)
        }
    }
}

#[async_trait]
impl DataSource for EnvironmentDataSource {
    fn type_name_suffix(&self) -> &str {
        "morpheus_environment"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .description("Look up a Morpheus environment by id or name")
            .with_attribute("id", Attribute::optional_computed(AttributeType::Int64))
            .with_attribute("name", Attribute::optional_computed(AttributeType::String))
            .with_attribute("code", Attribute::computed(AttributeType::String))
            .with_attribute("description", Attribute::computed(AttributeType::String))
            .with_attribute("visibility", Attribute::computed(AttributeType::String))
            .with_attribute("active", Attribute::computed(AttributeType::Bool))
    }

    fn configure(&mut self, provider_data: Option<&ProviderData>) -> Diagnostics {
        self.morpheus.configure(provider_data)
    }

    async fn read(&self, config: &Value) -> ResourceResponse {
        let mut resp = ResourceResponse::new();
        let Some(data) = decode_model::<EnvironmentModel>(config, SUMMARY, &mut resp.diagnostics)
        else {
            return resp;
        };

        let lookup = match Lookup::from_terms(data.id, data.name.as_deref()) {
            Ok(lookup) => lookup,
            Err(detail) => {
                resp.add_error(SUMMARY, detail);
                return resp;
            }
        };

        let client = match self.morpheus.new_client().await {
            Ok(client) => client,
            Err(e) => {
                resp.add_error(SUMMARY, format!("could not create sdk client: {}", e));
                return resp;
            }
        };

        match get_environment(&client, lookup).await {
            Ok(env) => resp.set_state(&EnvironmentModel::from(env)),
            Err(detail) => resp.add_error(SUMMARY, detail),
        }
        resp
    }
}
