//! `hpe_morpheus_cloud` data source

use super::{Lookup, LookupErrors, single_by_name};
use crate::api::Cloud;
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
use std::collections::BTreeSet;

const SUMMARY: &str = "read cloud data source";

pub const ERROR_NO_CLOUD_FOUND: &str = "no cloud found";
pub const ERROR_MULTIPLE_CLOUDS: &str = "multiple clouds were returned";

const ERRORS: LookupErrors = LookupErrors {
    not_found: ERROR_NO_CLOUD_FOUND,
    multiple: ERROR_MULTIPLE_CLOUDS,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudModel {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub code: Option<String>,
    pub costing_mode: Option<String>,
    pub external_id: Option<String>,
    pub guidance_mode: Option<String>,
    pub inventory_level: Option<String>,
    pub labels: Option<BTreeSet<String>>,
    pub location: Option<String>,
    pub time_zone: Option<String>,
    pub group_ids: Option<BTreeSet<i64>>,
}

impl From<Cloud> for CloudModel {
    fn from(cloud: Cloud) -> Self {
        Self {
            id: cloud.id,
            name: cloud.name,
            code: cloud.code,
            costing_mode: cloud.costing_mode,
            external_id: cloud.external_id,
            guidance_mode: cloud.guidance_mode,
            inventory_level: cloud.inventory_level,
            labels: Some(cloud.labels.into_iter().collect()),
            location: cloud.location,
            time_zone: cloud.timezone,
            group_ids: Some(cloud.groups.iter().map(|g| g.id).collect()),
        }
    }
}

#[derive(Debug, Default)]
pub struct CloudDataSource {
    morpheus: MorpheusConfigure,
}

impl CloudDataSource {
    pub fn boxed() -> Box<dyn DataSource> {
        Box::new(Self::default())
    }
}

async fn get_cloud(client: &MorpheusClient, lookup: Lookup) -> Result<Cloud, String> {
    match lookup {
        Lookup::Id(id) => client
            .get_cloud(id)
            .await
            .map_err(|e| format!("GET failed for cloud {}: {}", id, e)),
        Lookup::Name(name) => {
            let clouds = client
                .list_clouds(Some(&name))
                .await
                .map_err(|e| format!("GET failed for cloud {}: {}", name, e))?;
            single_by_name(clouds, &name, &ERRORS)
        }
    }
}

#[async_trait]
impl DataSource for CloudDataSource {
    fn type_name_suffix(&self) -> &str {
        "morpheus_cloud"
    }

    fn schema(&self) -> Schema {
        let computed_string = || Attribute::computed(AttributeType::String);
        Schema::new()
            .description("Look up a Morpheus cloud by id or name")
            .with_attribute("id", Attribute::optional_computed(AttributeType::Int64))
            .with_attribute("name", Attribute::optional_computed(AttributeType::String))
            .with_attribute("code", computed_string())
            .with_attribute("costing_mode", computed_string())
            .with_attribute("external_id", computed_string())
            .with_attribute("guidance_mode", computed_string())
            .with_attribute("inventory_level", computed_string())
            .with_attribute("labels", Attribute::computed(AttributeType::SetOfString))
            .with_attribute("location", computed_string())
            .with_attribute("time_zone", computed_string())
            .with_attribute("group_ids", Attribute::computed(AttributeType::SetOfInt64))
    }

    fn configure(&mut self, provider_data: Option<&ProviderData>) -> Diagnostics {
        self.morpheus.configure(provider_data)
    }

    async fn read(&self, config: &Value) -> ResourceResponse {
        let mut resp = ResourceResponse::new();
        let Some(data) = decode_model::<CloudModel>(config, SUMMARY, &mut resp.diagnostics) else {
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

        match get_cloud(&client, lookup).await {
            Ok(cloud) => resp.set_state(&CloudModel::from(cloud)),
            Err(detail) => resp.add_error(SUMMARY, detail),
        }
        resp
    }
}
