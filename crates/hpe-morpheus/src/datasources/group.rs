//! `hpe_morpheus_group` data source

use super::{Lookup, LookupErrors, single_by_name};
use crate::api::Group;
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

const SUMMARY: &str = "read group data source";

pub const ERROR_NO_GROUP_FOUND: &str = "no group found";
pub const ERROR_MULTIPLE_GROUPS: &str = "multiple groups were returned";

const ERRORS: LookupErrors = LookupErrors {
    not_found: ERROR_NO_GROUP_FOUND,
    multiple: ERROR_MULTIPLE_GROUPS,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupModel {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub code: Option<String>,
    pub location: Option<String>,
}

impl From<Group> for GroupModel {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            name: group.name,
            code: group.code,
            location: group.location,
        }
    }
}

#[derive(Debug, Default)]
pub struct GroupDataSource {
    morpheus: MorpheusConfigure,
}

impl GroupDataSource {
    pub fn boxed() -> Box<dyn DataSource> {
        Box::new(Self::default())
    }
}

async fn get_group(client: &MorpheusClient, lookup: Lookup) -> Result<Group, String> {
    match lookup {
        Lookup::Id(id) => client
            .get_group(id)
            .await
            .map_err(|e| format!("GET failed for group {}: {}", id, e)),
        Lookup::Name(name) => {
            let groups = client
                .list_groups(Some(&name))
                .await
                .map_err(|e| format!("GET failed for group {}: {}", name, e))?;
            single_by_name(groups, &name, &ERRORS)
        }
    }
}

#[async_trait]
impl DataSource for GroupDataSource {
    fn type_name_suffix(&self) -> &str {
        "morpheus_group"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .description("Look up a Morpheus group by id or name")
            .with_attribute("id", Attribute::optional_computed(AttributeType::Int64))
            .with_attribute("name", Attribute::optional_computed(AttributeType::String))
            .with_attribute("code", Attribute::computed(AttributeType::String))
            .with_attribute("location", Attribute::computed(AttributeType::String))
    }

    fn configure(&mut self, provider_data: Option<&ProviderData>) -> Diagnostics {
        self.morpheus.configure(provider_data)
    }

    async fn read(&self, config: &Value) -> ResourceResponse {
        let mut resp = ResourceResponse::new();
        let Some(data) = decode_model::<GroupModel>(config, SUMMARY, &mut resp.diagnostics) else {
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

        match get_group(&client, lookup).await {
            Ok(group) => resp.set_state(&GroupModel::from(group)),
            Err(detail) => resp.add_error(SUMMARY, detail),
        }
        resp
    }
}
