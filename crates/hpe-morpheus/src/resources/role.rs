//! `hpe_morpheus_role` resource

use super::{decode_model, parse_import_id};
use crate::api::{NewRole, Role};
use crate::client::MorpheusClient;
use crate::configure::MorpheusConfigure;
use async_trait::async_trait;
use hpe_subprovider::{
    Attribute, AttributeType, ConfigureClient, Diagnostics, ProviderData, Resource,
    ResourceResponse, Schema,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const SUPPORTED_ROLE_TYPE: &str = "user";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleModel {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub multitenant: Option<bool>,
    pub role_type: Option<String>,
}

impl From<Role> for RoleModel {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name.or(role.authority),
            description: role.description,
            multitenant: role.multitenant,
            role_type: role.role_type,
        }
    }
}

#[derive(Debug, Default)]
pub struct RoleResource {
    morpheus: MorpheusConfigure,
}

impl RoleResource {
    pub fn boxed() -> Box<dyn Resource> {
        Box::new(Self::default())
    }
}

async fn get_role_as_state(client: &MorpheusClient, id: i64) -> Result<RoleModel, Diagnostics> {
    client.get_role(id).await.map(RoleModel::from).map_err(|e| {
        let mut diags = Diagnostics::new();
        diags.add_error(
            "populate role resource",
            format!("role {} GET failed: {}", id, e),
        );
        diags
    })
}

#[async_trait]
impl Resource for RoleResource {
    fn type_name_suffix(&self) -> &str {
        "morpheus_role"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .description("A Morpheus role")
            .with_attribute("id", Attribute::computed(AttributeType::Int64))
            .with_attribute(
                "name",
                Attribute::required_string().description("Role name (authority)"),
            )
            .with_attribute(
                "description",
                Attribute::optional_computed(AttributeType::String),
            )
            .with_attribute(
                "multitenant",
                Attribute::optional_computed(AttributeType::Bool),
            )
            .with_attribute(
                "role_type",
                Attribute::optional_computed(AttributeType::String)
                    .description("Only \"user\" is currently supported"),
            )
    }

    fn configure(&mut self, provider_data: Option<&ProviderData>) -> Diagnostics {
        self.morpheus.configure(provider_data)
    }

    async fn create(&self, plan: &Value) -> ResourceResponse {
        let mut resp = ResourceResponse::new();
        let Some(mut plan) =
            decode_model::<RoleModel>(plan, "create role resource", &mut resp.diagnostics)
        else {
            return resp;
        };

        let name = plan.name.clone().unwrap_or_default();
        if plan
            .role_type
            .as_deref()
            .is_some_and(|t| t != SUPPORTED_ROLE_TYPE)
        {
            resp.add_error(
                "create role resource",
                format!("role {}: currently only 'user' role_type is supported", name),
            );
            return resp;
        }

        let new_role = NewRole {
            authority: name.clone(),
            description: plan.description.clone(),
            multitenant: plan.multitenant,
            role_type: plan.role_type.clone(),
        };

        let client = match self.morpheus.new_client().await {
            Ok(client) => client,
            Err(e) => {
                resp.add_error(
                    "create role resource",
                    format!("role {}: failed to create client: {}", name, e),
                );
                return resp;
            }
        };

        let role = match client.create_role(&new_role).await {
            Ok(role) => role,
            Err(e) => {
                resp.add_error(
                    "create role resource",
                    format!("role {} POST failed: {}", name, e),
                );
                return resp;
            }
        };

        let Some(id) = role.id else {
            resp.add_error("create role resource", format!("role {}: id is nil", name));
            return resp;
        };

        plan.id = Some(id);
        resp.set_state(&plan);

        match get_role_as_state(&client, id).await {
            Ok(state) => resp.set_state(&state),
            Err(diags) => {
                resp.diagnostics.extend(diags);
                resp.add_error(
                    "create role resource",
                    format!("role {}: failed to read from api", id),
                );
            }
        }
        resp
    }

    async fn read(&self, state: &Value) -> ResourceResponse {
        let mut resp = ResourceResponse::new();
        let Some(prior) =
            decode_model::<RoleModel>(state, "read role resource", &mut resp.diagnostics)
        else {
            return resp;
        };
        let Some(id) = prior.id else {
            resp.add_error("read role resource", "state has no role id");
            return resp;
        };

        let client = match self.morpheus.new_client().await {
            Ok(client) => client,
            Err(e) => {
                resp.add_error(
                    "read role resource",
                    format!("new client call failed with {}", e),
                );
                return resp;
            }
        };

        match get_role_as_state(&client, id).await {
            Ok(state) => resp.set_state(&state),
            Err(diags) => {
                resp.diagnostics.extend(diags);
                resp.add_error(
                    "read role resource",
                    format!("role {}: failed to read from api", id),
                );
            }
        }
        resp
    }

    async fn update(&self, _plan: &Value, _prior_state: &Value) -> ResourceResponse {
        let mut resp = ResourceResponse::new();
        resp.add_error(
            "update role resource",
            "update of 'role' resources has not been implemented",
        );
        resp
    }

    async fn delete(&self, state: &Value) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let Some(model) = decode_model::<RoleModel>(state, "delete role resource", &mut diags) else {
            return diags;
        };
        let Some(id) = model.id else {
            diags.add_error("delete role resource", "state has no role id");
            return diags;
        };

        let result = match self.morpheus.new_client().await {
            Ok(client) => client.delete_role(id).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            diags.add_error(
                "delete role resource",
                format!("role {}: DELETE failed {}", id, e),
            );
        }
        diags
    }

    async fn import_state(&self, id: &str) -> ResourceResponse {
        let mut resp = ResourceResponse::new();
        match parse_import_id(id) {
            Ok(role_id) => resp.set_state(&RoleModel {
                id: Some(role_id),
                ..Default::default()
            }),
            Err(detail) => resp.add_error("import role resource", detail),
        }
        resp
    }
}
