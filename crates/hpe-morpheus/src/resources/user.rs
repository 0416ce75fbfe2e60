//! `hpe_morpheus_user` resource

use super::{decode_model, parse_import_id};
use crate::api::{IdRef, NewUser, User};
use crate::client::MorpheusClient;
use crate::configure::MorpheusConfigure;
use async_trait::async_trait;
use hpe_subprovider::{
    Attribute, AttributeType, ConfigureClient, Diagnostic, Diagnostics, ProviderData, Resource,
    ResourceResponse, Schema,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

const PASSWORD_REQUIRED: &str = "attribute 'password' not set (this attribute is optional for some operations, eg import, but needed during create)";

/// Terraform state of a user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserModel {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub linux_username: Option<String>,
    pub windows_username: Option<String>,
    pub linux_key_pair_id: Option<i64>,
    pub receive_notifications: Option<bool>,
    pub password_expired: Option<bool>,
    pub role_ids: Option<BTreeSet<i64>>,
}

impl UserModel {
    fn from_api(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            password: None,
            first_name: user.first_name,
            last_name: user.last_name,
            linux_username: user.linux_username,
            windows_username: user.windows_username,
            linux_key_pair_id: user.linux_key_pair_id,
            receive_notifications: user.receive_notifications,
            password_expired: user.password_expired,
            role_ids: Some(user.roles.iter().map(|r| r.id).collect()),
        }
    }
}

#[derive(Debug, Default)]
pub struct UserResource {
    morpheus: MorpheusConfigure,
}

impl UserResource {
    pub fn boxed() -> Box<dyn Resource> {
        Box::new(Self::default())
    }
}

/// Current API values of user `id`
async fn get_user_as_state(client: &MorpheusClient, id: i64) -> Result<UserModel, Diagnostics> {
    match client.get_user(id).await {
        Ok(user) => Ok(UserModel::from_api(user)),
        Err(e) => {
            let mut diags = Diagnostics::new();
            diags.add_error(
                "populate user resource",
                format!("user {} GET failed: {}", id, e),
            );
            Err(diags)
        }
    }
}

#[async_trait]
impl Resource for UserResource {
    fn type_name_suffix(&self) -> &str {
        "morpheus_user"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .description("A Morpheus user")
            .with_attribute(
                "id",
                Attribute::computed(AttributeType::Int64).description("Unique user id"),
            )
            .with_attribute("username", Attribute::required_string())
            .with_attribute("email", Attribute::required_string())
            .with_attribute(
                "password",
                Attribute::optional_string()
                    .sensitive()
                    .description("Required on create, optional on import"),
            )
            .with_attribute("first_name", Attribute::optional_computed(AttributeType::String))
            .with_attribute("last_name", Attribute::optional_computed(AttributeType::String))
            .with_attribute(
                "linux_username",
                Attribute::optional_computed(AttributeType::String),
            )
            .with_attribute(
                "windows_username",
                Attribute::optional_computed(AttributeType::String),
            )
            .with_attribute(
                "linux_key_pair_id",
                Attribute::optional_computed(AttributeType::Int64),
            )
            .with_attribute(
                "receive_notifications",
                Attribute::optional_computed(AttributeType::Bool),
            )
            .with_attribute("password_expired", Attribute::computed(AttributeType::Bool))
            .with_attribute(
                "role_ids",
                Attribute::optional_computed(AttributeType::SetOfInt64),
            )
    }

    fn configure(&mut self, provider_data: Option<&ProviderData>) -> Diagnostics {
        self.morpheus.configure(provider_data)
    }

    async fn create(&self, plan: &Value) -> ResourceResponse {
        let mut resp = ResourceResponse::new();
        let Some(mut plan) = decode_model::<UserModel>(plan, "create user resource", &mut resp.diagnostics)
        else {
            return resp;
        };

        let username = plan.username.clone().unwrap_or_default();
        let Some(password) = plan.password.clone() else {
            resp.diagnostics.push(
                Diagnostic::error("create user resource", PASSWORD_REQUIRED)
                    .with_attribute("password"),
            );
            return resp;
        };

        let new_user = NewUser {
            username: username.clone(),
            email: plan.email.clone().unwrap_or_default(),
            password,
            roles: plan
                .role_ids
                .iter()
                .flatten()
                .map(|id| IdRef::new(*id))
                .collect(),
            first_name: plan.first_name.clone(),
            last_name: plan.last_name.clone(),
            linux_username: plan.linux_username.clone(),
            windows_username: plan.windows_username.clone(),
            linux_key_pair_id: plan.linux_key_pair_id,
            receive_notifications: plan.receive_notifications,
        };

        let client = match self.morpheus.new_client().await {
            Ok(client) => client,
            Err(e) => {
                resp.add_error(
                    "create user resource",
                    format!("user {}: failed to create client: {}", username, e),
                );
                return resp;
            }
        };

        let user = match client.create_user(&new_user).await {
            Ok(user) => user,
            Err(e) => {
                resp.add_error(
                    "create user resource",
                    format!("user {} POST failed: {}", username, e),
                );
                return resp;
            }
        };

        let Some(id) = user.id else {
            resp.add_error("create user resource", format!("user {}: id is nil", username));
            return resp;
        };
        tracing::info!("created morpheus user {} ({})", username, id);

        // write id as soon as possible
        plan.id = Some(id);
        resp.set_state(&plan);

        match get_user_as_state(&client, id).await {
            Ok(mut state) => {
                state.password = plan.password;
                resp.set_state(&state);
            }
            Err(diags) => {
                resp.diagnostics.extend(diags);
                resp.add_error(
                    "create user resource",
                    format!("user {}: failed to read from api", id),
                );
            }
        }
        resp
    }

    async fn read(&self, state: &Value) -> ResourceResponse {
        let mut resp = ResourceResponse::new();
        let Some(prior) = decode_model::<UserModel>(state, "read user resource", &mut resp.diagnostics)
        else {
            return resp;
        };
        let Some(id) = prior.id else {
            resp.add_error("read user resource", "state has no user id");
            return resp;
        };

        let client = match self.morpheus.new_client().await {
            Ok(client) => client,
            Err(e) => {
                resp.add_error(
                    "read user resource",
                    format!("new client call failed with {}", e),
                );
                return resp;
            }
        };

        match get_user_as_state(&client, id).await {
            Ok(mut state) => {
                // the API never returns the password
                state.password = prior.password;
                resp.set_state(&state);
            }
            Err(diags) => {
                resp.diagnostics.extend(diags);
                resp.add_error(
                    "read user resource",
                    format!("user {}: failed to read from api", id),
                );
            }
        }
        resp
    }

    async fn update(&self, _plan: &Value, _prior_state: &Value) -> ResourceResponse {
        let mut resp = ResourceResponse::new();
        resp.add_error(
            "update user resource",
            "update of 'user' resources has not been implemented",
        );
        resp
    }

    async fn delete(&self, state: &Value) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let Some(model) = decode_model::<UserModel>(state, "delete user resource", &mut diags) else {
            return diags;
        };
        let Some(id) = model.id else {
            diags.add_error("delete user resource", "state has no user id");
            return diags;
        };

        let result = match self.morpheus.new_client().await {
            Ok(client) => client.delete_user(id).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => tracing::info!("deleted morpheus user {}", id),
            Err(e) => diags.add_error(
                "delete user resource",
                format!("user {}: DELETE failed {}", id, e),
            ),
        }
        diags
    }

    async fn import_state(&self, id: &str) -> ResourceResponse {
        let mut resp = ResourceResponse::new();
        let Some((raw_id, password)) = id.split_once(',') else {
            resp.add_error(
                "import user resource",
                "expected import format: <id>,<password>",
            );
            return resp;
        };

        match parse_import_id(raw_id) {
            Ok(user_id) => resp.set_state(&UserModel {
                id: Some(user_id),
                password: Some(password.to_string()),
                ..Default::default()
            }),
            Err(detail) => resp.add_error("import user resource", detail),
        }
        resp
    }
}
