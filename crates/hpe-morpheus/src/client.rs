//! Morpheus API client
//!
//! Thin typed wrapper over the composed transport. Every non-2xx response
//! becomes [`MorpheusError::Api`] carrying the status and raw body.

use crate::api::{
    Cloud, CloudList, CloudResponse, Environment, EnvironmentList, EnvironmentResponse, Group,
    GroupList, GroupResponse, NewRole, NewRoleRequest, NewUser, NewUserRequest, Role,
    RoleResponse, User, UserResponse,
};
use crate::error::{MorpheusError, Result};
use crate::transport::{ClientConfig, Transport};
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

#[derive(Clone)]
pub struct MorpheusClient {
    transport: Arc<dyn Transport>,
    config: Arc<ClientConfig>,
}

impl MorpheusClient {
    pub fn new(transport: Arc<dyn Transport>, config: Arc<ClientConfig>) -> Self {
        Self { transport, config }
    }

    pub fn base_url(&self) -> &Url {
        self.config.base_url()
    }

    #[cfg(test)]
    pub(crate) fn shares_config_with(&self, other: &MorpheusClient) -> bool {
        Arc::ptr_eq(&self.config, &other.config)
    }

    // ============ Users ============

    pub async fn get_user(&self, id: i64) -> Result<User> {
        let resp: UserResponse = self.get(&["api", "users", &id.to_string()], &[]).await?;
        Ok(resp.user)
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User> {
        let resp: UserResponse = self
            .send(Method::POST, &["api", "users"], &[], Some(&NewUserRequest { user }))
            .await?;
        Ok(resp.user)
    }

    pub async fn delete_user(&self, id: i64) -> Result<()> {
        self.delete(&["api", "users", &id.to_string()]).await
    }

    // ============ Roles ============

    pub async fn get_role(&self, id: i64) -> Result<Role> {
        let resp: RoleResponse = self.get(&["api", "roles", &id.to_string()], &[]).await?;
        Ok(resp.role)
    }

    pub async fn create_role(&self, role: &NewRole) -> Result<Role> {
        let resp: RoleResponse = self
            .send(Method::POST, &["api", "roles"], &[], Some(&NewRoleRequest { role }))
            .await?;
        Ok(resp.role)
    }

    pub async fn delete_role(&self, id: i64) -> Result<()> {
        self.delete(&["api", "roles", &id.to_string()]).await
    }

    // ============ Groups ============

    pub async fn get_group(&self, id: i64) -> Result<Group> {
        let resp: GroupResponse = self.get(&["api", "groups", &id.to_string()], &[]).await?;
        Ok(resp.group)
    }

    pub async fn list_groups(&self, name: Option<&str>) -> Result<Vec<Group>> {
        let resp: GroupList = self.get(&["api", "groups"], &name_query(name)).await?;
        Ok(resp.groups)
    }

    // ============ Clouds (zones) ============

    pub async fn get_cloud(&self, id: i64) -> Result<Cloud> {
        let resp: CloudResponse = self.get(&["api", "zones", &id.to_string()], &[]).await?;
        Ok(resp.zone)
    }

    pub async fn list_clouds(&self, name: Option<&str>) -> Result<Vec<Cloud>> {
        let resp: CloudList = self.get(&["api", "zones"], &name_query(name)).await?;
        Ok(resp.zones)
    }

    // ============ Environments ============

    pub async fn get_environment(&self, id: i64) -> Result<Environment> {
        let resp: EnvironmentResponse = self
            .get(&["api", "environments", &id.to_string()], &[])
            .await?;
        Ok(resp.environment)
    }

    pub async fn list_environments(&self, name: Option<&str>) -> Result<Vec<Environment>> {
        let resp: EnvironmentList = self
            .get(&["api", "environments"], &name_query(name))
            .await?;
        Ok(resp.environments)
    }

    // ============ Plumbing ============

    async fn get<T: DeserializeOwned>(&self, path: &[&str], query: &[(&str, &str)]) -> Result<T> {
        self.send::<(), T>(Method::GET, path, query, None).await
    }

    async fn delete(&self, path: &[&str]) -> Result<()> {
        self.execute::<()>(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &[&str],
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<T> {
        let bytes = self.execute(method, path, query, body).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn execute<B: Serialize>(
        &self,
        method: Method,
        path: &[&str],
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<Vec<u8>> {
        let mut url = self.config.endpoint(path);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        let context = format!("{} {}", method, url.path());

        let mut request = reqwest::Request::new(method, url);
        let headers = request.headers_mut();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(body) = body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            *request.body_mut() = Some(serde_json::to_vec(body)?.into());
        }
        self.config.apply_default_headers(request.headers_mut());

        tracing::debug!("{}", context);
        let response = self.transport.round_trip(request).await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(MorpheusError::Api {
                context,
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(bytes.to_vec())
    }
}

impl std::fmt::Debug for MorpheusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MorpheusClient")
            .field("base_url", &self.config.base_url().as_str())
            .finish()
    }
}

fn name_query(name: Option<&str>) -> Vec<(&str, &str)> {
    name.map(|n| vec![("name", n)]).unwrap_or_default()
}
