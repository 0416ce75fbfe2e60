//! Morpheus REST API wire types

use serde::{Deserialize, Serialize};

/// Reference to another object by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl IdRef {
    pub fn new(id: i64) -> Self {
        Self { id, name: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub linux_username: Option<String>,
    pub windows_username: Option<String>,
    pub linux_key_pair_id: Option<i64>,
    pub receive_notifications: Option<bool>,
    pub password_expired: Option<bool>,
    pub roles: Vec<IdRef>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub roles: Vec<IdRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linux_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linux_key_pair_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receive_notifications: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Role {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub authority: Option<String>,
    pub description: Option<String>,
    pub multitenant: Option<bool>,
    pub role_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRole {
    pub authority: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multitenant: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Group {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub code: Option<String>,
    pub location: Option<String>,
}

/// A cloud, called a zone by the API
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cloud {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub code: Option<String>,
    pub costing_mode: Option<String>,
    pub external_id: Option<String>,
    pub guidance_mode: Option<String>,
    pub inventory_level: Option<String>,
    pub labels: Vec<String>,
    pub location: Option<String>,
    pub timezone: Option<String>,
    pub groups: Vec<IdRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub visibility: Option<String>,
    pub active: Option<bool>,
}

/// Objects that can be looked up by exact name
pub trait Named {
    fn name(&self) -> Option<&str>;
}

impl Named for Group {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Named for Cloud {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Named for Environment {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

// ============ Envelopes ============

#[derive(Debug, Serialize)]
pub(crate) struct NewUserRequest<'a> {
    pub user: &'a NewUser,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewRoleRequest<'a> {
    pub role: &'a NewRole,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserResponse {
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RoleResponse {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroupResponse {
    pub group: Group,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroupList {
    #[serde(default)]
    pub groups: Vec<Group>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CloudResponse {
    pub zone: Cloud,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CloudList {
    #[serde(default)]
    pub zones: Vec<Cloud>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnvironmentResponse {
    pub environment: Environment,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnvironmentList {
    #[serde(default)]
    pub environments: Vec<Environment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_from_api() {
        let resp: UserResponse = serde_json::from_value(json!({
            "user": {
                "id": 12,
                "username": "alice",
                "email": "alice@example.com",
                "firstName": "Alice",
                "linuxKeyPairId": 3,
                "passwordExpired": false,
                "roles": [{"id": 1, "authority": "System Admin", "name": "System Admin"}],
                "account": {"id": 1}
            }
        }))
        .unwrap();

        assert_eq!(resp.user.id, Some(12));
        assert_eq!(resp.user.first_name.as_deref(), Some("Alice"));
        assert_eq!(resp.user.last_name, None);
        assert_eq!(resp.user.roles[0].id, 1);
    }

    #[test]
    fn test_new_role_omits_unset() {
        let role = NewRole {
            authority: "ops".to_string(),
            role_type: Some("user".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(NewRoleRequest { role: &role }).unwrap();
        assert_eq!(value, json!({"role": {"authority": "ops", "roleType": "user"}}));
    }
}
