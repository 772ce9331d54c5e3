//! Fine-grained authorization entities of a client acting as resource server.
use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionStrategy {
    #[default]
    Unanimous,
    Affirmative,
    Consensus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Logic {
    #[default]
    Positive,
    Negative,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOwner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationScope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_uri: Option<String>,
}

/// Protected resource of a resource server. Keycloak names its id `_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationResource {
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uris: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<AuthorizationScope>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_managed_access: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<HashMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<ResourceOwner>,
    #[serde(default, rename = "icon_uri", skip_serializing_if = "Option::is_none")]
    pub icon_uri: Option<String>,
}

/// Kind of a permission, selecting the `/scope` or `/resource` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuthorizationPermissionType {
    #[default]
    Resource,
    Scope,
}

impl AuthorizationPermissionType {
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Scope => "/scope",
            Self::Resource => "/resource",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationPermission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub permission_type: AuthorizationPermissionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<Logic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_strategy: Option<DecisionStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policies: Option<Vec<String>>,
}

impl AuthorizationPermission {
    /// Path of this permission below `.../resource-server/permission`.
    pub fn path(&self) -> String {
        format!(
            "{}/{}",
            self.permission_type.path_segment(),
            self.id.as_deref().unwrap_or_default()
        )
    }
}

/// Policy provider type. Only role policies are addressed through their own
/// `/role` endpoint; every other type lives directly below `policy`.
///
/// Provider types this crate does not know are kept verbatim in `Other` so a
/// fetched policy can be sent back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PolicyType {
    #[default]
    Role,
    Client,
    ClientScope,
    Group,
    User,
    Time,
    Regex,
    Js,
    Aggregate,
    Resource,
    Scope,
    Other(String),
}

impl PolicyType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Role => "role",
            Self::Client => "client",
            Self::ClientScope => "client-scope",
            Self::Group => "group",
            Self::User => "user",
            Self::Time => "time",
            Self::Regex => "regex",
            Self::Js => "js",
            Self::Aggregate => "aggregate",
            Self::Resource => "resource",
            Self::Scope => "scope",
            Self::Other(value) => value,
        }
    }

    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Role => "/role",
            _ => "",
        }
    }
}

impl AsRef<str> for PolicyType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for PolicyType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "role" => Self::Role,
            "client" => Self::Client,
            "client-scope" => Self::ClientScope,
            "group" => Self::Group,
            "user" => Self::User,
            "time" => Self::Time,
            "regex" => Self::Regex,
            "js" => Self::Js,
            "aggregate" => Self::Aggregate,
            "resource" => Self::Resource,
            "scope" => Self::Scope,
            _ => Self::Other(value),
        }
    }
}

impl From<PolicyType> for String {
    fn from(value: PolicyType) -> Self {
        match value {
            PolicyType::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub policy_type: PolicyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<Logic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_strategy: Option<DecisionStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePolicyRole {
    pub id: String,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub policy_type: PolicyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<Logic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_strategy: Option<DecisionStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_roles: Option<bool>,
    #[serde(default, rename = "roles", skip_serializing_if = "Vec::is_empty")]
    pub role_policies: Vec<RolePolicyRole>,
}

impl RolePolicy {
    /// Path of this policy below `.../resource-server/policy`.
    pub fn path(&self) -> String {
        format!(
            "{}/{}",
            self.policy_type.path_segment(),
            self.id.as_deref().unwrap_or_default()
        )
    }
}

/// Entry of an UMA `response_mode=permissions` token response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedPermission {
    #[serde(default)]
    pub rsid: String,
    #[serde(default)]
    pub rsname: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
}
