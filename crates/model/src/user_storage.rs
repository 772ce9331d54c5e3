use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Value of the `action` query parameter of a user storage sync.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum UserSyncAction {
    TriggerFullSync,
    TriggerChangedUsersSync,
}

/// Value of the `direction` query parameter of an LDAP mapper sync.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum LdapMapperSyncDirection {
    FedToKeycloak,
    KeycloakToFed,
}

/// Counters reported by a user storage or LDAP mapper sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynchronizationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignored: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
