use serde::{Deserialize, Serialize};

/// Brute force detection state of a single user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNameStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_failures: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(
        default,
        rename = "lastIPFailure",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_ip_failure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_failure: Option<i64>,
}
