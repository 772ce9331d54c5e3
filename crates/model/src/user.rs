use serde::{Deserialize, Serialize};

/// Outcome of setting a user password.
///
/// A rejected password is not an error: Keycloak answers with a client error
/// whose body is decoded into `error` / `error_description`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetPasswordResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl SetPasswordResponse {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }
}
