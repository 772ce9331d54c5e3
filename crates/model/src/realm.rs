use serde::{Deserialize, Serialize};

use crate::types::{
    ClientRepresentation, GroupRepresentation, IdentityProviderRepresentation, RolesRepresentation,
    UserRepresentation,
};

/// What a partial import does with a resource that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportPolicy {
    #[default]
    Fail,
    Skip,
    Overwrite,
}

/// Body of `POST /admin/realms/{realm}/partialImport`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialImport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub if_resource_exists: Option<ImportPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<ImportPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<UserRepresentation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clients: Option<Vec<ClientRepresentation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<GroupRepresentation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_providers: Option<Vec<IdentityProviderRepresentation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<RolesRepresentation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_import_shape_test() -> anyhow::Result<()> {
        let import = PartialImport {
            if_resource_exists: Some(ImportPolicy::Skip),
            users: Some(vec![UserRepresentation {
                username: Some("ada".into()),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let value = serde_json::to_value(&import)?;
        assert_eq!(value["ifResourceExists"], "SKIP");
        assert_eq!(value["users"][0]["username"], "ada");
        assert!(value.get("policy").is_none());
        assert!(value.get("identityProviders").is_none());

        let import: PartialImport = serde_json::from_str(
            r#"{"policy":"OVERWRITE","identityProviders":[{"alias":"github"}]}"#,
        )?;
        assert_eq!(import.policy, Some(ImportPolicy::Overwrite));
        assert_eq!(
            import.identity_providers.as_deref().map(<[_]>::len),
            Some(1)
        );
        Ok(())
    }
}
