use std::{collections::HashMap, path::Path};

use kcadmin_model::{
    types::{
        IdentityProviderMapperRepresentation, IdentityProviderRepresentation,
        ManagementPermissionReference,
    },
    IdentityProviderToken,
};
use reqwest::{
    multipart::{Form, Part},
    Method,
};
use serde_json::Value;

use crate::{
    client::{file_form, KeycloakClient},
    error::Result,
};

fn with_provider_id(form: Form, provider_id: Option<&str>) -> Form {
    match provider_id {
        Some(provider_id) => form.text("providerId", provider_id.to_string()),
        None => form,
    }
}

impl KeycloakClient {
    /// Parses an identity provider descriptor, e.g. OIDC discovery or SAML
    /// metadata, into the configuration of a new instance.
    pub async fn import_identity_provider(
        &self,
        authentication_realm: &str,
        realm: &str,
        provider_id: Option<&str>,
        file: impl AsRef<Path>,
    ) -> Result<HashMap<String, Value>> {
        let form = with_provider_id(file_form(file.as_ref()).await?, provider_id);
        self.post_multipart(
            authentication_realm,
            &format!("/admin/realms/{realm}/identity-provider/import-config"),
            form,
        )
        .await
    }

    /// Same as [`KeycloakClient::import_identity_provider`] for a descriptor
    /// held in memory.
    pub async fn import_identity_provider_config(
        &self,
        authentication_realm: &str,
        realm: &str,
        provider_id: Option<&str>,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<HashMap<String, Value>> {
        let form = Form::new().part("file", Part::bytes(content).file_name(file_name.to_string()));
        self.post_multipart(
            authentication_realm,
            &format!("/admin/realms/{realm}/identity-provider/import-config"),
            with_provider_id(form, provider_id),
        )
        .await
    }

    pub async fn create_identity_provider(
        &self,
        authentication_realm: &str,
        realm: &str,
        identity_provider: &IdentityProviderRepresentation,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/identity-provider/instances"),
            identity_provider,
        )
        .await
    }

    pub async fn identity_provider_instances(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<Vec<IdentityProviderRepresentation>> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/identity-provider/instances"),
        )
        .await
    }

    pub async fn identity_provider(
        &self,
        authentication_realm: &str,
        realm: &str,
        identity_provider_alias: &str,
    ) -> Result<IdentityProviderRepresentation> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/identity-provider/instances/{identity_provider_alias}"),
        )
        .await
    }

    /// Token stored by the broker for the calling user. The path is the
    /// legacy `/auth` prefixed one.
    pub async fn identity_provider_token(
        &self,
        authentication_realm: &str,
        realm: &str,
        identity_provider_alias: &str,
    ) -> Result<IdentityProviderToken> {
        self.get(
            authentication_realm,
            &format!("/auth/realms/{realm}/broker/{identity_provider_alias}/token"),
        )
        .await
    }

    pub async fn update_identity_provider(
        &self,
        authentication_realm: &str,
        realm: &str,
        identity_provider_alias: &str,
        identity_provider: &IdentityProviderRepresentation,
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/identity-provider/instances/{identity_provider_alias}"),
            identity_provider,
        )
        .await
    }

    pub async fn delete_identity_provider(
        &self,
        authentication_realm: &str,
        realm: &str,
        identity_provider_alias: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("/admin/realms/{realm}/identity-provider/instances/{identity_provider_alias}"),
        )
        .await
    }

    pub async fn export_identity_provider_public_broker_configuration(
        &self,
        authentication_realm: &str,
        realm: &str,
        identity_provider_alias: &str,
    ) -> Result<bool> {
        let request = self
            .request(
                Method::GET,
                authentication_realm,
                &format!(
                    "/admin/realms/{realm}/identity-provider/instances/{identity_provider_alias}/export"
                ),
            )
            .await?;
        self.success(request).await
    }

    pub async fn identity_provider_authorization_permissions_initialized(
        &self,
        authentication_realm: &str,
        realm: &str,
        identity_provider_alias: &str,
    ) -> Result<ManagementPermissionReference> {
        self.get(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/identity-provider/instances/{identity_provider_alias}/management/permissions"
            ),
        )
        .await
    }

    pub async fn set_identity_provider_authorization_permissions_initialized(
        &self,
        authentication_realm: &str,
        realm: &str,
        identity_provider_alias: &str,
        management_permission: &ManagementPermissionReference,
    ) -> Result<ManagementPermissionReference> {
        self.put_json_for(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/identity-provider/instances/{identity_provider_alias}/management/permissions"
            ),
            management_permission,
        )
        .await
    }

    pub async fn identity_provider_mapper_types(
        &self,
        authentication_realm: &str,
        realm: &str,
        identity_provider_alias: &str,
    ) -> Result<HashMap<String, Value>> {
        self.get(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/identity-provider/instances/{identity_provider_alias}/mapper-types"
            ),
        )
        .await
    }

    pub async fn add_identity_provider_mapper(
        &self,
        authentication_realm: &str,
        realm: &str,
        identity_provider_alias: &str,
        identity_provider_mapper: &IdentityProviderMapperRepresentation,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/identity-provider/instances/{identity_provider_alias}/mappers"
            ),
            identity_provider_mapper,
        )
        .await
    }

    pub async fn identity_provider_mappers(
        &self,
        authentication_realm: &str,
        realm: &str,
        identity_provider_alias: &str,
    ) -> Result<Vec<IdentityProviderMapperRepresentation>> {
        self.get(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/identity-provider/instances/{identity_provider_alias}/mappers"
            ),
        )
        .await
    }

    pub async fn identity_provider_mapper_by_id(
        &self,
        authentication_realm: &str,
        realm: &str,
        identity_provider_alias: &str,
        mapper_id: &str,
    ) -> Result<IdentityProviderMapperRepresentation> {
        self.get(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/identity-provider/instances/{identity_provider_alias}/mappers/{mapper_id}"
            ),
        )
        .await
    }

    pub async fn update_identity_provider_mapper(
        &self,
        authentication_realm: &str,
        realm: &str,
        identity_provider_alias: &str,
        mapper_id: &str,
        identity_provider_mapper: &IdentityProviderMapperRepresentation,
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/identity-provider/instances/{identity_provider_alias}/mappers/{mapper_id}"
            ),
            identity_provider_mapper,
        )
        .await
    }

    pub async fn delete_identity_provider_mapper(
        &self,
        authentication_realm: &str,
        realm: &str,
        identity_provider_alias: &str,
        mapper_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/identity-provider/instances/{identity_provider_alias}/mappers/{mapper_id}"
            ),
        )
        .await
    }

    /// Provider factory description, e.g. for `oidc` or `saml`.
    pub async fn identity_provider_by_provider_id(
        &self,
        authentication_realm: &str,
        realm: &str,
        provider_id: &str,
    ) -> Result<HashMap<String, Value>> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/identity-provider/providers/{provider_id}"),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use kcadmin_model::types::IdentityProviderMapperRepresentation;
    use serde_json::json;

    use crate::test_util::MockKeycloak;

    #[tokio::test]
    async fn import_config_from_file_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        let path = "/admin/realms/acme/identity-provider/import-config";
        mock.on(
            Method::POST,
            path,
            200,
            json!({"authorizationUrl": "https://idp/auth", "tokenUrl": "https://idp/token"}),
        );
        let client = mock.client()?;
        let file = std::env::temp_dir().join(format!("idp-metadata-{}.json", std::process::id()));
        tokio::fs::write(&file, br#"{"issuer":"https://idp"}"#).await?;

        let config = client
            .import_identity_provider("master", "acme", Some("oidc"), &file)
            .await?;
        tokio::fs::remove_file(&file).await?;
        assert_eq!(config["tokenUrl"], "https://idp/token");

        let request = mock.last();
        assert!(request
            .header("content-type")
            .is_some_and(|value| value.starts_with("multipart/form-data")));
        let body = request.text();
        assert!(body.contains("name=\"file\""));
        assert!(body.contains("{\"issuer\":\"https://idp\"}"));
        assert!(body.contains("name=\"providerId\""));
        assert!(body.contains("oidc"));
        Ok(())
    }

    #[tokio::test]
    async fn import_config_from_memory_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(
            Method::POST,
            "/admin/realms/acme/identity-provider/import-config",
            200,
            json!({"singleSignOnServiceUrl": "https://idp/sso"}),
        );
        let client = mock.client()?;

        let config = client
            .import_identity_provider_config(
                "master",
                "acme",
                None,
                "metadata.xml",
                b"<EntityDescriptor/>".to_vec(),
            )
            .await?;
        assert_eq!(config["singleSignOnServiceUrl"], "https://idp/sso");
        let body = mock.last().text();
        assert!(body.contains("filename=\"metadata.xml\""));
        assert!(!body.contains("providerId"));
        Ok(())
    }

    #[tokio::test]
    async fn broker_token_uses_legacy_path_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(
            Method::GET,
            "/auth/realms/acme/broker/github/token",
            200,
            json!({"access_token": "gho_1", "token_type": "bearer", "scope": "read:user"}),
        );
        let client = mock.client()?;

        let token = client
            .identity_provider_token("master", "acme", "github")
            .await?;
        assert_eq!(token.access_token.as_deref(), Some("gho_1"));
        assert_eq!(token.scope.as_deref(), Some("read:user"));
        Ok(())
    }

    #[tokio::test]
    async fn export_and_mappers_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on_text(
            Method::GET,
            "/admin/realms/acme/identity-provider/instances/github/export",
            200,
            "<xml/>",
        );
        let client = mock.client()?;

        assert!(
            client
                .export_identity_provider_public_broker_configuration("master", "acme", "github")
                .await?
        );

        let mapper = IdentityProviderMapperRepresentation {
            name: Some("email".into()),
            ..Default::default()
        };
        assert!(
            client
                .add_identity_provider_mapper("master", "acme", "github", &mapper)
                .await?
        );
        let request = mock.last();
        assert_eq!(
            request.path,
            "/admin/realms/acme/identity-provider/instances/github/mappers"
        );
        assert_eq!(request.json()["name"], "email");
        Ok(())
    }
}
