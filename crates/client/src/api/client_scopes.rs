use kcadmin_model::types::ClientScopeRepresentation;

use crate::{client::KeycloakClient, error::Result};

impl KeycloakClient {
    pub async fn create_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope: &ClientScopeRepresentation,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/client-scopes"),
            client_scope,
        )
        .await
    }

    pub async fn client_scopes(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<Vec<ClientScopeRepresentation>> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/client-scopes"),
        )
        .await
    }

    pub async fn client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
    ) -> Result<ClientScopeRepresentation> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/client-scopes/{client_scope_id}"),
        )
        .await
    }

    pub async fn update_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
        client_scope: &ClientScopeRepresentation,
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/client-scopes/{client_scope_id}"),
            client_scope,
        )
        .await
    }

    pub async fn delete_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("/admin/realms/{realm}/client-scopes/{client_scope_id}"),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use kcadmin_model::types::ClientScopeRepresentation;
    use serde_json::json;

    use crate::test_util::MockKeycloak;

    #[tokio::test]
    async fn client_scope_lifecycle_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(
            Method::GET,
            "/admin/realms/acme/client-scopes",
            200,
            json!([{"id": "cs-1", "name": "profile", "protocol": "openid-connect"}]),
        );
        let client = mock.client()?;
        let scope = ClientScopeRepresentation {
            name: Some("profile".into()),
            ..Default::default()
        };

        assert!(client.create_client_scope("master", "acme", &scope).await?);
        assert_eq!(mock.last().json()["name"], "profile");

        let scopes = client.client_scopes("master", "acme").await?;
        assert_eq!(scopes[0].id.as_deref(), Some("cs-1"));

        assert!(
            client
                .update_client_scope("master", "acme", "cs-1", &scope)
                .await?
        );
        let request = mock.last();
        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.path, "/admin/realms/acme/client-scopes/cs-1");

        assert!(client.delete_client_scope("master", "acme", "cs-1").await?);
        assert_eq!(mock.last().method, Method::DELETE);
        Ok(())
    }
}
