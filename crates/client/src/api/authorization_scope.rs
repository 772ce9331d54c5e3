use kcadmin_model::AuthorizationScope;

use crate::{client::KeycloakClient, error::Result, query::AuthorizationScopesQuery};

impl KeycloakClient {
    pub async fn create_authorization_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        resource_server_id: &str,
        scope: &AuthorizationScope,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{resource_server_id}/authz/resource-server/scope"
            ),
            scope,
        )
        .await
    }

    pub async fn authorization_scopes(
        &self,
        authentication_realm: &str,
        realm: &str,
        resource_server_id: &str,
        query: &AuthorizationScopesQuery,
    ) -> Result<Vec<AuthorizationScope>> {
        self.get_query(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{resource_server_id}/authz/resource-server/scope"
            ),
            query,
        )
        .await
    }

    pub async fn authorization_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        resource_server_id: &str,
        scope_id: &str,
    ) -> Result<AuthorizationScope> {
        self.get(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{resource_server_id}/authz/resource-server/scope/{scope_id}"
            ),
        )
        .await
    }

    pub async fn update_authorization_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        resource_server_id: &str,
        scope_id: &str,
        scope: &AuthorizationScope,
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{resource_server_id}/authz/resource-server/scope/{scope_id}"
            ),
            scope,
        )
        .await
    }

    pub async fn delete_authorization_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        resource_server_id: &str,
        scope_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{resource_server_id}/authz/resource-server/scope/{scope_id}"
            ),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use serde_json::json;

    use crate::{query::AuthorizationScopesQuery, test_util::MockKeycloak};

    #[tokio::test]
    async fn scopes_always_send_deep_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(
            Method::GET,
            "/admin/realms/acme/clients/rs-1/authz/resource-server/scope",
            200,
            json!([{"id": "s-1", "name": "read", "iconUri": "https://icons/read.svg"}]),
        );
        let client = mock.client()?;

        let scopes = client
            .authorization_scopes("master", "acme", "rs-1", &AuthorizationScopesQuery::default())
            .await?;
        assert_eq!(scopes[0].name.as_deref(), Some("read"));
        assert_eq!(scopes[0].icon_uri.as_deref(), Some("https://icons/read.svg"));
        assert_eq!(mock.last().query(), Some("deep=false"));

        client
            .delete_authorization_scope("master", "acme", "rs-1", "s-1")
            .await?;
        let request = mock.last();
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(
            request.path,
            "/admin/realms/acme/clients/rs-1/authz/resource-server/scope/s-1"
        );
        Ok(())
    }
}
