use kcadmin_model::AuthorizationResource;

use crate::{client::KeycloakClient, error::Result, query::ResourcesQuery};

impl KeycloakClient {
    pub async fn create_resource(
        &self,
        authentication_realm: &str,
        realm: &str,
        resource_server_id: &str,
        resource: &AuthorizationResource,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{resource_server_id}/authz/resource-server/resource"
            ),
            resource,
        )
        .await
    }

    pub async fn resources(
        &self,
        authentication_realm: &str,
        realm: &str,
        resource_server_id: &str,
        query: &ResourcesQuery,
    ) -> Result<Vec<AuthorizationResource>> {
        self.get_query(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{resource_server_id}/authz/resource-server/resource"
            ),
            query,
        )
        .await
    }

    pub async fn resource(
        &self,
        authentication_realm: &str,
        realm: &str,
        resource_server_id: &str,
        resource_id: &str,
    ) -> Result<AuthorizationResource> {
        self.get(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{resource_server_id}/authz/resource-server/resource/{resource_id}"
            ),
        )
        .await
    }

    pub async fn update_resource(
        &self,
        authentication_realm: &str,
        realm: &str,
        resource_server_id: &str,
        resource_id: &str,
        resource: &AuthorizationResource,
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{resource_server_id}/authz/resource-server/resource/{resource_id}"
            ),
            resource,
        )
        .await
    }

    pub async fn delete_resource(
        &self,
        authentication_realm: &str,
        realm: &str,
        resource_server_id: &str,
        resource_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{resource_server_id}/authz/resource-server/resource/{resource_id}"
            ),
        )
        .await
    }
}
