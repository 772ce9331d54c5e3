use kcadmin_model::types::RoleRepresentation;

use crate::{client::KeycloakClient, error::Result};

fn group_mappings_path(realm: &str, group_id: &str, client_id: &str) -> String {
    format!("/admin/realms/{realm}/groups/{group_id}/role-mappings/clients/{client_id}")
}

fn user_mappings_path(realm: &str, user_id: &str, client_id: &str) -> String {
    format!("/admin/realms/{realm}/users/{user_id}/role-mappings/clients/{client_id}")
}

impl KeycloakClient {
    pub async fn add_group_client_role_mappings(
        &self,
        authentication_realm: &str,
        realm: &str,
        group_id: &str,
        client_id: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &group_mappings_path(realm, group_id, client_id),
            roles,
        )
        .await
    }

    pub async fn group_client_role_mappings(
        &self,
        authentication_realm: &str,
        realm: &str,
        group_id: &str,
        client_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &group_mappings_path(realm, group_id, client_id),
        )
        .await
    }

    pub async fn delete_group_client_role_mappings(
        &self,
        authentication_realm: &str,
        realm: &str,
        group_id: &str,
        client_id: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.delete_json(
            authentication_realm,
            &group_mappings_path(realm, group_id, client_id),
            roles,
        )
        .await
    }

    pub async fn available_group_client_role_mappings(
        &self,
        authentication_realm: &str,
        realm: &str,
        group_id: &str,
        client_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!(
                "{}/available",
                group_mappings_path(realm, group_id, client_id)
            ),
        )
        .await
    }

    /// Effective client roles of the group, composites expanded.
    pub async fn composite_group_client_role_mappings(
        &self,
        authentication_realm: &str,
        realm: &str,
        group_id: &str,
        client_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!(
                "{}/composite",
                group_mappings_path(realm, group_id, client_id)
            ),
        )
        .await
    }

    pub async fn add_user_client_role_mappings(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
        client_id: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &user_mappings_path(realm, user_id, client_id),
            roles,
        )
        .await
    }

    pub async fn user_client_role_mappings(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
        client_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &user_mappings_path(realm, user_id, client_id),
        )
        .await
    }

    pub async fn delete_user_client_role_mappings(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
        client_id: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.delete_json(
            authentication_realm,
            &user_mappings_path(realm, user_id, client_id),
            roles,
        )
        .await
    }

    pub async fn available_user_client_role_mappings(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
        client_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/available", user_mappings_path(realm, user_id, client_id)),
        )
        .await
    }

    pub async fn composite_user_client_role_mappings(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
        client_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/composite", user_mappings_path(realm, user_id, client_id)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use kcadmin_model::types::RoleRepresentation;
    use serde_json::json;

    use crate::test_util::MockKeycloak;

    #[tokio::test]
    async fn user_client_role_mappings_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        let path = "/admin/realms/acme/users/u-1/role-mappings/clients/c-1";
        mock.on(
            Method::GET,
            &format!("{path}/composite"),
            200,
            json!([{"id": "r-1", "name": "viewer"}, {"id": "r-2", "name": "editor"}]),
        );
        let client = mock.client()?;
        let roles = vec![RoleRepresentation {
            id: Some("r-1".into()),
            name: Some("viewer".into()),
            ..Default::default()
        }];

        assert!(
            client
                .add_user_client_role_mappings("master", "acme", "u-1", "c-1", &roles)
                .await?
        );
        let request = mock.last();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, path);
        assert_eq!(request.json()[0]["name"], "viewer");

        assert!(
            client
                .delete_user_client_role_mappings("master", "acme", "u-1", "c-1", &roles)
                .await?
        );
        let request = mock.last();
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.json()[0]["id"], "r-1");

        let composite = client
            .composite_user_client_role_mappings("master", "acme", "u-1", "c-1")
            .await?;
        assert_eq!(composite.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn group_client_role_mappings_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        let path = "/admin/realms/acme/groups/g-1/role-mappings/clients/c-1/available";
        mock.on(Method::GET, path, 200, json!([{"name": "auditor"}]));
        let client = mock.client()?;

        let available = client
            .available_group_client_role_mappings("master", "acme", "g-1", "c-1")
            .await?;
        assert_eq!(available[0].name.as_deref(), Some("auditor"));
        assert_eq!(mock.last().path, path);
        Ok(())
    }
}
