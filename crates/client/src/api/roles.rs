use kcadmin_model::types::{
    GroupRepresentation, ManagementPermissionReference, RoleRepresentation, UserRepresentation,
};

use crate::{client::KeycloakClient, error::Result, query::Params};

fn realm_roles_path(realm: &str) -> String {
    format!("/admin/realms/{realm}/roles")
}

fn client_roles_path(realm: &str, client_id: &str) -> String {
    format!("/admin/realms/{realm}/clients/{client_id}/roles")
}

fn paged_search(first: Option<i32>, max: Option<i32>, search: Option<&str>) -> Params {
    Params::new().page(first, max).opt("search", search)
}

fn role_groups(first: Option<i32>, full: Option<bool>, max: Option<i32>) -> Params {
    Params::new()
        .opt("first", first)
        .opt("full", full)
        .opt("max", max)
}

/// Realm roles.
impl KeycloakClient {
    pub async fn create_role(
        &self,
        authentication_realm: &str,
        realm: &str,
        role: &RoleRepresentation,
    ) -> Result<bool> {
        self.post_json(authentication_realm, &realm_roles_path(realm), role)
            .await
    }

    pub async fn roles(
        &self,
        authentication_realm: &str,
        realm: &str,
        first: Option<i32>,
        max: Option<i32>,
        search: Option<&str>,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get_query(
            authentication_realm,
            &realm_roles_path(realm),
            &paged_search(first, max, search),
        )
        .await
    }

    pub async fn role_by_name(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_name: &str,
    ) -> Result<RoleRepresentation> {
        self.get(
            authentication_realm,
            &format!("{}/{role_name}", realm_roles_path(realm)),
        )
        .await
    }

    pub async fn update_role_by_name(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_name: &str,
        role: &RoleRepresentation,
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!("{}/{role_name}", realm_roles_path(realm)),
            role,
        )
        .await
    }

    pub async fn delete_role_by_name(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_name: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("{}/{role_name}", realm_roles_path(realm)),
        )
        .await
    }

    pub async fn add_composites_to_role(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_name: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("{}/{role_name}/composites", realm_roles_path(realm)),
            roles,
        )
        .await
    }

    pub async fn role_composites(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_name: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/{role_name}/composites", realm_roles_path(realm)),
        )
        .await
    }

    pub async fn remove_composites_from_role(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_name: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.delete_json(
            authentication_realm,
            &format!("{}/{role_name}/composites", realm_roles_path(realm)),
            roles,
        )
        .await
    }

    /// Composites of the realm role that belong to the client `for_client_id`.
    pub async fn application_roles_for_composite(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_name: &str,
        for_client_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!(
                "{}/{role_name}/composites/clients/{for_client_id}",
                realm_roles_path(realm)
            ),
        )
        .await
    }

    pub async fn realm_roles_for_composite(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_name: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/{role_name}/composites/realm", realm_roles_path(realm)),
        )
        .await
    }

    pub async fn groups_with_role_name(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_name: &str,
        first: Option<i32>,
        full: Option<bool>,
        max: Option<i32>,
    ) -> Result<Vec<GroupRepresentation>> {
        self.get_query(
            authentication_realm,
            &format!("{}/{role_name}/groups", realm_roles_path(realm)),
            &role_groups(first, full, max),
        )
        .await
    }

    pub async fn role_authorization_permissions_initialized(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_name: &str,
    ) -> Result<ManagementPermissionReference> {
        self.get(
            authentication_realm,
            &format!(
                "{}/{role_name}/management/permissions",
                realm_roles_path(realm)
            ),
        )
        .await
    }

    pub async fn set_role_authorization_permissions_initialized(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_name: &str,
        management_permission: &ManagementPermissionReference,
    ) -> Result<ManagementPermissionReference> {
        self.put_json_for(
            authentication_realm,
            &format!(
                "{}/{role_name}/management/permissions",
                realm_roles_path(realm)
            ),
            management_permission,
        )
        .await
    }

    pub async fn users_with_role_name(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_name: &str,
        first: Option<i32>,
        max: Option<i32>,
    ) -> Result<Vec<UserRepresentation>> {
        self.get_query(
            authentication_realm,
            &format!("{}/{role_name}/users", realm_roles_path(realm)),
            &Params::new().page(first, max),
        )
        .await
    }
}

/// Client roles, `client_id` is the id of the client, not its `clientId`.
impl KeycloakClient {
    pub async fn create_client_role(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        role: &RoleRepresentation,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &client_roles_path(realm, client_id),
            role,
        )
        .await
    }

    pub async fn client_roles(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        first: Option<i32>,
        max: Option<i32>,
        search: Option<&str>,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get_query(
            authentication_realm,
            &client_roles_path(realm, client_id),
            &paged_search(first, max, search),
        )
        .await
    }

    pub async fn client_role_by_name(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        role_name: &str,
    ) -> Result<RoleRepresentation> {
        self.get(
            authentication_realm,
            &format!("{}/{role_name}", client_roles_path(realm, client_id)),
        )
        .await
    }

    pub async fn update_client_role_by_name(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        role_name: &str,
        role: &RoleRepresentation,
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!("{}/{role_name}", client_roles_path(realm, client_id)),
            role,
        )
        .await
    }

    pub async fn delete_client_role_by_name(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        role_name: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("{}/{role_name}", client_roles_path(realm, client_id)),
        )
        .await
    }

    pub async fn add_composites_to_client_role(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        role_name: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!(
                "{}/{role_name}/composites",
                client_roles_path(realm, client_id)
            ),
            roles,
        )
        .await
    }

    pub async fn client_role_composites(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        role_name: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!(
                "{}/{role_name}/composites",
                client_roles_path(realm, client_id)
            ),
        )
        .await
    }

    pub async fn remove_composites_from_client_role(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        role_name: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.delete_json(
            authentication_realm,
            &format!(
                "{}/{role_name}/composites",
                client_roles_path(realm, client_id)
            ),
            roles,
        )
        .await
    }

    pub async fn application_roles_for_client_role_composite(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        role_name: &str,
        for_client_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!(
                "{}/{role_name}/composites/clients/{for_client_id}",
                client_roles_path(realm, client_id)
            ),
        )
        .await
    }

    pub async fn realm_roles_for_client_role_composite(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        role_name: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!(
                "{}/{role_name}/composites/realm",
                client_roles_path(realm, client_id)
            ),
        )
        .await
    }

    pub async fn groups_with_client_role_name(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        role_name: &str,
        first: Option<i32>,
        full: Option<bool>,
        max: Option<i32>,
    ) -> Result<Vec<GroupRepresentation>> {
        self.get_query(
            authentication_realm,
            &format!("{}/{role_name}/groups", client_roles_path(realm, client_id)),
            &role_groups(first, full, max),
        )
        .await
    }

    pub async fn client_role_authorization_permissions_initialized(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        role_name: &str,
    ) -> Result<ManagementPermissionReference> {
        self.get(
            authentication_realm,
            &format!(
                "{}/{role_name}/management/permissions",
                client_roles_path(realm, client_id)
            ),
        )
        .await
    }

    pub async fn set_client_role_authorization_permissions_initialized(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        role_name: &str,
        management_permission: &ManagementPermissionReference,
    ) -> Result<ManagementPermissionReference> {
        self.put_json_for(
            authentication_realm,
            &format!(
                "{}/{role_name}/management/permissions",
                client_roles_path(realm, client_id)
            ),
            management_permission,
        )
        .await
    }

    pub async fn users_with_client_role_name(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        role_name: &str,
        first: Option<i32>,
        max: Option<i32>,
    ) -> Result<Vec<UserRepresentation>> {
        self.get_query(
            authentication_realm,
            &format!("{}/{role_name}/users", client_roles_path(realm, client_id)),
            &Params::new().page(first, max),
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
    async fn realm_roles_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(
            Method::GET,
            "/admin/realms/acme/roles",
            200,
            json!([{"id": "r-1", "name": "admin", "composite": false}]),
        );
        mock.on(
            Method::GET,
            "/admin/realms/acme/roles/admin",
            200,
            json!({"id": "r-1", "name": "admin"}),
        );
        let client = mock.client()?;

        let roles = client
            .roles("master", "acme", Some(0), Some(10), Some("adm"))
            .await?;
        assert_eq!(roles[0].name.as_deref(), Some("admin"));
        assert_eq!(mock.last().query(), Some("first=0&max=10&search=adm"));

        let role = client.role_by_name("master", "acme", "admin").await?;
        assert_eq!(role.id.as_deref(), Some("r-1"));
        Ok(())
    }

    #[tokio::test]
    async fn composites_are_removed_with_body_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        let client = mock.client()?;
        let composites = vec![RoleRepresentation {
            id: Some("r-2".into()),
            name: Some("viewer".into()),
            ..Default::default()
        }];

        assert!(
            client
                .remove_composites_from_role("master", "acme", "admin", &composites)
                .await?
        );
        let request = mock.last();
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.path, "/admin/realms/acme/roles/admin/composites");
        assert_eq!(request.json()[0]["name"], "viewer");
        Ok(())
    }

    #[tokio::test]
    async fn client_role_groups_query_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        let path = "/admin/realms/acme/clients/c-1/roles/editor/groups";
        mock.on(Method::GET, path, 200, json!([{"id": "g-1", "name": "staff"}]));
        let client = mock.client()?;

        let groups = client
            .groups_with_client_role_name("master", "acme", "c-1", "editor", None, Some(true), Some(5))
            .await?;
        assert_eq!(groups[0].id.as_deref(), Some("g-1"));
        let request = mock.last();
        assert_eq!(request.path, path);
        assert_eq!(request.query(), Some("full=true&max=5"));
        Ok(())
    }

    #[tokio::test]
    async fn create_client_role_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        let client = mock.client()?;
        let role = RoleRepresentation {
            name: Some("editor".into()),
            ..Default::default()
        };

        assert!(
            client
                .create_client_role("master", "acme", "c-1", &role)
                .await?
        );
        let request = mock.last();
        assert_eq!(request.path, "/admin/realms/acme/clients/c-1/roles");
        assert_eq!(request.json()["name"], "editor");
        Ok(())
    }
}
