use kcadmin_model::types::{GroupRepresentation, ManagementPermissionReference, UserRepresentation};
use reqwest::Method;

use crate::{client::KeycloakClient, error::Result, query::Params};

impl KeycloakClient {
    pub async fn create_group(
        &self,
        authentication_realm: &str,
        realm: &str,
        group: &GroupRepresentation,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/groups"),
            group,
        )
        .await
    }

    /// Top level groups with their sub groups. Full representations are
    /// always requested.
    pub async fn group_hierarchy(
        &self,
        authentication_realm: &str,
        realm: &str,
        first: Option<i32>,
        max: Option<i32>,
        search: Option<&str>,
    ) -> Result<Vec<GroupRepresentation>> {
        let params = Params::new()
            .page(first, max)
            .opt("search", search)
            .with("briefRepresentation", false);
        self.get_query(
            authentication_realm,
            &format!("/admin/realms/{realm}/groups"),
            &params,
        )
        .await
    }

    pub async fn groups_count(
        &self,
        authentication_realm: &str,
        realm: &str,
        search: Option<&str>,
        top: Option<bool>,
    ) -> Result<i64> {
        let request = self
            .request(
                Method::GET,
                authentication_realm,
                &format!("/admin/realms/{realm}/groups/count"),
            )
            .await?
            .query(&Params::new().opt("search", search).opt("top", top));
        self.count(request).await
    }

    pub async fn group(
        &self,
        authentication_realm: &str,
        realm: &str,
        group_id: &str,
    ) -> Result<GroupRepresentation> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/groups/{group_id}"),
        )
        .await
    }

    pub async fn update_group(
        &self,
        authentication_realm: &str,
        realm: &str,
        group_id: &str,
        group: &GroupRepresentation,
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/groups/{group_id}"),
            group,
        )
        .await
    }

    pub async fn delete_group(
        &self,
        authentication_realm: &str,
        realm: &str,
        group_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("/admin/realms/{realm}/groups/{group_id}"),
        )
        .await
    }

    /// Moves `group` below `group_id` when it has an id, creates it there otherwise.
    pub async fn set_or_create_group_child(
        &self,
        authentication_realm: &str,
        realm: &str,
        group_id: &str,
        group: &GroupRepresentation,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/groups/{group_id}/children"),
            group,
        )
        .await
    }

    pub async fn group_authorization_permissions_initialized(
        &self,
        authentication_realm: &str,
        realm: &str,
        group_id: &str,
    ) -> Result<ManagementPermissionReference> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/groups/{group_id}/management/permissions"),
        )
        .await
    }

    pub async fn set_group_authorization_permissions_initialized(
        &self,
        authentication_realm: &str,
        realm: &str,
        group_id: &str,
        management_permission: &ManagementPermissionReference,
    ) -> Result<ManagementPermissionReference> {
        self.put_json_for(
            authentication_realm,
            &format!("/admin/realms/{realm}/groups/{group_id}/management/permissions"),
            management_permission,
        )
        .await
    }

    pub async fn group_users(
        &self,
        authentication_realm: &str,
        realm: &str,
        group_id: &str,
        first: Option<i32>,
        max: Option<i32>,
    ) -> Result<Vec<UserRepresentation>> {
        self.get_query(
            authentication_realm,
            &format!("/admin/realms/{realm}/groups/{group_id}/members"),
            &Params::new().page(first, max),
        )
        .await
    }
}
