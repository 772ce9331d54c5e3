use kcadmin_model::types::{ManagementPermissionReference, RoleRepresentation};

use crate::{client::KeycloakClient, error::Result};

fn role_path(realm: &str, role_id: &str) -> String {
    format!("/admin/realms/{realm}/roles-by-id/{role_id}")
}

impl KeycloakClient {
    pub async fn role_by_id(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_id: &str,
    ) -> Result<RoleRepresentation> {
        self.get(authentication_realm, &role_path(realm, role_id))
            .await
    }

    pub async fn update_role_by_id(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_id: &str,
        role: &RoleRepresentation,
    ) -> Result<bool> {
        self.put_json(authentication_realm, &role_path(realm, role_id), role)
            .await
    }

    pub async fn delete_role_by_id(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_id: &str,
    ) -> Result<bool> {
        self.delete(authentication_realm, &role_path(realm, role_id))
            .await
    }

    pub async fn make_role_composite(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_id: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("{}/composites", role_path(realm, role_id)),
            roles,
        )
        .await
    }

    pub async fn role_children(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/composites", role_path(realm, role_id)),
        )
        .await
    }

    pub async fn remove_roles_from_composite(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_id: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.delete_json(
            authentication_realm,
            &format!("{}/composites", role_path(realm, role_id)),
            roles,
        )
        .await
    }

    pub async fn client_roles_for_composite_by_id(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_id: &str,
        client_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!(
                "{}/composites/clients/{client_id}",
                role_path(realm, role_id)
            ),
        )
        .await
    }

    pub async fn realm_roles_for_composite_by_id(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/composites/realm", role_path(realm, role_id)),
        )
        .await
    }

    pub async fn role_by_id_authorization_permissions_initialized(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_id: &str,
    ) -> Result<ManagementPermissionReference> {
        self.get(
            authentication_realm,
            &format!("{}/management/permissions", role_path(realm, role_id)),
        )
        .await
    }

    pub async fn set_role_by_id_authorization_permissions_initialized(
        &self,
        authentication_realm: &str,
        realm: &str,
        role_id: &str,
        management_permission: &ManagementPermissionReference,
    ) -> Result<ManagementPermissionReference> {
        self.put_json_for(
            authentication_realm,
            &format!("{}/management/permissions", role_path(realm, role_id)),
            management_permission,
        )
        .await
    }
}
