use kcadmin_model::types::{MappingsRepresentation, RoleRepresentation};

use crate::{client::KeycloakClient, error::Result};

fn group_path(realm: &str, group_id: &str) -> String {
    format!("/admin/realms/{realm}/groups/{group_id}/role-mappings")
}

fn user_path(realm: &str, user_id: &str) -> String {
    format!("/admin/realms/{realm}/users/{user_id}/role-mappings")
}

impl KeycloakClient {
    /// Realm and client role mappings of the group.
    pub async fn role_mappings_for_group(
        &self,
        authentication_realm: &str,
        realm: &str,
        group_id: &str,
    ) -> Result<MappingsRepresentation> {
        self.get(authentication_realm, &group_path(realm, group_id))
            .await
    }

    pub async fn add_realm_role_mappings_to_group(
        &self,
        authentication_realm: &str,
        realm: &str,
        group_id: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("{}/realm", group_path(realm, group_id)),
            roles,
        )
        .await
    }

    pub async fn realm_role_mappings_for_group(
        &self,
        authentication_realm: &str,
        realm: &str,
        group_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/realm", group_path(realm, group_id)),
        )
        .await
    }

    pub async fn delete_realm_role_mappings_from_group(
        &self,
        authentication_realm: &str,
        realm: &str,
        group_id: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.delete_json(
            authentication_realm,
            &format!("{}/realm", group_path(realm, group_id)),
            roles,
        )
        .await
    }

    pub async fn available_realm_role_mappings_for_group(
        &self,
        authentication_realm: &str,
        realm: &str,
        group_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/realm/available", group_path(realm, group_id)),
        )
        .await
    }

    pub async fn effective_realm_role_mappings_for_group(
        &self,
        authentication_realm: &str,
        realm: &str,
        group_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/realm/composite", group_path(realm, group_id)),
        )
        .await
    }

    pub async fn role_mappings_for_user(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
    ) -> Result<MappingsRepresentation> {
        self.get(authentication_realm, &user_path(realm, user_id))
            .await
    }

    pub async fn add_realm_role_mappings_to_user(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("{}/realm", user_path(realm, user_id)),
            roles,
        )
        .await
    }

    pub async fn realm_role_mappings_for_user(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/realm", user_path(realm, user_id)),
        )
        .await
    }

    pub async fn delete_realm_role_mappings_from_user(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.delete_json(
            authentication_realm,
            &format!("{}/realm", user_path(realm, user_id)),
            roles,
        )
        .await
    }

    pub async fn available_realm_role_mappings_for_user(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/realm/available", user_path(realm, user_id)),
        )
        .await
    }

    pub async fn effective_realm_role_mappings_for_user(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/realm/composite", user_path(realm, user_id)),
        )
        .await
    }
}
