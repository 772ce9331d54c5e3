use kcadmin_model::types::{MappingsRepresentation, RoleRepresentation};

use crate::{client::KeycloakClient, error::Result};

fn client_scope_path(realm: &str, client_scope_id: &str) -> String {
    format!("/admin/realms/{realm}/client-scopes/{client_scope_id}/scope-mappings")
}

fn client_path(realm: &str, client_id: &str) -> String {
    format!("/admin/realms/{realm}/clients/{client_id}/scope-mappings")
}

/// Roles granted to tokens issued with a client scope.
impl KeycloakClient {
    pub async fn scope_mappings(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
    ) -> Result<MappingsRepresentation> {
        self.get(authentication_realm, &client_scope_path(realm, client_scope_id))
            .await
    }

    pub async fn add_client_roles_to_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
        client_id: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("{}/clients/{client_id}", client_scope_path(realm, client_scope_id)),
            roles,
        )
        .await
    }

    pub async fn client_roles_for_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
        client_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/clients/{client_id}", client_scope_path(realm, client_scope_id)),
        )
        .await
    }

    pub async fn remove_client_roles_from_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
        client_id: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.delete_json(
            authentication_realm,
            &format!("{}/clients/{client_id}", client_scope_path(realm, client_scope_id)),
            roles,
        )
        .await
    }

    pub async fn available_client_roles_for_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
        client_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/clients/{client_id}/available", client_scope_path(realm, client_scope_id)),
        )
        .await
    }

    pub async fn effective_client_roles_for_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
        client_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/clients/{client_id}/composite", client_scope_path(realm, client_scope_id)),
        )
        .await
    }

    pub async fn add_realm_roles_to_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("{}/realm", client_scope_path(realm, client_scope_id)),
            roles,
        )
        .await
    }

    pub async fn realm_roles_for_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/realm", client_scope_path(realm, client_scope_id)),
        )
        .await
    }

    pub async fn remove_realm_roles_from_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.delete_json(
            authentication_realm,
            &format!("{}/realm", client_scope_path(realm, client_scope_id)),
            roles,
        )
        .await
    }

    pub async fn available_realm_roles_for_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/realm/available", client_scope_path(realm, client_scope_id)),
        )
        .await
    }

    pub async fn effective_realm_roles_for_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/realm/composite", client_scope_path(realm, client_scope_id)),
        )
        .await
    }
}

/// Roles granted to tokens issued for a client.
impl KeycloakClient {
    pub async fn scope_mappings_for_client(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
    ) -> Result<MappingsRepresentation> {
        self.get(authentication_realm, &client_path(realm, client_id))
            .await
    }

    pub async fn add_client_roles_scope_mapping_to_client(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        scope_client_id: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("{}/clients/{scope_client_id}", client_path(realm, client_id)),
            roles,
        )
        .await
    }

    pub async fn client_roles_scope_mappings_for_client(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        scope_client_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/clients/{scope_client_id}", client_path(realm, client_id)),
        )
        .await
    }

    pub async fn remove_client_roles_scope_mapping_from_client(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        scope_client_id: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.delete_json(
            authentication_realm,
            &format!("{}/clients/{scope_client_id}", client_path(realm, client_id)),
            roles,
        )
        .await
    }

    pub async fn available_client_roles_scope_mappings_for_client(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        scope_client_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/clients/{scope_client_id}/available", client_path(realm, client_id)),
        )
        .await
    }

    pub async fn effective_client_roles_scope_mappings_for_client(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        scope_client_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/clients/{scope_client_id}/composite", client_path(realm, client_id)),
        )
        .await
    }

    pub async fn add_realm_roles_scope_mapping_to_client(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("{}/realm", client_path(realm, client_id)),
            roles,
        )
        .await
    }

    pub async fn realm_roles_scope_mappings_for_client(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/realm", client_path(realm, client_id)),
        )
        .await
    }

    pub async fn remove_realm_roles_scope_mapping_from_client(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        roles: &[RoleRepresentation],
    ) -> Result<bool> {
        self.delete_json(
            authentication_realm,
            &format!("{}/realm", client_path(realm, client_id)),
            roles,
        )
        .await
    }

    pub async fn available_realm_roles_scope_mappings_for_client(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/realm/available", client_path(realm, client_id)),
        )
        .await
    }

    pub async fn effective_realm_roles_scope_mappings_for_client(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/realm/composite", client_path(realm, client_id)),
        )
        .await
    }
}
