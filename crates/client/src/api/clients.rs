use std::collections::HashMap;

use kcadmin_model::{
    types::{
        AccessToken, ClientRepresentation, ClientScopeRepresentation, CredentialRepresentation,
        GlobalRequestResult, ManagementPermissionReference, ProtocolMapperEvaluationRepresentation,
        RoleRepresentation, UserRepresentation, UserSessionRepresentation,
    },
    GrantedPermission,
};
use reqwest::Method;
use serde_json::Value;

use crate::{client::KeycloakClient, error::Result, query::Params};

const UMA_TICKET_GRANT: &str = "urn:ietf:params:oauth:grant-type:uma-ticket";

impl KeycloakClient {
    pub async fn create_client(
        &self,
        authentication_realm: &str,
        realm: &str,
        client: &ClientRepresentation,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients"),
            client,
        )
        .await
    }

    /// Creates the client and returns the id Keycloak assigned to it.
    pub async fn create_client_and_retrieve_client_id(
        &self,
        authentication_realm: &str,
        realm: &str,
        client: &ClientRepresentation,
    ) -> Result<Option<String>> {
        let request = self
            .request(
                Method::POST,
                authentication_realm,
                &format!("/admin/realms/{realm}/clients"),
            )
            .await?
            .json(client);
        self.created_id(request).await
    }

    pub async fn clients(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: Option<&str>,
        viewable_only: Option<bool>,
    ) -> Result<Vec<ClientRepresentation>> {
        let params = Params::new()
            .opt("clientId", client_id)
            .opt("viewableOnly", viewable_only);
        self.get_query(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients"),
            &params,
        )
        .await
    }

    pub async fn client(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
    ) -> Result<ClientRepresentation> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}"),
        )
        .await
    }

    pub async fn update_client(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        client: &ClientRepresentation,
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}"),
            client,
        )
        .await
    }

    pub async fn delete_client(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}"),
        )
        .await
    }

    /// Replaces the secret of a confidential client.
    pub async fn generate_client_secret(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
    ) -> Result<CredentialRepresentation> {
        self.post_empty_for(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}/client-secret"),
        )
        .await
    }

    pub async fn client_secret(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
    ) -> Result<CredentialRepresentation> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}/client-secret"),
        )
        .await
    }

    pub async fn default_client_scopes(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
    ) -> Result<Vec<ClientScopeRepresentation>> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}/default-client-scopes"),
        )
        .await
    }

    pub async fn update_default_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        client_scope_id: &str,
    ) -> Result<bool> {
        self.put_empty(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{client_id}/default-client-scopes/{client_scope_id}"
            ),
        )
        .await
    }

    pub async fn delete_default_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        client_scope_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{client_id}/default-client-scopes/{client_scope_id}"
            ),
        )
        .await
    }

    pub async fn generate_client_example_access_token(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        scope: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<AccessToken> {
        let params = Params::new().opt("scope", scope).opt("userId", user_id);
        self.get_query(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{client_id}/evaluate-scopes/generate-example-access-token"
            ),
            &params,
        )
        .await
    }

    pub async fn protocol_mappers_in_token_generation(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        scope: Option<&str>,
    ) -> Result<Vec<ProtocolMapperEvaluationRepresentation>> {
        self.get_query(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}/evaluate-scopes/protocol-mappers"),
            &Params::new().opt("scope", scope),
        )
        .await
    }

    pub async fn client_granted_scope_mappings(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        role_container_id: &str,
        scope: Option<&str>,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get_query(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{client_id}/evaluate-scopes/scope-mappings/{role_container_id}/granted"
            ),
            &Params::new().opt("scope", scope),
        )
        .await
    }

    pub async fn client_not_granted_scope_mappings(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        role_container_id: &str,
        scope: Option<&str>,
    ) -> Result<Vec<RoleRepresentation>> {
        self.get_query(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{client_id}/evaluate-scopes/scope-mappings/{role_container_id}/not-granted"
            ),
            &Params::new().opt("scope", scope),
        )
        .await
    }

    /// Installation document of the client, e.g. `keycloak-oidc-keycloak-json`.
    pub async fn client_provider(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        provider_id: &str,
    ) -> Result<String> {
        let request = self
            .request(
                Method::GET,
                authentication_realm,
                &format!(
                    "/admin/realms/{realm}/clients/{client_id}/installation/providers/{provider_id}"
                ),
            )
            .await?;
        self.text(request).await
    }

    pub async fn client_authorization_permissions_initialized(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
    ) -> Result<ManagementPermissionReference> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}/management/permissions"),
        )
        .await
    }

    pub async fn set_client_authorization_permissions_initialized(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        management_permission: &ManagementPermissionReference,
    ) -> Result<ManagementPermissionReference> {
        self.put_json_for(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}/management/permissions"),
            management_permission,
        )
        .await
    }

    pub async fn register_client_cluster_node(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        form_params: &HashMap<String, Value>,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}/nodes"),
            form_params,
        )
        .await
    }

    pub async fn unregister_client_cluster_node(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}/nodes"),
        )
        .await
    }

    pub async fn client_offline_session_count(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
    ) -> Result<i64> {
        let request = self
            .request(
                Method::GET,
                authentication_realm,
                &format!("/admin/realms/{realm}/clients/{client_id}/offline-session-count"),
            )
            .await?;
        self.count(request).await
    }

    pub async fn client_offline_sessions(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        first: Option<i32>,
        max: Option<i32>,
    ) -> Result<Vec<UserSessionRepresentation>> {
        self.get_query(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}/offline-sessions"),
            &Params::new().page(first, max),
        )
        .await
    }

    pub async fn optional_client_scopes(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
    ) -> Result<Vec<ClientScopeRepresentation>> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}/optional-client-scopes"),
        )
        .await
    }

    pub async fn update_optional_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        client_scope_id: &str,
    ) -> Result<bool> {
        self.put_empty(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{client_id}/optional-client-scopes/{client_scope_id}"
            ),
        )
        .await
    }

    pub async fn delete_optional_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        client_scope_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{client_id}/optional-client-scopes/{client_scope_id}"
            ),
        )
        .await
    }

    pub async fn push_client_revocation_policy(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
    ) -> Result<GlobalRequestResult> {
        self.post_empty_for(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}/push-revocation"),
        )
        .await
    }

    pub async fn generate_client_registration_access_token(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
    ) -> Result<ClientRepresentation> {
        self.post_empty_for(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}/registration-access-token"),
        )
        .await
    }

    pub async fn user_for_service_account(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
    ) -> Result<UserRepresentation> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}/service-account-user"),
        )
        .await
    }

    pub async fn client_session_count(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
    ) -> Result<i64> {
        let request = self
            .request(
                Method::GET,
                authentication_realm,
                &format!("/admin/realms/{realm}/clients/{client_id}/session-count"),
            )
            .await?;
        self.count(request).await
    }

    pub async fn test_client_cluster_nodes_available(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
    ) -> Result<GlobalRequestResult> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}/test-nodes-available"),
        )
        .await
    }

    pub async fn client_user_sessions(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        first: Option<i32>,
        max: Option<i32>,
    ) -> Result<Vec<UserSessionRepresentation>> {
        self.get_query(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}/user-sessions"),
            &Params::new().page(first, max),
        )
        .await
    }

    /// Resources the caller may access on the resource server `client_id`,
    /// evaluated by the UMA token endpoint in `permissions` response mode.
    pub async fn resources_owned_by_client(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
    ) -> Result<Vec<GrantedPermission>> {
        let form = [
            ("grant_type", UMA_TICKET_GRANT),
            ("response_mode", "permissions"),
            ("audience", client_id),
        ];
        let request = self
            .request(
                Method::POST,
                authentication_realm,
                &format!("/realms/{realm}/protocol/openid-connect/token"),
            )
            .await?
            .form(&form);
        self.json(request).await
    }
}
