//! Permissions and policies of a client acting as resource server.
use kcadmin_model::{
    AuthorizationPermission, AuthorizationPermissionType, AuthorizationResource,
    AuthorizationScope, Policy, PolicyType, RolePolicy,
};
use reqwest::Method;

use crate::{
    client::KeycloakClient,
    error::Result,
    query::{PermissionsQuery, PoliciesQuery},
};

impl KeycloakClient {
    /// Creates a permission below `permission/scope` or `permission/resource`
    /// depending on its type and returns the stored permission.
    pub async fn create_authorization_permission(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        permission: &AuthorizationPermission,
    ) -> Result<AuthorizationPermission> {
        let segment = permission.permission_type.path_segment();
        let request = self
            .request(
                Method::POST,
                authentication_realm,
                &format!(
                    "/admin/realms/{realm}/clients/{client_id}/authz/resource-server/permission{segment}"
                ),
            )
            .await?
            .json(permission);
        self.json(request).await
    }

    pub async fn authorization_permission_by_id(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        permission_type: AuthorizationPermissionType,
        permission_id: &str,
    ) -> Result<AuthorizationPermission> {
        let segment = permission_type.path_segment();
        self.get(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{client_id}/authz/resource-server/permission{segment}/{permission_id}"
            ),
        )
        .await
    }

    /// Lists permissions of one type, or of every type when `of_type` is
    /// `None`.
    pub async fn authorization_permissions(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        of_type: Option<AuthorizationPermissionType>,
        query: &PermissionsQuery,
    ) -> Result<Vec<AuthorizationPermission>> {
        let segment = of_type.map(|t| t.path_segment()).unwrap_or_default();
        self.get_query(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{client_id}/authz/resource-server/permission{segment}"
            ),
            query,
        )
        .await
    }

    pub async fn update_authorization_permission(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        permission: &AuthorizationPermission,
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{client_id}/authz/resource-server/permission{}",
                permission.path()
            ),
            permission,
        )
        .await
    }

    pub async fn delete_authorization_permission(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        permission_type: AuthorizationPermissionType,
        permission_id: &str,
    ) -> Result<bool> {
        let segment = permission_type.path_segment();
        self.delete(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{client_id}/authz/resource-server/permission{segment}/{permission_id}"
            ),
        )
        .await
    }

    pub async fn authorization_permission_associated_policies(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        permission_id: &str,
    ) -> Result<Vec<Policy>> {
        self.get(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{client_id}/authz/resource-server/policy/{permission_id}/associatedPolicies"
            ),
        )
        .await
    }

    pub async fn authorization_permission_associated_scopes(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        permission_id: &str,
    ) -> Result<Vec<AuthorizationScope>> {
        self.get(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{client_id}/authz/resource-server/policy/{permission_id}/scopes"
            ),
        )
        .await
    }

    pub async fn authorization_permission_associated_resources(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        permission_id: &str,
    ) -> Result<Vec<AuthorizationResource>> {
        self.get(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{client_id}/authz/resource-server/policy/{permission_id}/resources"
            ),
        )
        .await
    }

    /// Creates a policy, below `policy/role` for role policies, and returns
    /// the stored policy.
    pub async fn create_role_policy(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        policy: &RolePolicy,
    ) -> Result<RolePolicy> {
        let segment = policy.policy_type.path_segment();
        let request = self
            .request(
                Method::POST,
                authentication_realm,
                &format!(
                    "/admin/realms/{realm}/clients/{client_id}/authz/resource-server/policy{segment}"
                ),
            )
            .await?
            .json(policy);
        self.json(request).await
    }

    pub async fn role_policy_by_id(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        policy_type: PolicyType,
        policy_id: &str,
    ) -> Result<RolePolicy> {
        let segment = policy_type.path_segment();
        self.get(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{client_id}/authz/resource-server/policy{segment}/{policy_id}"
            ),
        )
        .await
    }

    pub async fn authorization_policies(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        query: &PoliciesQuery,
    ) -> Result<Vec<Policy>> {
        self.get_query(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}/authz/resource-server/policy"),
            query,
        )
        .await
    }

    pub async fn role_policies(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        query: &PoliciesQuery,
    ) -> Result<Vec<RolePolicy>> {
        self.get_query(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{client_id}/authz/resource-server/policy/role"
            ),
            query,
        )
        .await
    }

    pub async fn update_role_policy(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        policy: &RolePolicy,
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{client_id}/authz/resource-server/policy{}",
                policy.path()
            ),
            policy,
        )
        .await
    }

    pub async fn delete_role_policy(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        policy_type: PolicyType,
        policy_id: &str,
    ) -> Result<bool> {
        let segment = policy_type.path_segment();
        self.delete(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{client_id}/authz/resource-server/policy{segment}/{policy_id}"
            ),
        )
        .await
    }
}
