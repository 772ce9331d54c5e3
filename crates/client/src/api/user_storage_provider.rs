use kcadmin_model::{LdapMapperSyncDirection, SynchronizationResult, UserSyncAction};
use reqwest::Method;

use crate::{client::KeycloakClient, error::Result, query::Params};

fn storage_path(realm: &str, storage_provider_id: &str) -> String {
    format!("/admin/realms/{realm}/user-storage/{storage_provider_id}")
}

impl KeycloakClient {
    pub async fn remove_imported_users(
        &self,
        authentication_realm: &str,
        realm: &str,
        storage_provider_id: &str,
    ) -> Result<bool> {
        self.post_empty(
            authentication_realm,
            &format!(
                "{}/remove-imported-users",
                storage_path(realm, storage_provider_id)
            ),
        )
        .await
    }

    pub async fn trigger_user_synchronization(
        &self,
        authentication_realm: &str,
        realm: &str,
        storage_provider_id: &str,
        action: UserSyncAction,
    ) -> Result<SynchronizationResult> {
        let request = self
            .request(
                Method::POST,
                authentication_realm,
                &format!("{}/sync", storage_path(realm, storage_provider_id)),
            )
            .await?
            .query(&Params::new().with("action", action))
            .body("");
        self.json(request).await
    }

    /// Keeps the imported users but detaches them from the provider.
    pub async fn unlink_imported_users(
        &self,
        authentication_realm: &str,
        realm: &str,
        storage_provider_id: &str,
    ) -> Result<bool> {
        self.post_empty(
            authentication_realm,
            &format!("{}/unlink-users", storage_path(realm, storage_provider_id)),
        )
        .await
    }

    pub async fn trigger_ldap_mapper_synchronization(
        &self,
        authentication_realm: &str,
        realm: &str,
        storage_provider_id: &str,
        mapper_id: &str,
        direction: LdapMapperSyncDirection,
    ) -> Result<SynchronizationResult> {
        let request = self
            .request(
                Method::POST,
                authentication_realm,
                &format!(
                    "{}/mappers/{mapper_id}/sync",
                    storage_path(realm, storage_provider_id)
                ),
            )
            .await?
            .query(&Params::new().with("direction", direction))
            .body("");
        self.json(request).await
    }
}
