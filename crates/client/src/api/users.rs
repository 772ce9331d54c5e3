use std::collections::HashMap;

use kcadmin_model::{
    types::{
        CredentialRepresentation, FederatedIdentityRepresentation, GroupRepresentation,
        UserConsentRepresentation, UserRepresentation, UserSessionRepresentation,
    },
    SetPasswordResponse,
};
use reqwest::Method;
use serde_json::Value;

use crate::{
    client::KeycloakClient,
    error::{Error, Result},
    query::{Params, UsersQuery},
};

fn user_path(realm: &str, user_id: &str) -> String {
    format!("/admin/realms/{realm}/users/{user_id}")
}

fn password_credential(password: &str, temporary: bool) -> CredentialRepresentation {
    CredentialRepresentation {
        value: Some(password.to_string()),
        temporary: Some(temporary),
        ..Default::default()
    }
}

impl KeycloakClient {
    pub async fn create_user(
        &self,
        authentication_realm: &str,
        realm: &str,
        user: &UserRepresentation,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/users"),
            user,
        )
        .await
    }

    /// Creates the user and returns the id taken from the `Location` header.
    pub async fn create_and_retrieve_user_id(
        &self,
        authentication_realm: &str,
        realm: &str,
        user: &UserRepresentation,
    ) -> Result<Option<String>> {
        let request = self
            .request(
                Method::POST,
                authentication_realm,
                &format!("/admin/realms/{realm}/users"),
            )
            .await?
            .json(user);
        self.created_id(request).await
    }

    pub async fn users(
        &self,
        authentication_realm: &str,
        realm: &str,
        query: &UsersQuery,
    ) -> Result<Vec<UserRepresentation>> {
        self.get_query(
            authentication_realm,
            &format!("/admin/realms/{realm}/users"),
            query,
        )
        .await
    }

    pub async fn users_count(&self, authentication_realm: &str, realm: &str) -> Result<i64> {
        let request = self
            .request(
                Method::GET,
                authentication_realm,
                &format!("/admin/realms/{realm}/users/count"),
            )
            .await?;
        self.count(request).await
    }

    pub async fn user(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
    ) -> Result<UserRepresentation> {
        self.get(authentication_realm, &user_path(realm, user_id))
            .await
    }

    pub async fn update_user(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
        user: &UserRepresentation,
    ) -> Result<bool> {
        self.put_json(authentication_realm, &user_path(realm, user_id), user)
            .await
    }

    pub async fn delete_user(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
    ) -> Result<bool> {
        self.delete(authentication_realm, &user_path(realm, user_id))
            .await
    }

    pub async fn user_consents(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
    ) -> Result<Vec<UserConsentRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/consents", user_path(realm, user_id)),
        )
        .await
    }

    pub async fn revoke_user_consent_and_offline_tokens(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
        client_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("{}/consents/{client_id}", user_path(realm, user_id)),
        )
        .await
    }

    pub async fn user_credentials(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
    ) -> Result<Vec<CredentialRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/credentials", user_path(realm, user_id)),
        )
        .await
    }

    pub async fn disable_user_credentials(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
        credential_types: &[String],
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!("{}/disable-credential-types", user_path(realm, user_id)),
            credential_types,
        )
        .await
    }

    /// Sends an email asking the user to perform `required_actions`, e.g.
    /// `UPDATE_PASSWORD` or `VERIFY_EMAIL`.
    pub async fn send_user_update_account_email(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
        required_actions: &[String],
        client_id: Option<&str>,
        lifespan: Option<i32>,
        redirect_uri: Option<&str>,
    ) -> Result<bool> {
        let params = Params::new()
            .opt("client_id", client_id)
            .opt("lifespan", lifespan)
            .opt("redirect_uri", redirect_uri);
        let request = self
            .request(
                Method::PUT,
                authentication_realm,
                &format!("{}/execute-actions-email", user_path(realm, user_id)),
            )
            .await?
            .query(&params)
            .json(required_actions);
        self.success(request).await
    }

    pub async fn user_social_logins(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
    ) -> Result<Vec<FederatedIdentityRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/federated-identity", user_path(realm, user_id)),
        )
        .await
    }

    pub async fn add_user_social_login_provider(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
        provider: &str,
        federated_identity: &FederatedIdentityRepresentation,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("{}/federated-identity/{provider}", user_path(realm, user_id)),
            federated_identity,
        )
        .await
    }

    pub async fn remove_user_social_login_provider(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
        provider: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("{}/federated-identity/{provider}", user_path(realm, user_id)),
        )
        .await
    }

    pub async fn user_groups(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
    ) -> Result<Vec<GroupRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/groups", user_path(realm, user_id)),
        )
        .await
    }

    pub async fn user_groups_count(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
    ) -> Result<i64> {
        let request = self
            .request(
                Method::GET,
                authentication_realm,
                &format!("{}/groups/count", user_path(realm, user_id)),
            )
            .await?;
        self.count(request).await
    }

    /// Adds the user to the group.
    pub async fn update_user_group(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
        group_id: &str,
    ) -> Result<bool> {
        self.put_empty(
            authentication_realm,
            &format!("{}/groups/{group_id}", user_path(realm, user_id)),
        )
        .await
    }

    pub async fn delete_user_group(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
        group_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("{}/groups/{group_id}", user_path(realm, user_id)),
        )
        .await
    }

    pub async fn impersonate_user(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
    ) -> Result<HashMap<String, Value>> {
        self.post_empty_for(
            authentication_realm,
            &format!("{}/impersonation", user_path(realm, user_id)),
        )
        .await
    }

    /// Logs out every session of one user.
    pub async fn remove_user_sessions(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
    ) -> Result<bool> {
        self.post_empty(
            authentication_realm,
            &format!("{}/logout", user_path(realm, user_id)),
        )
        .await
    }

    pub async fn user_offline_sessions(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
        client_id: &str,
    ) -> Result<Vec<UserSessionRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/offline-sessions/{client_id}", user_path(realm, user_id)),
        )
        .await
    }

    pub async fn remove_user_totp(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
    ) -> Result<bool> {
        self.put_empty(
            authentication_realm,
            &format!("{}/remove-totp", user_path(realm, user_id)),
        )
        .await
    }

    pub async fn reset_user_password(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
        credential: &CredentialRepresentation,
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!("{}/reset-password", user_path(realm, user_id)),
            credential,
        )
        .await
    }

    pub async fn reset_user_password_with(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
        password: &str,
        temporary: bool,
    ) -> Result<bool> {
        self.reset_user_password(
            authentication_realm,
            realm,
            user_id,
            &password_credential(password, temporary),
        )
        .await
    }

    /// Sets a permanent password. A password rejected by Keycloak, e.g. by
    /// the realm password policy, is reported in the response instead of
    /// failing.
    pub async fn set_user_password(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
        password: &str,
    ) -> Result<SetPasswordResponse> {
        let request = self
            .request(
                Method::PUT,
                authentication_realm,
                &format!("{}/reset-password", user_path(realm, user_id)),
            )
            .await?
            .json(&password_credential(password, false));
        match self.send(request).await {
            Ok(_) => Ok(SetPasswordResponse::succeeded()),
            Err(Error::HttpFailure { body, text, .. }) => {
                let body = body.unwrap_or_default();
                Ok(SetPasswordResponse {
                    success: false,
                    error: body.error,
                    error_description: body
                        .error_description
                        .or(body.error_message)
                        .or_else(|| Some(text).filter(|text| !text.is_empty())),
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Sends the verification email. Empty `client_id` or `redirect_uri`
    /// are left out of the query.
    pub async fn verify_user_email_address(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
        client_id: Option<&str>,
        redirect_uri: Option<&str>,
    ) -> Result<bool> {
        let params = Params::new()
            .non_empty("client_id", client_id)
            .non_empty("redirect_uri", redirect_uri);
        let request = self
            .request(
                Method::PUT,
                authentication_realm,
                &format!("{}/send-verify-email", user_path(realm, user_id)),
            )
            .await?
            .query(&params)
            .json(&Value::Null);
        self.success(request).await
    }

    pub async fn user_sessions(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
    ) -> Result<Vec<UserSessionRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/sessions", user_path(realm, user_id)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use kcadmin_model::types::UserRepresentation;
    use serde_json::json;

    use crate::{error::Error, query::UsersQuery, test_util::MockKeycloak};

    #[tokio::test]
    async fn create_and_retrieve_user_id_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on_created(
            Method::POST,
            "/admin/realms/acme/users",
            "http://kc/admin/realms/acme/users/8d2e-41",
        );
        let client = mock.client()?;
        let user = UserRepresentation {
            username: Some("ada".into()),
            enabled: Some(true),
            ..Default::default()
        };

        let id = client
            .create_and_retrieve_user_id("master", "acme", &user)
            .await?;
        assert_eq!(id.as_deref(), Some("8d2e-41"));
        assert_eq!(mock.last().json()["username"], "ada");
        Ok(())
    }

    #[tokio::test]
    async fn created_without_location_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        let client = mock.client()?;

        let id = client
            .create_and_retrieve_user_id("master", "acme", &UserRepresentation::default())
            .await?;
        assert_eq!(id, None);
        Ok(())
    }

    #[tokio::test]
    async fn users_query_and_count_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(
            Method::GET,
            "/admin/realms/acme/users",
            200,
            json!([{"id": "u-1", "username": "ada"}]),
        );
        mock.on(Method::GET, "/admin/realms/acme/users/count", 200, json!(42));
        let client = mock.client()?;

        let users = client
            .users(
                "master",
                "acme",
                &UsersQuery {
                    username: Some("ada".into()),
                    exact: Some(true),
                    ..Default::default()
                },
            )
            .await?;
        assert_eq!(users[0].id.as_deref(), Some("u-1"));
        assert_eq!(mock.last().query(), Some("exact=true&username=ada"));

        assert_eq!(client.users_count("master", "acme").await?, 42);
        Ok(())
    }

    #[tokio::test]
    async fn user_groups_count_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(
            Method::GET,
            "/admin/realms/acme/users/u-1/groups/count",
            200,
            json!({"count": 4}),
        );
        let client = mock.client()?;

        assert_eq!(client.user_groups_count("master", "acme", "u-1").await?, 4);
        Ok(())
    }

    #[tokio::test]
    async fn execute_actions_email_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        let client = mock.client()?;

        assert!(
            client
                .send_user_update_account_email(
                    "master",
                    "acme",
                    "u-1",
                    &["UPDATE_PASSWORD".to_string()],
                    Some("portal"),
                    Some(3600),
                    None,
                )
                .await?
        );
        let request = mock.last();
        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.path, "/admin/realms/acme/users/u-1/execute-actions-email");
        assert_eq!(request.query(), Some("client_id=portal&lifespan=3600"));
        assert_eq!(request.json(), json!(["UPDATE_PASSWORD"]));
        Ok(())
    }

    #[tokio::test]
    async fn verify_email_omits_empty_params_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        let client = mock.client()?;

        assert!(
            client
                .verify_user_email_address("master", "acme", "u-1", Some(""), Some("https://app/"))
                .await?
        );
        let request = mock.last();
        assert_eq!(request.query(), Some("redirect_uri=https%3A%2F%2Fapp%2F"));
        assert_eq!(request.text(), "null");

        client
            .verify_user_email_address("master", "acme", "u-1", None, None)
            .await?;
        assert_eq!(mock.last().query(), None);
        Ok(())
    }

    #[tokio::test]
    async fn reset_password_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        let client = mock.client()?;

        assert!(
            client
                .reset_user_password_with("master", "acme", "u-1", "s3cr3t", true)
                .await?
        );
        let request = mock.last();
        assert_eq!(request.path, "/admin/realms/acme/users/u-1/reset-password");
        let body = request.json();
        assert_eq!(body["value"], "s3cr3t");
        assert_eq!(body["temporary"], true);
        Ok(())
    }

    #[tokio::test]
    async fn set_password_success_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        let client = mock.client()?;

        let response = client
            .set_user_password("master", "acme", "u-1", "s3cr3t")
            .await?;
        assert!(response.success);
        assert_eq!(response.error, None);
        assert_eq!(mock.last().json()["temporary"], false);
        Ok(())
    }

    #[tokio::test]
    async fn set_password_rejected_is_not_an_error_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(
            Method::PUT,
            "/admin/realms/acme/users/u-1/reset-password",
            400,
            json!({
                "error": "invalidPasswordMinLengthMessage",
                "error_description": "Invalid password: minimum length 8."
            }),
        );
        let client = mock.client()?;

        let response = client
            .set_user_password("master", "acme", "u-1", "short")
            .await?;
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("invalidPasswordMinLengthMessage"));
        assert_eq!(
            response.error_description.as_deref(),
            Some("Invalid password: minimum length 8.")
        );

        let err = client
            .reset_user_password_with("master", "acme", "u-1", "short", false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::HttpFailure { status: 400, .. }));
        Ok(())
    }

    #[tokio::test]
    async fn user_group_membership_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        let client = mock.client()?;

        assert!(
            client
                .update_user_group("master", "acme", "u-1", "g-1")
                .await?
        );
        let request = mock.last();
        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.path, "/admin/realms/acme/users/u-1/groups/g-1");

        assert!(
            client
                .remove_user_sessions("master", "acme", "u-1")
                .await?
        );
        assert_eq!(mock.last().path, "/admin/realms/acme/users/u-1/logout");
        Ok(())
    }
}
