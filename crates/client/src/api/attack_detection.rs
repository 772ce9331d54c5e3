use kcadmin_model::UserNameStatus;

use crate::{client::KeycloakClient, error::Result};

impl KeycloakClient {
    /// Clears login failures of all users and releases temporary lockouts.
    pub async fn clear_user_login_failures(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("/admin/realms/{realm}/attack-detection/brute-force/users"),
        )
        .await
    }

    pub async fn clear_user_login_failures_for_user(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("/admin/realms/{realm}/attack-detection/brute-force/users/{user_id}"),
        )
        .await
    }

    pub async fn user_name_status_in_brute_force_detection(
        &self,
        authentication_realm: &str,
        realm: &str,
        user_id: &str,
    ) -> Result<UserNameStatus> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/attack-detection/brute-force/users/{user_id}"),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use serde_json::json;

    use crate::test_util::MockKeycloak;

    #[tokio::test]
    async fn brute_force_status_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(
            Method::GET,
            "/admin/realms/acme/attack-detection/brute-force/users/u-1",
            200,
            json!({"numFailures": 2, "disabled": false, "lastIPFailure": "10.1.1.1", "lastFailure": 0}),
        );
        let client = mock.client()?;

        let status = client
            .user_name_status_in_brute_force_detection("master", "acme", "u-1")
            .await?;
        assert_eq!(status.num_failures, Some(2));
        assert_eq!(status.last_ip_failure.as_deref(), Some("10.1.1.1"));

        assert!(client.clear_user_login_failures("master", "acme").await?);
        let request = mock.last();
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(
            request.path,
            "/admin/realms/acme/attack-detection/brute-force/users"
        );

        assert!(
            client
                .clear_user_login_failures_for_user("master", "acme", "u-1")
                .await?
        );
        assert_eq!(
            mock.last().path,
            "/admin/realms/acme/attack-detection/brute-force/users/u-1"
        );
        Ok(())
    }
}
