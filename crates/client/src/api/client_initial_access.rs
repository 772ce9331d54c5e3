use kcadmin_model::types::{ClientInitialAccessCreatePresentation, ClientInitialAccessPresentation};
use reqwest::Method;

use crate::{client::KeycloakClient, error::Result};

impl KeycloakClient {
    /// Creates an initial access token for dynamic client registration. The
    /// token itself is only part of this response.
    pub async fn create_initial_access_token(
        &self,
        authentication_realm: &str,
        realm: &str,
        create: &ClientInitialAccessCreatePresentation,
    ) -> Result<ClientInitialAccessPresentation> {
        let request = self
            .request(
                Method::POST,
                authentication_realm,
                &format!("/admin/realms/{realm}/clients-initial-access"),
            )
            .await?
            .json(create);
        self.json(request).await
    }

    pub async fn client_initial_access(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<Vec<ClientInitialAccessPresentation>> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients-initial-access"),
        )
        .await
    }

    pub async fn delete_initial_access_token(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_initial_access_token_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients-initial-access/{client_initial_access_token_id}"
            ),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use kcadmin_model::types::ClientInitialAccessCreatePresentation;
    use serde_json::json;

    use crate::test_util::MockKeycloak;

    #[tokio::test]
    async fn initial_access_token_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(
            Method::POST,
            "/admin/realms/acme/clients-initial-access",
            201,
            json!({"id": "ia-1", "token": "eyJ", "count": 5, "remainingCount": 5}),
        );
        let client = mock.client()?;

        let created = client
            .create_initial_access_token(
                "master",
                "acme",
                &ClientInitialAccessCreatePresentation {
                    count: Some(5),
                    expiration: Some(3600),
                    ..Default::default()
                },
            )
            .await?;
        assert_eq!(created.id.as_deref(), Some("ia-1"));
        assert_eq!(created.token.as_deref(), Some("eyJ"));
        assert_eq!(mock.last().json()["count"], 5);

        assert!(
            client
                .delete_initial_access_token("master", "acme", "ia-1")
                .await?
        );
        assert_eq!(
            mock.last().path,
            "/admin/realms/acme/clients-initial-access/ia-1"
        );
        Ok(())
    }
}
