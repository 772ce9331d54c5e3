use kcadmin_model::{types::ProtocolMapperRepresentation, Protocol};

use crate::{client::KeycloakClient, error::Result};

fn mappers_path(realm: &str, client_scope_id: &str) -> String {
    format!("/admin/realms/{realm}/client-scopes/{client_scope_id}/protocol-mappers")
}

impl KeycloakClient {
    pub async fn create_multiple_protocol_mappers(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
        protocol_mappers: &[ProtocolMapperRepresentation],
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("{}/add-models", mappers_path(realm, client_scope_id)),
            protocol_mappers,
        )
        .await
    }

    pub async fn create_protocol_mapper(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
        protocol_mapper: &ProtocolMapperRepresentation,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("{}/models", mappers_path(realm, client_scope_id)),
            protocol_mapper,
        )
        .await
    }

    pub async fn protocol_mappers(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
    ) -> Result<Vec<ProtocolMapperRepresentation>> {
        self.get(
            authentication_realm,
            &format!("{}/models", mappers_path(realm, client_scope_id)),
        )
        .await
    }

    pub async fn protocol_mapper(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
        protocol_mapper_id: &str,
    ) -> Result<ProtocolMapperRepresentation> {
        self.get(
            authentication_realm,
            &format!(
                "{}/models/{protocol_mapper_id}",
                mappers_path(realm, client_scope_id)
            ),
        )
        .await
    }

    pub async fn update_protocol_mapper(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
        protocol_mapper_id: &str,
        protocol_mapper: &ProtocolMapperRepresentation,
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!(
                "{}/models/{protocol_mapper_id}",
                mappers_path(realm, client_scope_id)
            ),
            protocol_mapper,
        )
        .await
    }

    pub async fn delete_protocol_mapper(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
        protocol_mapper_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!(
                "{}/models/{protocol_mapper_id}",
                mappers_path(realm, client_scope_id)
            ),
        )
        .await
    }

    pub async fn protocol_mappers_by_protocol(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
        protocol: Protocol,
    ) -> Result<Vec<ProtocolMapperRepresentation>> {
        self.get(
            authentication_realm,
            &format!(
                "{}/protocol/{protocol}",
                mappers_path(realm, client_scope_id)
            ),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use kcadmin_model::{types::ProtocolMapperRepresentation, Protocol};
    use serde_json::json;

    use crate::test_util::MockKeycloak;

    #[tokio::test]
    async fn add_models_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        let client = mock.client()?;
        let mappers = vec![
            ProtocolMapperRepresentation {
                name: Some("email".into()),
                ..Default::default()
            },
            ProtocolMapperRepresentation {
                name: Some("groups".into()),
                ..Default::default()
            },
        ];

        assert!(
            client
                .create_multiple_protocol_mappers("master", "acme", "cs-1", &mappers)
                .await?
        );
        let request = mock.last();
        assert_eq!(
            request.path,
            "/admin/realms/acme/client-scopes/cs-1/protocol-mappers/add-models"
        );
        assert_eq!(request.json()[1]["name"], "groups");
        Ok(())
    }

    #[tokio::test]
    async fn mappers_by_protocol_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(
            Method::GET,
            "/admin/realms/acme/client-scopes/cs-1/protocol-mappers/protocol/openid-connect",
            200,
            json!([{"id": "pm-1", "name": "email", "protocol": "openid-connect"}]),
        );
        let client = mock.client()?;

        let mappers = client
            .protocol_mappers_by_protocol("master", "acme", "cs-1", Protocol::OpenIdConnect)
            .await?;
        assert_eq!(mappers[0].id.as_deref(), Some("pm-1"));
        Ok(())
    }
}
