use std::{collections::HashMap, fmt};

use kcadmin_model::{
    types::{
        AdminEventRepresentation, ClientRepresentation, ClientScopeRepresentation,
        EventRepresentation, GlobalRequestResult, GroupRepresentation,
        ManagementPermissionReference, RealmEventsConfigRepresentation, RealmRepresentation,
    },
    PartialImport,
};
use reqwest::{header, multipart::Form, Method};
use serde_json::Value;

use crate::{
    client::KeycloakClient,
    error::Result,
    query::{AdminEventsQuery, EventsQuery, Params},
};

/// Settings checked by `testLDAPConnection`. Fields left as `None` are not
/// sent.
#[derive(Clone, Default)]
pub struct LdapConnectionTest {
    pub action: Option<String>,
    pub bind_credential: Option<String>,
    pub bind_dn: Option<String>,
    pub component_id: Option<String>,
    pub connection_timeout: Option<String>,
    pub connection_url: Option<String>,
    pub use_truststore_spi: Option<String>,
}

impl LdapConnectionTest {
    fn into_form(self) -> Form {
        [
            ("action", self.action),
            ("bindCredential", self.bind_credential),
            ("bindDn", self.bind_dn),
            ("componentId", self.component_id),
            ("connectionTimeout", self.connection_timeout),
            ("connectionUrl", self.connection_url),
            ("useTruststoreSpi", self.use_truststore_spi),
        ]
        .into_iter()
        .fold(Form::new(), |form, (name, value)| match value {
            Some(value) => form.text(name, value),
            None => form,
        })
    }
}

impl fmt::Debug for LdapConnectionTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LdapConnectionTest")
            .field("action", &self.action)
            .field("bind_credential", &self.bind_credential.as_ref().map(|_| "***"))
            .field("bind_dn", &self.bind_dn)
            .field("component_id", &self.component_id)
            .field("connection_timeout", &self.connection_timeout)
            .field("connection_url", &self.connection_url)
            .field("use_truststore_spi", &self.use_truststore_spi)
            .finish()
    }
}

impl KeycloakClient {
    /// Creates a realm from a full representation.
    pub async fn import_realm(
        &self,
        authentication_realm: &str,
        realm: &RealmRepresentation,
    ) -> Result<bool> {
        self.post_json(authentication_realm, "/admin/realms", realm)
            .await
    }

    pub async fn realms(&self, authentication_realm: &str) -> Result<Vec<RealmRepresentation>> {
        self.get(authentication_realm, "/admin/realms").await
    }

    pub async fn realm(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<RealmRepresentation> {
        self.get(authentication_realm, &format!("/admin/realms/{realm}"))
            .await
    }

    pub async fn update_realm(
        &self,
        authentication_realm: &str,
        realm: &str,
        representation: &RealmRepresentation,
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!("/admin/realms/{realm}"),
            representation,
        )
        .await
    }

    pub async fn delete_realm(&self, authentication_realm: &str, realm: &str) -> Result<bool> {
        self.delete(authentication_realm, &format!("/admin/realms/{realm}"))
            .await
    }

    pub async fn admin_events(
        &self,
        authentication_realm: &str,
        realm: &str,
        query: &AdminEventsQuery,
    ) -> Result<Vec<AdminEventRepresentation>> {
        self.get_query(
            authentication_realm,
            &format!("/admin/realms/{realm}/admin-events"),
            query,
        )
        .await
    }

    pub async fn delete_admin_events(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("/admin/realms/{realm}/admin-events"),
        )
        .await
    }

    pub async fn clear_keys_cache(&self, authentication_realm: &str, realm: &str) -> Result<bool> {
        self.post_empty(
            authentication_realm,
            &format!("/admin/realms/{realm}/clear-keys-cache"),
        )
        .await
    }

    pub async fn clear_realm_cache(&self, authentication_realm: &str, realm: &str) -> Result<bool> {
        self.post_empty(
            authentication_realm,
            &format!("/admin/realms/{realm}/clear-realm-cache"),
        )
        .await
    }

    pub async fn clear_user_cache(&self, authentication_realm: &str, realm: &str) -> Result<bool> {
        self.post_empty(
            authentication_realm,
            &format!("/admin/realms/{realm}/clear-user-cache"),
        )
        .await
    }

    /// Converts a client description (OIDC registration JSON or SAML entity
    /// descriptor) into a client representation.
    pub async fn convert_client_description(
        &self,
        authentication_realm: &str,
        realm: &str,
        description: &str,
    ) -> Result<ClientRepresentation> {
        let request = self
            .request(
                Method::POST,
                authentication_realm,
                &format!("/admin/realms/{realm}/client-description-converter"),
            )
            .await?
            .header(header::CONTENT_TYPE, "text/plain")
            .body(description.to_string());
        self.json(request).await
    }

    pub async fn client_session_stats(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<Vec<HashMap<String, Value>>> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/client-session-stats"),
        )
        .await
    }

    pub async fn realm_default_client_scopes(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<Vec<ClientScopeRepresentation>> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/default-default-client-scopes"),
        )
        .await
    }

    pub async fn update_realm_default_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
    ) -> Result<bool> {
        self.put_empty(
            authentication_realm,
            &format!("/admin/realms/{realm}/default-default-client-scopes/{client_scope_id}"),
        )
        .await
    }

    pub async fn delete_realm_default_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("/admin/realms/{realm}/default-default-client-scopes/{client_scope_id}"),
        )
        .await
    }

    /// Groups new users of the realm join automatically.
    pub async fn realm_default_groups(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<Vec<GroupRepresentation>> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/default-groups"),
        )
        .await
    }

    pub async fn add_realm_default_group(
        &self,
        authentication_realm: &str,
        realm: &str,
        group_id: &str,
    ) -> Result<bool> {
        self.put_empty(
            authentication_realm,
            &format!("/admin/realms/{realm}/default-groups/{group_id}"),
        )
        .await
    }

    pub async fn delete_realm_default_group(
        &self,
        authentication_realm: &str,
        realm: &str,
        group_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("/admin/realms/{realm}/default-groups/{group_id}"),
        )
        .await
    }

    pub async fn realm_optional_client_scopes(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<Vec<ClientScopeRepresentation>> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/default-optional-client-scopes"),
        )
        .await
    }

    pub async fn update_realm_optional_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
    ) -> Result<bool> {
        self.put_empty(
            authentication_realm,
            &format!("/admin/realms/{realm}/default-optional-client-scopes/{client_scope_id}"),
        )
        .await
    }

    pub async fn delete_realm_optional_client_scope(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_scope_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("/admin/realms/{realm}/default-optional-client-scopes/{client_scope_id}"),
        )
        .await
    }

    pub async fn events(
        &self,
        authentication_realm: &str,
        realm: &str,
        query: &EventsQuery,
    ) -> Result<Vec<EventRepresentation>> {
        self.get_query(
            authentication_realm,
            &format!("/admin/realms/{realm}/events"),
            query,
        )
        .await
    }

    pub async fn delete_events(&self, authentication_realm: &str, realm: &str) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("/admin/realms/{realm}/events"),
        )
        .await
    }

    pub async fn realm_events_provider_configuration(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<RealmEventsConfigRepresentation> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/events/config"),
        )
        .await
    }

    pub async fn update_realm_events_provider_configuration(
        &self,
        authentication_realm: &str,
        realm: &str,
        config: &RealmEventsConfigRepresentation,
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/events/config"),
            config,
        )
        .await
    }

    /// Group addressed by its path, e.g. `staff/ops`.
    pub async fn realm_group_by_path(
        &self,
        authentication_realm: &str,
        realm: &str,
        path: &str,
    ) -> Result<GroupRepresentation> {
        let path = path.strip_prefix('/').unwrap_or(path);
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/group-by-path/{path}"),
        )
        .await
    }

    /// Logs out every user session of the realm.
    pub async fn remove_all_user_sessions(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<GlobalRequestResult> {
        self.post_empty_for(
            authentication_realm,
            &format!("/admin/realms/{realm}/logout-all"),
        )
        .await
    }

    pub async fn realm_partial_export(
        &self,
        authentication_realm: &str,
        realm: &str,
        export_clients: Option<bool>,
        export_groups_and_roles: Option<bool>,
    ) -> Result<RealmRepresentation> {
        let params = Params::new()
            .opt("exportClients", export_clients)
            .opt("exportGroupsAndRoles", export_groups_and_roles);
        let request = self
            .request(
                Method::POST,
                authentication_realm,
                &format!("/admin/realms/{realm}/partial-export"),
            )
            .await?
            .query(&params)
            .body("");
        self.json(request).await
    }

    pub async fn realm_partial_import(
        &self,
        authentication_realm: &str,
        realm: &str,
        partial_import: &PartialImport,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/partialImport"),
            partial_import,
        )
        .await
    }

    pub async fn push_realm_revocation_policy(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<GlobalRequestResult> {
        self.post_empty_for(
            authentication_realm,
            &format!("/admin/realms/{realm}/push-revocation"),
        )
        .await
    }

    pub async fn delete_user_session(
        &self,
        authentication_realm: &str,
        realm: &str,
        session: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("/admin/realms/{realm}/sessions/{session}"),
        )
        .await
    }

    pub async fn test_ldap_connection(
        &self,
        authentication_realm: &str,
        realm: &str,
        settings: LdapConnectionTest,
    ) -> Result<bool> {
        let request = self
            .request(
                Method::POST,
                authentication_realm,
                &format!("/admin/realms/{realm}/testLDAPConnection"),
            )
            .await?
            .multipart(settings.into_form());
        self.success(request).await
    }

    pub async fn test_smtp_connection(
        &self,
        authentication_realm: &str,
        realm: &str,
        config: &str,
    ) -> Result<bool> {
        self.post_empty(
            authentication_realm,
            &format!("/admin/realms/{realm}/testSMTPConnection/{config}"),
        )
        .await
    }

    pub async fn realm_users_management_permissions(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<ManagementPermissionReference> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/users-management-permissions"),
        )
        .await
    }

    pub async fn update_realm_users_management_permissions(
        &self,
        authentication_realm: &str,
        realm: &str,
        management_permission: &ManagementPermissionReference,
    ) -> Result<ManagementPermissionReference> {
        self.put_json_for(
            authentication_realm,
            &format!("/admin/realms/{realm}/users-management-permissions"),
            management_permission,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use kcadmin_model::{
        types::{GroupRepresentation, RealmRepresentation},
        ImportPolicy, PartialImport,
    };
    use serde_json::json;

    use super::LdapConnectionTest;
    use crate::{query::AdminEventsQuery, test_util::MockKeycloak};

    #[tokio::test]
    async fn realm_lifecycle_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(
            Method::GET,
            "/admin/realms",
            200,
            json!([{"id": "master", "realm": "master"}, {"id": "acme", "realm": "acme"}]),
        );
        let client = mock.client()?;

        let realm = RealmRepresentation {
            realm: Some("acme".into()),
            enabled: Some(true),
            ..Default::default()
        };
        assert!(client.import_realm("master", &realm).await?);
        let request = mock.last();
        assert_eq!(request.path, "/admin/realms");
        assert_eq!(request.json()["realm"], "acme");

        let realms = client.realms("master").await?;
        assert_eq!(realms.len(), 2);
        assert_eq!(realms[1].realm.as_deref(), Some("acme"));

        assert!(client.delete_realm("master", "acme").await?);
        assert_eq!(mock.last().path, "/admin/realms/acme");
        Ok(())
    }

    #[tokio::test]
    async fn admin_events_query_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(
            Method::GET,
            "/admin/realms/acme/admin-events",
            200,
            json!([{"operationType": "CREATE", "resourceType": "USER"}]),
        );
        let client = mock.client()?;

        let events = client
            .admin_events(
                "master",
                "acme",
                &AdminEventsQuery {
                    operation_types: Some(vec!["CREATE".into(), "UPDATE".into()]),
                    max: Some(50),
                    ..Default::default()
                },
            )
            .await?;
        assert_eq!(events.len(), 1);
        assert_eq!(
            mock.last().query(),
            Some("max=50&operationTypes=CREATE%2CUPDATE")
        );
        Ok(())
    }

    #[tokio::test]
    async fn client_description_is_sent_as_text_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(
            Method::POST,
            "/admin/realms/acme/client-description-converter",
            200,
            json!({"clientId": "https://sp.example/metadata", "protocol": "saml"}),
        );
        let client = mock.client()?;

        let converted = client
            .convert_client_description("master", "acme", "<EntityDescriptor/>")
            .await?;
        assert_eq!(
            converted.client_id.as_deref(),
            Some("https://sp.example/metadata")
        );
        let request = mock.last();
        assert_eq!(request.header("content-type"), Some("text/plain"));
        assert_eq!(request.text(), "<EntityDescriptor/>");
        Ok(())
    }

    #[tokio::test]
    async fn partial_export_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(
            Method::POST,
            "/admin/realms/acme/partial-export",
            200,
            json!({"realm": "acme"}),
        );
        let client = mock.client()?;

        let exported = client
            .realm_partial_export("master", "acme", Some(true), None)
            .await?;
        assert_eq!(exported.realm.as_deref(), Some("acme"));
        assert_eq!(mock.last().query(), Some("exportClients=true"));
        Ok(())
    }

    #[tokio::test]
    async fn logout_all_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(
            Method::POST,
            "/admin/realms/acme/logout-all",
            200,
            json!({"successRequests": ["node-1"]}),
        );
        let client = mock.client()?;

        client.remove_all_user_sessions("master", "acme").await?;
        assert_eq!(mock.last().path, "/admin/realms/acme/logout-all");
        Ok(())
    }

    #[tokio::test]
    async fn ldap_connection_omits_unset_fields_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        let client = mock.client()?;
        let settings = LdapConnectionTest {
            action: Some("testConnection".into()),
            connection_url: Some("ldap://ldap.acme:389".into()),
            bind_credential: Some("hunter2".into()),
            ..Default::default()
        };
        assert!(!format!("{settings:?}").contains("hunter2"));

        assert!(
            client
                .test_ldap_connection("master", "acme", settings)
                .await?
        );
        let body = mock.last().text();
        assert!(body.contains("name=\"action\""));
        assert!(body.contains("testConnection"));
        assert!(body.contains("name=\"connectionUrl\""));
        assert!(body.contains("name=\"bindCredential\""));
        assert!(!body.contains("name=\"bindDn\""));
        assert!(!body.contains("name=\"componentId\""));
        Ok(())
    }

    #[tokio::test]
    async fn group_by_path_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(
            Method::GET,
            "/admin/realms/acme/group-by-path/staff/ops",
            200,
            json!({"id": "g-2", "name": "ops", "path": "/staff/ops"}),
        );
        let client = mock.client()?;

        let group = client
            .realm_group_by_path("master", "acme", "/staff/ops")
            .await?;
        assert_eq!(group.id.as_deref(), Some("g-2"));

        // Only the first slash belongs to the path syntax.
        mock.on(
            Method::GET,
            "/admin/realms/acme/group-by-path//staff",
            200,
            json!({"id": "g-3", "name": "staff"}),
        );
        let group = client
            .realm_group_by_path("master", "acme", "//staff")
            .await?;
        assert_eq!(group.id.as_deref(), Some("g-3"));
        assert_eq!(mock.last().path, "/admin/realms/acme/group-by-path//staff");
        Ok(())
    }

    #[tokio::test]
    async fn partial_import_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(
            Method::POST,
            "/admin/realms/acme/partialImport",
            200,
            json!({"overwritten": 0, "added": 1, "skipped": 0}),
        );
        let client = mock.client()?;
        let import = PartialImport {
            if_resource_exists: Some(ImportPolicy::Skip),
            groups: Some(vec![GroupRepresentation {
                name: Some("ops".into()),
                ..Default::default()
            }]),
            ..Default::default()
        };

        assert!(
            client
                .realm_partial_import("master", "acme", &import)
                .await?
        );
        let body = mock.last().json();
        assert_eq!(body["ifResourceExists"], "SKIP");
        assert_eq!(body["groups"][0]["name"], "ops");
        Ok(())
    }
}
