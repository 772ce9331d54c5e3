use kcadmin_model::types::{ComponentRepresentation, ComponentTypeRepresentation};

use crate::{client::KeycloakClient, error::Result, query::Params};

impl KeycloakClient {
    pub async fn create_component(
        &self,
        authentication_realm: &str,
        realm: &str,
        component: &ComponentRepresentation,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/components"),
            component,
        )
        .await
    }

    /// Components of the realm, filtered by name, parent id and provider type
    /// such as `org.keycloak.storage.UserStorageProvider`.
    pub async fn components(
        &self,
        authentication_realm: &str,
        realm: &str,
        name: Option<&str>,
        parent: Option<&str>,
        component_type: Option<&str>,
    ) -> Result<Vec<ComponentRepresentation>> {
        let params = Params::new()
            .opt("name", name)
            .opt("parent", parent)
            .opt("type", component_type);
        self.get_query(
            authentication_realm,
            &format!("/admin/realms/{realm}/components"),
            &params,
        )
        .await
    }

    pub async fn component(
        &self,
        authentication_realm: &str,
        realm: &str,
        component_id: &str,
    ) -> Result<ComponentRepresentation> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/components/{component_id}"),
        )
        .await
    }

    pub async fn update_component(
        &self,
        authentication_realm: &str,
        realm: &str,
        component_id: &str,
        component: &ComponentRepresentation,
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/components/{component_id}"),
            component,
        )
        .await
    }

    pub async fn delete_component(
        &self,
        authentication_realm: &str,
        realm: &str,
        component_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("/admin/realms/{realm}/components/{component_id}"),
        )
        .await
    }

    pub async fn component_sub_types(
        &self,
        authentication_realm: &str,
        realm: &str,
        component_id: &str,
        component_type: Option<&str>,
    ) -> Result<Vec<ComponentTypeRepresentation>> {
        self.get_query(
            authentication_realm,
            &format!("/admin/realms/{realm}/components/{component_id}/sub-component-types"),
            &Params::new().opt("type", component_type),
        )
        .await
    }
}
