use std::collections::HashMap;

use kcadmin_model::types::{
    AuthenticationExecutionInfoRepresentation, AuthenticationExecutionRepresentation,
    AuthenticationFlowRepresentation, AuthenticatorConfigInfoRepresentation,
    AuthenticatorConfigRepresentation, RequiredActionProviderRepresentation,
};
use serde_json::{json, Value};

use crate::{client::KeycloakClient, error::Result};

impl KeycloakClient {
    pub async fn authenticator_providers(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<Vec<HashMap<String, Value>>> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/authenticator-providers"),
        )
        .await
    }

    pub async fn client_authenticator_providers(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<Vec<HashMap<String, Value>>> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/client-authenticator-providers"),
        )
        .await
    }

    pub async fn authenticator_provider_configuration_description(
        &self,
        authentication_realm: &str,
        realm: &str,
        provider_id: &str,
    ) -> Result<AuthenticatorConfigInfoRepresentation> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/config-description/{provider_id}"),
        )
        .await
    }

    pub async fn authenticator_configuration(
        &self,
        authentication_realm: &str,
        realm: &str,
        configuration_id: &str,
    ) -> Result<AuthenticatorConfigRepresentation> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/config/{configuration_id}"),
        )
        .await
    }

    pub async fn update_authenticator_configuration(
        &self,
        authentication_realm: &str,
        realm: &str,
        configuration_id: &str,
        config: &AuthenticatorConfigRepresentation,
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/config/{configuration_id}"),
            config,
        )
        .await
    }

    pub async fn delete_authenticator_configuration(
        &self,
        authentication_realm: &str,
        realm: &str,
        configuration_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/config/{configuration_id}"),
        )
        .await
    }

    pub async fn add_authentication_execution(
        &self,
        authentication_realm: &str,
        realm: &str,
        execution: &AuthenticationExecutionRepresentation,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/executions"),
            execution,
        )
        .await
    }

    pub async fn authentication_execution(
        &self,
        authentication_realm: &str,
        realm: &str,
        execution_id: &str,
    ) -> Result<AuthenticationExecutionRepresentation> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/executions/{execution_id}"),
        )
        .await
    }

    pub async fn delete_authentication_execution(
        &self,
        authentication_realm: &str,
        realm: &str,
        execution_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/executions/{execution_id}"),
        )
        .await
    }

    pub async fn update_authentication_execution_configuration(
        &self,
        authentication_realm: &str,
        realm: &str,
        execution_id: &str,
        config: &AuthenticatorConfigRepresentation,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/executions/{execution_id}/config"),
            config,
        )
        .await
    }

    pub async fn lower_authentication_execution_priority(
        &self,
        authentication_realm: &str,
        realm: &str,
        execution_id: &str,
    ) -> Result<bool> {
        self.post_empty(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/authentication/executions/{execution_id}/lower-priority"
            ),
        )
        .await
    }

    pub async fn raise_authentication_execution_priority(
        &self,
        authentication_realm: &str,
        realm: &str,
        execution_id: &str,
    ) -> Result<bool> {
        self.post_empty(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/authentication/executions/{execution_id}/raise-priority"
            ),
        )
        .await
    }

    pub async fn create_authentication_flow(
        &self,
        authentication_realm: &str,
        realm: &str,
        flow: &AuthenticationFlowRepresentation,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/flows"),
            flow,
        )
        .await
    }

    pub async fn authentication_flows(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<Vec<AuthenticationFlowRepresentation>> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/flows"),
        )
        .await
    }

    /// Copies the flow `flow_alias` under the alias `new_name`.
    pub async fn duplicate_authentication_flow(
        &self,
        authentication_realm: &str,
        realm: &str,
        flow_alias: &str,
        new_name: &str,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/flows/{flow_alias}/copy"),
            &json!({ "newName": new_name }),
        )
        .await
    }

    pub async fn authentication_flow_executions(
        &self,
        authentication_realm: &str,
        realm: &str,
        flow_alias: &str,
    ) -> Result<Vec<AuthenticationExecutionInfoRepresentation>> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/flows/{flow_alias}/executions"),
        )
        .await
    }

    pub async fn update_authentication_flow_executions(
        &self,
        authentication_realm: &str,
        realm: &str,
        flow_alias: &str,
        execution_info: &AuthenticationExecutionInfoRepresentation,
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/flows/{flow_alias}/executions"),
            execution_info,
        )
        .await
    }

    /// `data_with_provider` carries the `provider` id of the new execution.
    pub async fn add_authentication_flow_execution(
        &self,
        authentication_realm: &str,
        realm: &str,
        flow_alias: &str,
        data_with_provider: &HashMap<String, Value>,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/authentication/flows/{flow_alias}/executions/execution"
            ),
            data_with_provider,
        )
        .await
    }

    /// Adds a sub flow described by `alias`, `type`, `provider` and
    /// `description`.
    pub async fn add_authentication_flow_and_execution_to_authentication_flow(
        &self,
        authentication_realm: &str,
        realm: &str,
        flow_alias: &str,
        data: &HashMap<String, Value>,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/flows/{flow_alias}/executions/flow"),
            data,
        )
        .await
    }

    pub async fn authentication_flow_by_id(
        &self,
        authentication_realm: &str,
        realm: &str,
        flow_id: &str,
    ) -> Result<AuthenticationFlowRepresentation> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/flows/{flow_id}"),
        )
        .await
    }

    pub async fn update_authentication_flow(
        &self,
        authentication_realm: &str,
        realm: &str,
        flow_id: &str,
        flow: &AuthenticationFlowRepresentation,
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/flows/{flow_id}"),
            flow,
        )
        .await
    }

    pub async fn delete_authentication_flow(
        &self,
        authentication_realm: &str,
        realm: &str,
        flow_id: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/flows/{flow_id}"),
        )
        .await
    }

    pub async fn form_action_providers(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<Vec<HashMap<String, Value>>> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/form-action-providers"),
        )
        .await
    }

    pub async fn form_providers(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<Vec<HashMap<String, Value>>> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/form-providers"),
        )
        .await
    }

    pub async fn configuration_descriptions_for_all_clients(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<HashMap<String, Value>> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/per-client-config-description"),
        )
        .await
    }

    /// `data` carries `providerId` and `name` of the required action.
    pub async fn register_required_action(
        &self,
        authentication_realm: &str,
        realm: &str,
        data: &HashMap<String, Value>,
    ) -> Result<bool> {
        self.post_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/register-required-action"),
            data,
        )
        .await
    }

    pub async fn required_actions(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<Vec<RequiredActionProviderRepresentation>> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/required-actions"),
        )
        .await
    }

    pub async fn required_action_by_alias(
        &self,
        authentication_realm: &str,
        realm: &str,
        alias: &str,
    ) -> Result<RequiredActionProviderRepresentation> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/required-actions/{alias}"),
        )
        .await
    }

    pub async fn update_required_action(
        &self,
        authentication_realm: &str,
        realm: &str,
        alias: &str,
        required_action: &RequiredActionProviderRepresentation,
    ) -> Result<bool> {
        self.put_json(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/required-actions/{alias}"),
            required_action,
        )
        .await
    }

    pub async fn delete_required_action(
        &self,
        authentication_realm: &str,
        realm: &str,
        alias: &str,
    ) -> Result<bool> {
        self.delete(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/required-actions/{alias}"),
        )
        .await
    }

    pub async fn lower_required_action_priority(
        &self,
        authentication_realm: &str,
        realm: &str,
        alias: &str,
    ) -> Result<bool> {
        self.post_empty(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/required-actions/{alias}/lower-priority"),
        )
        .await
    }

    pub async fn raise_required_action_priority(
        &self,
        authentication_realm: &str,
        realm: &str,
        alias: &str,
    ) -> Result<bool> {
        self.post_empty(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/required-actions/{alias}/raise-priority"),
        )
        .await
    }

    pub async fn unregistered_required_actions(
        &self,
        authentication_realm: &str,
        realm: &str,
    ) -> Result<Vec<HashMap<String, Value>>> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/authentication/unregistered-required-actions"),
        )
        .await
    }
}
