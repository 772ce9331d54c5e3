//! Admin REST endpoints, grouped the way Keycloak groups its resources.
//! Every module adds methods to [`KeycloakClient`](crate::KeycloakClient).

mod attack_detection;
mod authentication_management;
mod authorization_resource;
mod authorization_scope;
mod client_attribute_certificate;
mod client_authorization;
mod client_initial_access;
mod client_role_mappings;
mod client_scopes;
mod clients;
mod components;
mod groups;
mod identity_providers;
mod protocol_mappers;
mod realms_admin;
mod role_mapper;
mod roles;
mod roles_by_id;
mod scope_mappings;
mod user_storage_provider;
mod users;

pub use realms_admin::LdapConnectionTest;
