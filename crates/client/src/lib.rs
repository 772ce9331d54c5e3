//! # kcadmin-client
//!
//! Typed client for the Keycloak admin REST API.
//!
//! Every operation takes the *authentication realm* first. It selects the
//! credentials the call is made with, the target realm follows and becomes
//! part of the path. Access tokens are acquired lazily per authentication
//! realm and refreshed before they expire.
//!
//! Configuration is read from `KEYCLOAK_*` environment variables:
//!
//! ```ignore
//! let client = KeycloakClient::new()?;
//! let users = client
//!     .users("master", "acme", &UsersQuery { username: Some("ada".into()), ..Default::default() })
//!     .await?;
//! ```
mod api;
pub mod auth;
mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod session;
#[cfg(test)]
mod test_util;

pub use api::LdapConnectionTest;
pub use auth::{Authentication, RealmAuthenticator, StaticToken};
pub use client::{KeycloakBuilder, KeycloakClient, KeycloakConfig};
pub use error::{Error, HttpErrorBody, Result};
pub use kcadmin_model as model;
pub use query::{
    AdminEventsQuery, AuthorizationScopesQuery, EventsQuery, PermissionsQuery, PoliciesQuery,
    ResourcesQuery, UsersQuery,
};
pub use session::{Credentials, RealmSession, SessionClient, SessionStore, SessionToken};
