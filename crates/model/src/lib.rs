//! # kcadmin-model
//!
//! Representations sent to and received from the Keycloak admin REST API.
//!
//! Most of them are the generated types of the `keycloak` crate and are
//! re-exported from [`types`]. The fine-grained authorization entities and a
//! few response shapes the generated types do not cover live in this crate.
pub use keycloak::types;

pub mod attack_detection;
pub mod authorization;
pub mod identity_provider;
pub mod protocol;
pub mod realm;
pub mod user;
pub mod user_storage;

pub use attack_detection::UserNameStatus;
pub use authorization::{
    AuthorizationPermission, AuthorizationPermissionType, AuthorizationResource,
    AuthorizationScope, DecisionStrategy, GrantedPermission, Logic, Policy, PolicyType,
    ResourceOwner, RolePolicy, RolePolicyRole,
};
pub use identity_provider::IdentityProviderToken;
pub use protocol::{Protocol, UnknownProtocol};
pub use realm::{ImportPolicy, PartialImport};
pub use user::SetPasswordResponse;
pub use user_storage::{LdapMapperSyncDirection, SynchronizationResult, UserSyncAction};
