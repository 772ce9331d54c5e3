use std::sync::Arc;

use crate::error::Result;

/// Base URL and bearer credential used for an admin call.
#[derive(Debug, Clone)]
pub struct Authentication {
    pub base_url: Arc<str>,
    pub bearer: Arc<str>,
}

/// Resolves where and as whom to call Keycloak for an authentication realm.
///
/// The authentication realm is the realm whose credentials authorize the
/// call. It is independent of the realm administered by the call.
#[async_trait::async_trait]
pub trait RealmAuthenticator: Send + Sync {
    async fn authenticate(&self, authentication_realm: &str) -> Result<Authentication>;
}

/// Same base URL and externally managed bearer token for every realm.
#[derive(Debug, Clone)]
pub struct StaticToken {
    authentication: Authentication,
}

impl StaticToken {
    pub fn new(base_url: impl Into<String>, bearer: impl Into<String>) -> Self {
        Self {
            authentication: Authentication {
                base_url: Arc::from(base_url.into()),
                bearer: Arc::from(bearer.into()),
            },
        }
    }
}

#[async_trait::async_trait]
impl RealmAuthenticator for StaticToken {
    async fn authenticate(&self, _authentication_realm: &str) -> Result<Authentication> {
        Ok(self.authentication.clone())
    }
}
