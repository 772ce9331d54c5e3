//! Admin tokens acquired from the token endpoint of an authentication realm.
use std::{collections::HashMap, fmt, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use keycloak::{KeycloakError, KeycloakTokenSupplier};
use tokio::sync::RwLock;

use crate::{
    auth::{Authentication, RealmAuthenticator},
    error::{error_check, Error, Result},
};

#[derive(Clone)]
pub enum Credentials {
    /// Resource owner password grant, `admin-cli` style. A confidential
    /// client also sends its secret.
    Password {
        username: Arc<str>,
        password: Arc<str>,
        client_id: Arc<str>,
        client_secret: Option<Arc<str>>,
    },
    /// Client credentials grant of a confidential client with a service account.
    ClientSecret {
        client_id: Arc<str>,
        client_secret: Arc<str>,
    },
}

impl Credentials {
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Password {
            username: Arc::from(username.into()),
            password: Arc::from(password.into()),
            client_id: Arc::from("admin-cli"),
            client_secret: None,
        }
    }

    /// Password grant through the confidential client `client_id`.
    pub fn confidential_password(
        username: impl Into<String>,
        password: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Credentials::Password {
            username: Arc::from(username.into()),
            password: Arc::from(password.into()),
            client_id: Arc::from(client_id.into()),
            client_secret: Some(Arc::from(client_secret.into())),
        }
    }

    pub fn client_secret(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Credentials::ClientSecret {
            client_id: Arc::from(client_id.into()),
            client_secret: Arc::from(client_secret.into()),
        }
    }

    fn subject(&self) -> &str {
        match self {
            Credentials::Password { username, .. } => username.as_ref(),
            Credentials::ClientSecret { client_id, .. } => client_id.as_ref(),
        }
    }

    fn grant(&self) -> Vec<(&'static str, &str)> {
        match self {
            Credentials::Password {
                username,
                password,
                client_id,
                client_secret,
            } => {
                let mut form = vec![
                    ("grant_type", "password"),
                    ("username", username.as_ref()),
                    ("password", password.as_ref()),
                    ("client_id", client_id.as_ref()),
                ];
                if let Some(client_secret) = client_secret {
                    form.push(("client_secret", client_secret.as_ref()));
                }
                form
            }
            Credentials::ClientSecret {
                client_id,
                client_secret,
            } => vec![
                ("grant_type", "client_credentials"),
                ("client_id", client_id.as_ref()),
                ("client_secret", client_secret.as_ref()),
            ],
        }
    }

    fn refresh_grant<'a>(&'a self, refresh_token: &'a str) -> Vec<(&'static str, &'a str)> {
        let mut form = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];
        match self {
            Credentials::Password {
                client_id,
                client_secret,
                ..
            } => {
                form.push(("client_id", client_id.as_ref()));
                if let Some(client_secret) = client_secret {
                    form.push(("client_secret", client_secret.as_ref()));
                }
            }
            Credentials::ClientSecret {
                client_id,
                client_secret,
            } => {
                form.push(("client_id", client_id.as_ref()));
                form.push(("client_secret", client_secret.as_ref()));
            }
        }
        form
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Password {
                username,
                client_id,
                ..
            } => f
                .debug_struct("Password")
                .field("username", username)
                .field("client_id", client_id)
                .finish_non_exhaustive(),
            Credentials::ClientSecret { client_id, .. } => f
                .debug_struct("ClientSecret")
                .field("client_id", client_id)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
pub struct AccessTokenClaims {
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub jti: Option<String>,
    #[serde(default)]
    pub iss: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub typ: Option<String>,
    #[serde(default)]
    pub azp: Option<String>,
    #[serde(default)]
    pub sid: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub preferred_username: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct SessionToken {
    access_token: Arc<str>,
    expires_in: i64,
    #[serde(default, rename = "not-before-policy")]
    not_before_policy: Option<i64>,
    #[serde(default)]
    refresh_expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<Arc<str>>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    session_state: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(skip)]
    claims: Option<AccessTokenClaims>,
    #[serde(skip)]
    expires_at: DateTime<Utc>,
    #[serde(skip)]
    refresh_expires_at: Option<DateTime<Utc>>,
}

impl SessionToken {
    fn issued(mut self, now: DateTime<Utc>) -> Self {
        self.expires_at = now + Duration::seconds(self.expires_in);
        // A refresh lifetime of 0 marks an offline token without expiry.
        self.refresh_expires_at = self
            .refresh_expires_in
            .filter(|seconds| *seconds > 0)
            .map(|seconds| now + Duration::seconds(seconds));
        self.claims = parse_claims(&self.access_token);
        self
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn claims(&self) -> Option<&AccessTokenClaims> {
        self.claims.as_ref()
    }

    fn is_valid(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now + margin < self.expires_at
    }

    fn can_refresh(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        self.refresh_token.is_some()
            && self
                .refresh_expires_at
                .map_or(true, |expires_at| now + margin < expires_at)
    }
}

fn parse_claims(access_token: &str) -> Option<AccessTokenClaims> {
    use base64::engine::{general_purpose::URL_SAFE_NO_PAD, Engine};
    let payload = access_token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| {
            tracing::error!("{e:#?}");
            e
        })
        .ok()?;
    serde_json::from_slice(&bytes)
        .map_err(|e| {
            tracing::error!("{e:#?}");
            e
        })
        .ok()
}

struct SessionClientInner {
    url: Arc<str>,
    client: reqwest::Client,
}

/// Calls the OpenID Connect token endpoint of any realm on one server.
#[derive(Clone)]
pub struct SessionClient {
    inner: Arc<SessionClientInner>,
}

impl SessionClient {
    pub fn new(url: impl Into<String>, client: reqwest::Client) -> Self {
        let url: String = url.into();
        Self {
            inner: Arc::new(SessionClientInner {
                url: Arc::from(url.trim_end_matches('/')),
                client,
            }),
        }
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }

    pub async fn acquire(&self, realm: &str, credentials: &Credentials) -> Result<SessionToken> {
        tracing::debug!(
            "acquire token for {} in realm {realm}",
            credentials.subject()
        );
        self.token(realm, &credentials.grant()).await
    }

    pub async fn refresh(
        &self,
        realm: &str,
        credentials: &Credentials,
        refresh_token: &str,
    ) -> Result<SessionToken> {
        tracing::debug!(
            "refresh token for {} in realm {realm}",
            credentials.subject()
        );
        self.token(realm, &credentials.refresh_grant(refresh_token))
            .await
    }

    async fn token(&self, realm: &str, form: &[(&'static str, &str)]) -> Result<SessionToken> {
        let url = self.inner.url.as_ref();
        let response = self
            .inner
            .client
            .post(format!("{url}/realms/{realm}/protocol/openid-connect/token"))
            .form(form)
            .send()
            .await?;
        let token: SessionToken = error_check(response).await?.json().await?;
        Ok(token.issued(Utc::now()))
    }
}

async fn try_refresh(
    client: &SessionClient,
    realm: &str,
    credentials: &Credentials,
    refresh_token: &str,
) -> Result<SessionToken> {
    match client.refresh(realm, credentials, refresh_token).await {
        Err(Error::HttpFailure { status: 400, text, .. }) => {
            tracing::warn!(
                "refresh token rejected, acquire new token for {}: {text}",
                credentials.subject()
            );
            client.acquire(realm, credentials).await
        }
        result => result,
    }
}

/// Cached token of one authentication realm, renewed on demand.
pub struct RealmSession {
    realm: Arc<str>,
    credentials: Credentials,
    client: SessionClient,
    refresh_margin: Duration,
    token: RwLock<Option<SessionToken>>,
}

impl RealmSession {
    pub fn new(
        client: SessionClient,
        realm: &str,
        credentials: Credentials,
        refresh_margin: Duration,
    ) -> Self {
        Self {
            realm: Arc::from(realm),
            credentials,
            client,
            refresh_margin,
            token: RwLock::new(None),
        }
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Access token valid for at least the refresh margin.
    pub async fn access_token(&self) -> Result<Arc<str>> {
        if let Some(token) = self.token.read().await.as_ref() {
            if token.is_valid(Utc::now(), self.refresh_margin) {
                return Ok(token.access_token.clone());
            }
        }
        let mut token = self.token.write().await;
        let now = Utc::now();
        if let Some(token) = token.as_ref() {
            if token.is_valid(now, self.refresh_margin) {
                return Ok(token.access_token.clone());
            }
        }
        let refresh_token = token
            .as_ref()
            .filter(|token| token.can_refresh(now, self.refresh_margin))
            .and_then(|token| token.refresh_token.clone());
        let next = match refresh_token {
            Some(refresh_token) => {
                try_refresh(&self.client, &self.realm, &self.credentials, &refresh_token).await
            }
            None => self.client.acquire(&self.realm, &self.credentials).await,
        }
        .map_err(|e| {
            tracing::error!("{e:#?}");
            e
        })?;
        let access_token = next.access_token.clone();
        *token = Some(next);
        Ok(access_token)
    }

    pub async fn claims(&self) -> Option<AccessTokenClaims> {
        self.token
            .read()
            .await
            .as_ref()
            .and_then(|token| token.claims.clone())
    }

    /// Drops the cached token, the next call acquires a new one.
    pub async fn invalidate(&self) {
        self.token.write().await.take();
    }
}

#[async_trait::async_trait]
impl KeycloakTokenSupplier for RealmSession {
    async fn get(&self, _url: &str) -> Result<String, KeycloakError> {
        self.access_token()
            .await
            .map(|token| token.to_string())
            .map_err(KeycloakError::from)
    }
}

/// One [`RealmSession`] per authentication realm, all sharing credentials.
pub struct SessionStore {
    client: SessionClient,
    credentials: Credentials,
    refresh_margin: Duration,
    sessions: RwLock<HashMap<String, Arc<RealmSession>>>,
}

impl SessionStore {
    pub fn new(url: impl Into<String>, credentials: Credentials, client: reqwest::Client) -> Self {
        Self {
            client: SessionClient::new(url, client),
            credentials,
            refresh_margin: Duration::seconds(30),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_refresh_margin(mut self, seconds: i64) -> Self {
        self.refresh_margin = Duration::seconds(seconds);
        self
    }

    pub async fn session(&self, authentication_realm: &str) -> Arc<RealmSession> {
        if let Some(session) = self.sessions.read().await.get(authentication_realm) {
            return session.clone();
        }
        self.sessions
            .write()
            .await
            .entry(authentication_realm.to_string())
            .or_insert_with(|| {
                Arc::new(RealmSession::new(
                    self.client.clone(),
                    authentication_realm,
                    self.credentials.clone(),
                    self.refresh_margin,
                ))
            })
            .clone()
    }
}

#[async_trait::async_trait]
impl RealmAuthenticator for SessionStore {
    async fn authenticate(&self, authentication_realm: &str) -> Result<Authentication> {
        let bearer = self
            .session(authentication_realm)
            .await
            .access_token()
            .await?;
        Ok(Authentication {
            base_url: self.client.inner.url.clone(),
            bearer,
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use serde_json::json;

    use super::*;
    use crate::test_util::MockKeycloak;

    const MASTER_TOKEN: &str = "/realms/master/protocol/openid-connect/token";

    fn token(access_token: &str, expires_in: i64) -> serde_json::Value {
        json!({
            "access_token": access_token,
            "expires_in": expires_in,
            "refresh_expires_in": 1800,
            "refresh_token": format!("refresh-{access_token}"),
            "token_type": "Bearer",
            "not-before-policy": 0,
            "scope": "profile email"
        })
    }

    fn store(mock: &MockKeycloak) -> SessionStore {
        SessionStore::new(
            mock.base_url(),
            Credentials::password("admin", "admin"),
            reqwest::Client::new(),
        )
    }

    #[tokio::test]
    async fn cache_token_per_realm_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(Method::POST, MASTER_TOKEN, 200, token("master-1", 300));
        mock.on(
            Method::POST,
            "/realms/tenant/protocol/openid-connect/token",
            200,
            token("tenant-1", 300),
        );
        let store = store(&mock);

        let first = store.authenticate("master").await?;
        let second = store.authenticate("master").await?;
        let tenant = store.authenticate("tenant").await?;
        assert_eq!(first.bearer.as_ref(), "master-1");
        assert_eq!(second.bearer.as_ref(), "master-1");
        assert_eq!(tenant.bearer.as_ref(), "tenant-1");
        assert_eq!(first.base_url.as_ref(), mock.base_url());

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        let grant = requests[0].text();
        assert!(grant.contains("grant_type=password"));
        assert!(grant.contains("username=admin"));
        assert!(grant.contains("client_id=admin-cli"));
        assert!(!grant.contains("client_secret"));
        Ok(())
    }

    #[tokio::test]
    async fn refresh_expiring_token_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(Method::POST, MASTER_TOKEN, 200, token("short", 5));
        let store = store(&mock);

        store.authenticate("master").await?;
        store.authenticate("master").await?;

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        let refresh = requests[1].text();
        assert!(refresh.contains("grant_type=refresh_token"));
        assert!(refresh.contains("refresh_token=refresh-short"));
        Ok(())
    }

    #[tokio::test]
    async fn acquire_again_when_refresh_is_rejected_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(Method::POST, MASTER_TOKEN, 200, token("short", 5));
        let store = store(&mock);
        store.authenticate("master").await?;

        mock.on(
            Method::POST,
            MASTER_TOKEN,
            400,
            json!({"error": "invalid_grant", "error_description": "Token is not active"}),
        );
        let err = store.authenticate("master").await.unwrap_err();

        let requests = mock.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[1].text().contains("grant_type=refresh_token"));
        assert!(requests[2].text().contains("grant_type=password"));
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.message(), "Token is not active");
        Ok(())
    }

    #[tokio::test]
    async fn client_credentials_grant_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(Method::POST, MASTER_TOKEN, 200, json!({
            "access_token": "svc",
            "expires_in": 300,
            "token_type": "Bearer"
        }));
        let store = SessionStore::new(
            mock.base_url(),
            Credentials::client_secret("ops", "s3cr3t"),
            reqwest::Client::new(),
        )
        .with_refresh_margin(10);

        let session = store.session("master").await;
        assert_eq!(session.get("").await?, "svc");
        let grant = mock.last().text();
        assert!(grant.contains("grant_type=client_credentials"));
        assert!(grant.contains("client_secret=s3cr3t"));

        session.invalidate().await;
        session.access_token().await?;
        assert_eq!(mock.requests().len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn confidential_password_grant_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(Method::POST, MASTER_TOKEN, 200, token("short", 5));
        let store = SessionStore::new(
            mock.base_url(),
            Credentials::confidential_password("admin", "admin", "ops-cli", "s3cr3t"),
            reqwest::Client::new(),
        );

        store.authenticate("master").await?;
        store.authenticate("master").await?;

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        let grant = requests[0].text();
        assert!(grant.contains("grant_type=password"));
        assert!(grant.contains("client_id=ops-cli"));
        assert!(grant.contains("client_secret=s3cr3t"));
        let refresh = requests[1].text();
        assert!(refresh.contains("grant_type=refresh_token"));
        assert!(refresh.contains("client_secret=s3cr3t"));

        let debug = format!(
            "{:?}",
            Credentials::confidential_password("admin", "hunter2", "ops-cli", "s3cr3t")
        );
        assert!(!debug.contains("s3cr3t"));
        Ok(())
    }

    #[test]
    fn parse_access_token_claims_test() {
        use base64::engine::{general_purpose::URL_SAFE_NO_PAD, Engine};
        let payload = URL_SAFE_NO_PAD.encode(
            json!({"exp": 1700000300, "iat": 1700000000, "azp": "admin-cli", "preferred_username": "admin"})
                .to_string(),
        );
        let claims = parse_claims(&format!("eyJhbGciOiJSUzI1NiJ9.{payload}.sig"));
        let claims = claims.expect("claims");
        assert_eq!(claims.azp.as_deref(), Some("admin-cli"));
        assert_eq!(claims.preferred_username.as_deref(), Some("admin"));
        assert_eq!(claims.exp, Some(1_700_000_300));
        assert!(parse_claims("opaque").is_none());
    }

    #[test]
    fn credentials_debug_hides_secrets_test() {
        let debug = format!("{:?}", Credentials::password("admin", "hunter2"));
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }
}
