use std::{path::Path, sync::Arc, time::Duration};

use reqwest::{
    header,
    multipart::{Form, Part},
    Method, RequestBuilder, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

pub use crate::config::Config as KeycloakConfig;
use crate::{
    auth::RealmAuthenticator,
    error::{error_check, Error, Result},
    session::SessionStore,
};

struct Inner {
    config: KeycloakConfig,
    client: reqwest::Client,
    authenticator: Arc<dyn RealmAuthenticator>,
}

#[derive(Default)]
pub struct KeycloakBuilder {
    env_prefix: Option<&'static str>,
    config: Option<KeycloakConfig>,
    authenticator: Option<Arc<dyn RealmAuthenticator>>,
    client: Option<reqwest::Client>,
}

impl KeycloakBuilder {
    pub fn with_env_prefix(mut self, prefix: &'static str) -> Self {
        self.env_prefix = Some(prefix);
        self
    }

    pub fn with_config(mut self, config: KeycloakConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replaces the default [`SessionStore`] built from the configuration.
    pub fn with_authenticator<A>(mut self, authenticator: A) -> Self
    where
        A: RealmAuthenticator + 'static,
    {
        self.authenticator = Some(Arc::new(authenticator));
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<KeycloakClient> {
        let config = match self.config {
            Some(config) => config,
            None => {
                let mut config_builder = KeycloakConfig::builder();
                if let Some(prefix) = self.env_prefix {
                    config_builder = config_builder.with_prefix(prefix);
                }
                config_builder.build()?
            }
        };
        let client = match self.client {
            Some(client) => client,
            None => {
                let mut client_builder = reqwest::Client::builder();
                if let Some(timeout) = config.timeout() {
                    client_builder = client_builder.timeout(Duration::from_secs(timeout));
                }
                client_builder.build()?
            }
        };
        let authenticator = match self.authenticator {
            Some(authenticator) => authenticator,
            None => Arc::new(
                SessionStore::new(config.address(), config.credentials(), client.clone())
                    .with_refresh_margin(config.token_refresh_margin()),
            ),
        };
        Ok(KeycloakClient {
            inner: Arc::new(Inner {
                config,
                client,
                authenticator,
            }),
        })
    }
}

/// Keycloak admin REST client.
///
/// Every operation takes the authentication realm first. It selects the
/// credentials used for the call and is resolved by the configured
/// [`RealmAuthenticator`]. The target realm follows and becomes part of the
/// request path.
#[derive(Clone)]
pub struct KeycloakClient {
    inner: Arc<Inner>,
}

impl KeycloakClient {
    pub fn builder() -> KeycloakBuilder {
        KeycloakBuilder::default()
    }

    pub fn new() -> anyhow::Result<Self> {
        KeycloakBuilder::default().build()
    }

    pub fn http_client(&self) -> &reqwest::Client {
        &self.inner.client
    }

    pub fn config(&self) -> &KeycloakConfig {
        &self.inner.config
    }

    pub(crate) async fn request(
        &self,
        method: Method,
        authentication_realm: &str,
        path: &str,
    ) -> Result<RequestBuilder> {
        let authentication = self
            .inner
            .authenticator
            .authenticate(authentication_realm)
            .await
            .map_err(|e| {
                tracing::error!("{e:#?}");
                e
            })?;
        tracing::debug!("{method} {path}");
        let url = format!(
            "{}{}",
            authentication.base_url.trim_end_matches('/'),
            path
        );
        Ok(self
            .inner
            .client
            .request(method, url)
            .bearer_auth(authentication.bearer.as_ref()))
    }

    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("{e:#?}");
            Error::from(e)
        })?;
        error_check(response).await.map_err(|e| {
            tracing::error!("{e:#?}");
            e
        })
    }

    pub(crate) async fn json<T>(&self, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let body = self.send(request).await?.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            tracing::error!("{e:#?}");
            Error::from(e)
        })
    }

    /// Succeeds with `true` for every 2xx status, any other status is an
    /// [`Error::HttpFailure`].
    pub(crate) async fn success(&self, request: RequestBuilder) -> Result<bool> {
        let response = self.send(request).await?;
        Ok(response.status().is_success())
    }

    pub(crate) async fn count(&self, request: RequestBuilder) -> Result<i64> {
        let value: Value = self.json(request).await?;
        first_property_count(&value).map_err(|e| {
            tracing::error!("{e:#?}");
            e
        })
    }

    /// Id of a created resource, the last segment of its `Location` header.
    pub(crate) async fn created_id(&self, request: RequestBuilder) -> Result<Option<String>> {
        let response = self.send(request).await?;
        Ok(response
            .headers()
            .get(header::LOCATION)
            .and_then(|location| location.to_str().ok())
            .and_then(|location| location.rsplit('/').next())
            .filter(|id| !id.is_empty())
            .map(str::to_string))
    }

    pub(crate) async fn bytes(&self, request: RequestBuilder) -> Result<Vec<u8>> {
        Ok(self.send(request).await?.bytes().await?.to_vec())
    }

    pub(crate) async fn text(&self, request: RequestBuilder) -> Result<String> {
        Ok(self.send(request).await?.text().await?)
    }

    pub(crate) async fn get<T>(&self, authentication_realm: &str, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::GET, authentication_realm, path)
            .await?;
        self.json(request).await
    }

    pub(crate) async fn get_query<T, Q>(
        &self,
        authentication_realm: &str,
        path: &str,
        query: &Q,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self
            .request(Method::GET, authentication_realm, path)
            .await?
            .query(query);
        self.json(request).await
    }

    pub(crate) async fn delete(&self, authentication_realm: &str, path: &str) -> Result<bool> {
        let request = self
            .request(Method::DELETE, authentication_realm, path)
            .await?;
        self.success(request).await
    }

    pub(crate) async fn delete_json<B>(
        &self,
        authentication_realm: &str,
        path: &str,
        body: &B,
    ) -> Result<bool>
    where
        B: Serialize + ?Sized,
    {
        let request = self
            .request(Method::DELETE, authentication_realm, path)
            .await?
            .json(body);
        self.success(request).await
    }

    pub(crate) async fn post_json<B>(
        &self,
        authentication_realm: &str,
        path: &str,
        body: &B,
    ) -> Result<bool>
    where
        B: Serialize + ?Sized,
    {
        let request = self
            .request(Method::POST, authentication_realm, path)
            .await?
            .json(body);
        self.success(request).await
    }

    pub(crate) async fn put_json<B>(
        &self,
        authentication_realm: &str,
        path: &str,
        body: &B,
    ) -> Result<bool>
    where
        B: Serialize + ?Sized,
    {
        let request = self
            .request(Method::PUT, authentication_realm, path)
            .await?
            .json(body);
        self.success(request).await
    }

    pub(crate) async fn post_json_for<T, B>(
        &self,
        authentication_realm: &str,
        path: &str,
        body: &B,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self
            .request(Method::POST, authentication_realm, path)
            .await?
            .json(body);
        self.json(request).await
    }

    pub(crate) async fn put_json_for<T, B>(
        &self,
        authentication_realm: &str,
        path: &str,
        body: &B,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self
            .request(Method::PUT, authentication_realm, path)
            .await?
            .json(body);
        self.json(request).await
    }

    pub(crate) async fn post_empty_for<T>(&self, authentication_realm: &str, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::POST, authentication_realm, path)
            .await?
            .body("");
        self.json(request).await
    }

    pub(crate) async fn post_empty(&self, authentication_realm: &str, path: &str) -> Result<bool> {
        let request = self
            .request(Method::POST, authentication_realm, path)
            .await?
            .body("");
        self.success(request).await
    }

    pub(crate) async fn post_multipart<T>(
        &self,
        authentication_realm: &str,
        path: &str,
        form: Form,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::POST, authentication_realm, path)
            .await?
            .multipart(form);
        self.json(request).await
    }

    pub(crate) async fn put_empty(&self, authentication_realm: &str, path: &str) -> Result<bool> {
        let request = self
            .request(Method::PUT, authentication_realm, path)
            .await?
            .body("");
        self.success(request).await
    }
}

/// Multipart form with the content of `path` as part `file`.
pub(crate) async fn file_form(path: &Path) -> Result<Form> {
    let content = tokio::fs::read(path).await.map_err(|source| {
        tracing::error!("unable to read {path:?}: {source}");
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Form::new().part("file", Part::bytes(content).file_name(file_name)))
}

/// Count carried by a JSON scalar or by the first property of an object.
pub(crate) fn first_property_count(value: &Value) -> Result<i64> {
    let scalar = match value {
        Value::Object(properties) => properties
            .values()
            .next()
            .ok_or_else(|| Error::Count(value.to_string()))?,
        other => other,
    };
    match scalar {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(rounded_count))
            .ok_or_else(|| Error::Count(number.to_string())),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::Count(s.clone())),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Null => Ok(0),
        other => Err(Error::Count(other.to_string())),
    }
}

/// `i64::MAX as f64` rounds up to 2^63, hence the exclusive upper bound.
fn rounded_count(n: f64) -> Option<i64> {
    let n = n.round();
    (n >= i64::MIN as f64 && n < i64::MAX as f64).then_some(n as i64)
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use serde_json::json;

    use super::first_property_count;
    use crate::{error::Error, test_util::MockKeycloak};

    #[test]
    fn first_property_count_test() -> anyhow::Result<()> {
        assert_eq!(first_property_count(&json!(42))?, 42);
        assert_eq!(first_property_count(&json!({"count": 7}))?, 7);
        assert_eq!(first_property_count(&json!({"b": 2, "a": 1}))?, 2);
        assert_eq!(first_property_count(&json!({"count": "12"}))?, 12);
        assert_eq!(first_property_count(&json!(3.6))?, 4);
        assert_eq!(first_property_count(&json!(-2.5))?, -3);
        assert_eq!(first_property_count(&json!({"flag": true}))?, 1);
        assert_eq!(first_property_count(&json!(null))?, 0);
        assert!(matches!(
            first_property_count(&json!({})),
            Err(Error::Count(_))
        ));
        assert!(matches!(
            first_property_count(&json!([1, 2])),
            Err(Error::Count(_))
        ));
        Ok(())
    }

    #[test]
    fn out_of_range_count_test() {
        assert!(matches!(
            first_property_count(&json!({"count": 1e19})),
            Err(Error::Count(_))
        ));
        assert!(matches!(
            first_property_count(&json!(-1e300)),
            Err(Error::Count(_))
        ));
        assert!(matches!(
            first_property_count(&json!("99999999999999999999")),
            Err(Error::Count(_))
        ));
    }

    #[tokio::test]
    async fn bearer_and_base_url_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(Method::GET, "/admin/realms/acme/users/u-1", 200, json!({"id": "u-1"}));
        let client = mock.client_with_base(&format!("{}/", mock.base_url()))?;

        let user = client.user("master", "acme", "u-1").await?;
        assert_eq!(user.id.as_deref(), Some("u-1"));
        let request = mock.last();
        assert_eq!(request.path, "/admin/realms/acme/users/u-1");
        assert_eq!(request.header("authorization"), Some("Bearer test-token"));
        Ok(())
    }

    #[tokio::test]
    async fn http_failure_carries_status_and_body_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on(
            Method::DELETE,
            "/admin/realms/acme/groups/g-1",
            404,
            json!({"error": "Could not find group by id"}),
        );
        let client = mock.client()?;

        let err = client
            .delete_group("master", "acme", "g-1")
            .await
            .unwrap_err();
        match &err {
            Error::HttpFailure { status, text, .. } => {
                assert_eq!(*status, 404);
                assert!(text.contains("Could not find group by id"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(err.message(), "Could not find group by id");
        Ok(())
    }

    #[tokio::test]
    async fn decode_failure_test() -> anyhow::Result<()> {
        let mock = MockKeycloak::start().await?;
        mock.on_text(Method::GET, "/admin/realms/acme/users/u-1", 200, "not json");
        let client = mock.client()?;

        let err = client.user("master", "acme", "u-1").await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        Ok(())
    }
}
