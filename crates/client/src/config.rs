use std::sync::Arc;

use crate::session::Credentials;

#[derive(Default)]
pub struct ConfigBuilder<'a> {
    prefix: Option<&'a str>,
    address: Option<&'a str>,
    username: Option<&'a str>,
    password: Option<&'a str>,
    client_id: Option<&'a str>,
    client_secret: Option<&'a str>,
}

impl<'a> ConfigBuilder<'a> {
    pub fn with_prefix(mut self, prefix: &'a str) -> Self {
        self.prefix = Some(prefix);
        self
    }

    pub fn with_address(mut self, address: &'a str) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_username(mut self, username: &'a str) -> Self {
        self.username = Some(username);
        self
    }

    pub fn with_password(mut self, password: &'a str) -> Self {
        self.password = Some(password);
        self
    }

    pub fn with_client_id(mut self, client_id: &'a str) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn with_client_secret(mut self, client_secret: &'a str) -> Self {
        self.client_secret = Some(client_secret);
        self
    }

    pub fn build(self) -> envy::Result<Config> {
        let mut cfg: Config = if let Some(prefix) = self.prefix {
            envy::prefixed(prefix)
        } else {
            envy::prefixed("KEYCLOAK_")
        }
        .from_env()?;
        if let Some(address) = self.address {
            cfg.address = Some(Arc::from(address));
        }
        if let Some(username) = self.username {
            cfg.username = Some(Arc::from(username));
        }
        if let Some(password) = self.password {
            cfg.password = Some(Arc::from(password));
        }
        if let Some(client_id) = self.client_id {
            cfg.client_id = Some(Arc::from(client_id));
        }
        if let Some(client_secret) = self.client_secret {
            cfg.client_secret = Some(Arc::from(client_secret));
        }
        if cfg.address.is_none() {
            let host = cfg.host.as_deref().unwrap_or("127.0.0.1");
            let port = cfg.port.unwrap_or(8080);
            cfg.address = Some(Arc::from(format!("http://{}:{}/", host, port)));
        }
        if cfg.username.is_none() {
            cfg.username = Some("admin".into());
        }
        if cfg.password.is_none() {
            cfg.password = Some("admin".into());
        }
        if cfg.client_id.is_none() {
            cfg.client_id = Some("admin-cli".into());
        }
        Ok(cfg)
    }
}

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Config {
    address: Option<Arc<str>>,
    host: Option<Arc<str>>,
    port: Option<u16>,
    username: Option<Arc<str>>,
    password: Option<Arc<str>>,
    client_id: Option<Arc<str>>,
    client_secret: Option<Arc<str>>,
    token_refresh_margin: Option<i64>,
    timeout: Option<u64>,
}

impl Config {
    pub fn new() -> envy::Result<Self> {
        ConfigBuilder::default().build()
    }

    pub fn builder<'a>() -> ConfigBuilder<'a> {
        ConfigBuilder::default()
    }

    pub fn address(&self) -> &str {
        self.address.as_deref().unwrap_or("http://127.0.0.1:8080/")
    }

    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or("admin")
    }

    pub fn password(&self) -> &str {
        self.password.as_deref().unwrap_or("admin")
    }

    pub fn client_id(&self) -> &str {
        self.client_id.as_deref().unwrap_or("admin-cli")
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    /// Seconds before expiry at which a cached token is renewed.
    pub fn token_refresh_margin(&self) -> i64 {
        self.token_refresh_margin.unwrap_or(30)
    }

    /// Request timeout in seconds, none by default.
    pub fn timeout(&self) -> Option<u64> {
        self.timeout
    }

    /// Client credentials grant when a client secret is configured, password
    /// grant otherwise.
    pub fn credentials(&self) -> Credentials {
        match self.client_secret.as_ref() {
            Some(client_secret) => Credentials::ClientSecret {
                client_id: Arc::from(self.client_id()),
                client_secret: client_secret.clone(),
            },
            None => Credentials::Password {
                username: Arc::from(self.username()),
                password: Arc::from(self.password()),
                client_id: Arc::from(self.client_id()),
                client_secret: None,
            },
        }
    }
}
