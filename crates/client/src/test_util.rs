//! In-process stand-in for a Keycloak server.
//!
//! Replies are registered per method and path. Unregistered routes answer
//! `204 No Content`. Every request is recorded for assertions.
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::Value;

use crate::{auth::StaticToken, client::KeycloakClient, config::Config};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    content_type: &'static str,
    body: Bytes,
    location: Option<String>,
}

#[derive(Clone, Default)]
struct MockState {
    replies: Arc<Mutex<HashMap<(Method, String), Reply>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockKeycloak {
    base_url: String,
    state: MockState,
}

impl MockKeycloak {
    pub async fn start() -> anyhow::Result<Self> {
        let state = MockState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move { axum::serve(listener, app).await });
        Ok(Self {
            base_url: format!("http://{addr}"),
            state,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn reply(&self, method: Method, path: &str, reply: Reply) {
        self.state
            .replies
            .lock()
            .unwrap()
            .insert((method, path.to_string()), reply);
    }

    pub fn on(&self, method: Method, path: &str, status: u16, body: Value) {
        self.reply(
            method,
            path,
            Reply {
                status: StatusCode::from_u16(status).unwrap(),
                content_type: "application/json",
                body: Bytes::from(body.to_string()),
                location: None,
            },
        );
    }

    pub fn on_text(&self, method: Method, path: &str, status: u16, body: &str) {
        self.reply(
            method,
            path,
            Reply {
                status: StatusCode::from_u16(status).unwrap(),
                content_type: "text/plain",
                body: Bytes::from(body.to_string()),
                location: None,
            },
        );
    }

    pub fn on_bytes(&self, method: Method, path: &str, body: &[u8]) {
        self.reply(
            method,
            path,
            Reply {
                status: StatusCode::OK,
                content_type: "application/octet-stream",
                body: Bytes::copy_from_slice(body),
                location: None,
            },
        );
    }

    pub fn on_created(&self, method: Method, path: &str, location: &str) {
        self.reply(
            method,
            path,
            Reply {
                status: StatusCode::CREATED,
                content_type: "application/json",
                body: Bytes::new(),
                location: Some(location.to_string()),
            },
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> RecordedRequest {
        self.requests().pop().expect("no request recorded")
    }

    /// Client authenticating every realm with the bearer `test-token`.
    pub fn client(&self) -> anyhow::Result<KeycloakClient> {
        self.client_with_base(&self.base_url)
    }

    pub fn client_with_base(&self, base_url: &str) -> anyhow::Result<KeycloakClient> {
        let config = Config::builder()
            .with_prefix("MOCK_KEYCLOAK_NOT_SET_IN_SHELL_")
            .with_address(base_url)
            .build()?;
        KeycloakClient::builder()
            .with_config(config)
            .with_authenticator(StaticToken::new(base_url, "test-token"))
            .build()
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    });
    let reply = state.replies.lock().unwrap().get(&(method, path)).cloned();
    match reply {
        Some(reply) => {
            let mut response = (
                reply.status,
                [(header::CONTENT_TYPE, reply.content_type)],
                reply.body,
            )
                .into_response();
            if let Some(location) = reply.location {
                response
                    .headers_mut()
                    .insert(header::LOCATION, HeaderValue::from_str(&location).unwrap());
            }
            response
        }
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
