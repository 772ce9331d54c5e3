use std::{borrow::Cow, path::PathBuf};

use keycloak::KeycloakError;

/// Error body Keycloak returns with a failing status.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
pub struct HttpErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default, rename = "errorMessage")]
    pub error_message: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("keycloak responded with {status}: {text}")]
    HttpFailure {
        status: u16,
        body: Option<HttpErrorBody>,
        text: String,
    },
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
    #[error("unable to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no count in response: {0}")]
    Count(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpFailure { status, .. } => Some(*status),
            Error::Reqwest(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Most specific message available: Keycloak's error body, the raw body
    /// text, or the status code.
    pub fn message(&self) -> Cow<'_, str> {
        match self {
            Error::HttpFailure { status, body, text } => body
                .as_ref()
                .and_then(|e| {
                    e.error_message
                        .as_deref()
                        .or(e.error_description.as_deref())
                        .or(e.error.as_deref())
                        .map(Cow::Borrowed)
                })
                .unwrap_or_else(|| {
                    if !text.is_empty() {
                        Cow::Borrowed(text.as_str())
                    } else {
                        Cow::Owned(status.to_string())
                    }
                }),
            other => Cow::Owned(other.to_string()),
        }
    }
}

impl From<Error> for KeycloakError {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(err) => KeycloakError::ReqwestFailure(err),
            Error::HttpFailure { status, text, .. } => KeycloakError::HttpFailure {
                status,
                body: serde_json::from_str(&text).ok(),
                text,
            },
            other => KeycloakError::HttpFailure {
                status: 500,
                body: None,
                text: other.to_string(),
            },
        }
    }
}

pub(crate) async fn error_check(response: reqwest::Response) -> Result<reqwest::Response> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        return Err(Error::HttpFailure {
            status,
            body: serde_json::from_str(&text).ok(),
            text,
        });
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_prefers_error_body_test() {
        let err = Error::HttpFailure {
            status: 409,
            body: serde_json::from_str(r#"{"errorMessage":"User exists with same username"}"#)
                .ok(),
            text: r#"{"errorMessage":"User exists with same username"}"#.into(),
        };
        assert_eq!(err.message(), "User exists with same username");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn message_falls_back_to_text_and_status_test() {
        let err = Error::HttpFailure {
            status: 502,
            body: None,
            text: "Bad Gateway".into(),
        };
        assert_eq!(err.message(), "Bad Gateway");
        let err = Error::HttpFailure {
            status: 404,
            body: None,
            text: String::new(),
        };
        assert_eq!(err.message(), "404");
    }

    #[test]
    fn convert_to_keycloak_error_test() {
        let err: KeycloakError = Error::HttpFailure {
            status: 401,
            body: None,
            text: "unauthorized".into(),
        }
        .into();
        assert!(matches!(err, KeycloakError::HttpFailure { status: 401, .. }));
    }
}
