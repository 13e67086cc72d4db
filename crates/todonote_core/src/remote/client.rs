//! Typed HTTP client for the remote to-do service.

use super::types::{CreateNoteBody, LoginBody, LoginResponse, RemoteNote};
use crate::model::session::Session;
use async_trait::async_trait;
use log::debug;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Production service address.
pub const DEFAULT_BASE_URL: &str = "https://todo.hillel.it";

/// Longest response body excerpt kept in a status error.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Transport-level failure of one remote call.
#[derive(Debug)]
pub enum RemoteError {
    /// Connection, TLS or request-building failure.
    Http(reqwest::Error),
    /// The service answered with a non-success status.
    Status { status: u16, body: String },
    /// A success response whose body did not match the expected shape.
    Decode(serde_json::Error),
    /// Login succeeded at HTTP level but carried no `access_token`.
    MissingToken,
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "request failed: {err}"),
            Self::Status { status, body } if body.is_empty() => write!(f, "HTTP {status}"),
            Self::Status { status, body } => write!(f, "HTTP {status}: {body}"),
            Self::Decode(err) => write!(f, "unexpected response body: {err}"),
            Self::MissingToken => write!(f, "login response carried no access_token"),
        }
    }
}

impl Error for RemoteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Status { .. } | Self::MissingToken => None,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

/// Remote to-do service operations.
#[async_trait]
pub trait TodoApi: Send + Sync {
    /// Exchanges a credential for a bearer token.
    async fn login(&self, credential: &str) -> Result<Session, RemoteError>;
    async fn list_notes(&self, session: &Session) -> Result<Vec<RemoteNote>, RemoteError>;
    async fn create_note(
        &self,
        session: &Session,
        body: &CreateNoteBody<'_>,
    ) -> Result<RemoteNote, RemoteError>;
    async fn delete_note(&self, session: &Session, id: u64) -> Result<(), RemoteError>;
    async fn toggle_note(&self, session: &Session, id: u64) -> Result<(), RemoteError>;
}

/// reqwest-backed `TodoApi`.
pub struct HttpTodoApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTodoApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        request
            .bearer_auth(session.token())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = request.send().await?;
        let status = response.status();
        debug!(
            "event=http_response module=remote status_code={} url_path={}",
            status.as_u16(),
            response.url().path()
        );
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::Status {
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, RemoteError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl Default for HttpTodoApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn login(&self, credential: &str) -> Result<Session, RemoteError> {
        let request = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginBody { value: credential });
        let response: LoginResponse = self.send_json(request).await?;

        match response.access_token {
            Some(token) if !token.trim().is_empty() => Ok(Session::new(token)),
            _ => Err(RemoteError::MissingToken),
        }
    }

    async fn list_notes(&self, session: &Session) -> Result<Vec<RemoteNote>, RemoteError> {
        let request = self.authorized(self.client.get(self.url("/todo")), session);
        self.send_json(request).await
    }

    async fn create_note(
        &self,
        session: &Session,
        body: &CreateNoteBody<'_>,
    ) -> Result<RemoteNote, RemoteError> {
        let request = self
            .authorized(self.client.post(self.url("/todo")), session)
            .json(body);
        self.send_json(request).await
    }

    async fn delete_note(&self, session: &Session, id: u64) -> Result<(), RemoteError> {
        let request = self.authorized(
            self.client.delete(self.url(&format!("/todo/{id}"))),
            session,
        );
        self.send(request).await.map(drop)
    }

    async fn toggle_note(&self, session: &Session, id: u64) -> Result<(), RemoteError> {
        let request = self.authorized(
            self.client.put(self.url(&format!("/todo/{id}/toggle"))),
            session,
        );
        self.send(request).await.map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpTodoApi, RemoteError};

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = HttpTodoApi::new("http://localhost:9000/");
        assert_eq!(api.base_url(), "http://localhost:9000");
        assert_eq!(api.url("/todo"), "http://localhost:9000/todo");
    }

    #[test]
    fn status_error_display_includes_body_when_present() {
        let err = RemoteError::Status {
            status: 401,
            body: "Unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 401: Unauthorized");
        let bare = RemoteError::Status {
            status: 500,
            body: String::new(),
        };
        assert_eq!(bare.to_string(), "HTTP 500");
    }
}
