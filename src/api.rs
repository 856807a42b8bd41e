//! Admin API client
//!
//! A thin wrapper around a `reqwest::Client` carrying the auth headers of the
//! session. Responses are captured as [`Reply`] values so callers can log the
//! body and keep it as a [`Failure`] record after the connection is gone.

use crate::error::{LoadError, Result};
use reqwest::{
    Body, Client, Method, StatusCode,
    header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use std::fmt;
use tokio_util::io::ReaderStream;
use tracing::{error, info};

pub const JSON: &str = "application/json";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Request body
#[derive(Debug)]
pub enum Payload {
    Empty,
    Json(serde_json::Value),
    Bytes(Vec<u8>, &'static str),
    /// Streamed from an already opened file
    File(tokio::fs::File, &'static str),
}

/// Status and body of a finished request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
}

impl Reply {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// A call that did not succeed, kept for the end of run report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub action: String,
    pub method: Method,
    pub url: String,
    /// `None` when the request never got a response
    pub status: Option<StatusCode>,
    pub body: String,
}

impl Failure {
    #[must_use]
    pub fn from_reply(action: &str, method: Method, url: &str, reply: Reply) -> Self {
        Self {
            action: action.to_string(),
            method,
            url: url.to_string(),
            status: Some(reply.status),
            body: reply.body,
        }
    }

    #[must_use]
    pub fn transport(action: &str, method: Method, url: &str, err: &dyn fmt::Display) -> Self {
        Self {
            action: action.to_string(),
            method,
            url: url.to_string(),
            status: None,
            body: err.to_string(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "[{}] {} {} -> {}: {}",
                self.action, self.method, self.url, status, self.body
            ),
            None => write!(
                f,
                "[{}] {} {} -> transport error: {}",
                self.action, self.method, self.url, self.body
            ),
        }
    }
}

/// Log the outcome of a call: info on success, error plus the body otherwise
pub fn log_reply(msg: &str, reply: &Reply) {
    if reply.is_success() {
        info!("{msg}");
    } else {
        error!("{msg}");
        if !reply.body.is_empty() {
            error!("{}", reply.body);
        }
    }
}

/// Authorized session against the admin API
#[derive(Debug, Clone)]
pub struct AdminClient {
    client: Client,
    base_url: String,
    dry_run: bool,
}

impl AdminClient {
    /// Build a client for `base_url` (e.g. `http://localhost:8081/admin`)
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the HTTP
    /// client can't be built
    pub fn new(base_url: &str, token: Option<&str>, dry_run: bool) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| LoadError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            dry_run,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base of all dataset endpoints
    #[must_use]
    pub fn datasets_url(&self) -> String {
        format!("{}/datasets", self.base_url)
    }

    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Send one request and capture its status and body.
    ///
    /// In dry-run mode nothing is sent and every call reports `200 OK`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures (connection refused, timeouts,
    /// unreadable response body)
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        payload: Payload,
    ) -> Result<Reply, reqwest::Error> {
        if self.dry_run {
            info!("Dry run, not sending {method} {url}");
            return Ok(Reply {
                status: StatusCode::OK,
                body: String::new(),
            });
        }

        let builder = self.client.request(method, url);
        let builder = match payload {
            Payload::Empty => builder,
            Payload::Json(value) => builder.json(&value),
            Payload::Bytes(bytes, content_type) => {
                builder.header(CONTENT_TYPE, content_type).body(bytes)
            }
            Payload::File(file, content_type) => builder
                .header(CONTENT_TYPE, content_type)
                .body(Body::wrap_stream(ReaderStream::new(file))),
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(Reply { status, body })
    }
}
