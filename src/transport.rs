use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Method};
use serde_json::Value;

use crate::HttpMethod;

/// A fully built outbound request.
#[derive(Clone, Debug, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

/// Any HTTP response, successful or not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// How a request failed before an HTTP response arrived.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum NetworkErrorKind {
    /// The attempt exceeded its timeout.
    Timeout,
    /// The connection could not be established.
    Connect,
    /// The connection dropped while sending the request or reading the body.
    Aborted,
    /// Anything else: bad headers, redirect loops, builder failures.
    Other,
}

impl NetworkErrorKind {
    /// Errno-style code reported to callers.
    pub fn code(self) -> Option<&'static str> {
        match self {
            Self::Timeout => Some("ETIMEDOUT"),
            Self::Connect => Some("ECONNREFUSED"),
            Self::Aborted => Some("ECONNABORTED"),
            Self::Other => None,
        }
    }
}

/// Failure without an HTTP response.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: NetworkErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: NetworkErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Minimal HTTP seam the client drives.
///
/// Implementations send exactly one request per call and must not retry.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &TransportRequest)
        -> Result<TransportResponse, TransportError>;
}

/// [`HttpTransport`] backed by `reqwest`.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a preconfigured `reqwest` client (proxies, TLS roots, pooling).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: &TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .http
            .request(to_reqwest_method(request.method), &request.url)
            .timeout(request.timeout);

        for (name, value) in &request.headers {
            let name = header::HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
                TransportError::new(NetworkErrorKind::Other, format!("invalid header name: {err}"))
            })?;
            let value = header::HeaderValue::from_str(value).map_err(|err| {
                TransportError::new(
                    NetworkErrorKind::Other,
                    format!("invalid value for header {name}: {err}"),
                )
            })?;
            builder = builder.header(name, value);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(classify_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify_reqwest_error)?;
        Ok(TransportResponse { status, body })
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> TransportError {
    let kind = if err.is_timeout() {
        NetworkErrorKind::Timeout
    } else if err.is_connect() {
        NetworkErrorKind::Connect
    } else if err.is_request() || err.is_body() {
        NetworkErrorKind::Aborted
    } else {
        NetworkErrorKind::Other
    };
    TransportError::new(kind, err.to_string())
}
