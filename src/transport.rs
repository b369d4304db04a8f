//! HTTP transport seam.
//!
//! [`JobClient`](crate::JobClient) only speaks in [`HttpRequest`] and
//! [`HttpResponse`]; the bytes move through an [`HttpTransport`]. The default
//! [`ReqwestTransport`] is what production code wants. Tests and hosts with
//! their own networking stack can plug in anything else.

use reqwest::{Client, Method};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::BoxError;

/// A fully described outbound request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            timeout,
        }
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn json_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self.header("Content-Type", "application/json")
    }

    /// Look up a header value, case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status code and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends one request and returns the response, whatever its status.
///
/// Only connection-level failures (DNS, TLS, timeouts, reset) are errors;
/// non-2xx responses come back as `Ok`. Implementations must be safe to share
/// between concurrently running orchestrators.
pub trait HttpTransport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = std::result::Result<HttpResponse, BoxError>> + Send;
}

impl<T: HttpTransport> HttpTransport for Arc<T> {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = std::result::Result<HttpResponse, BoxError>> + Send {
        (**self).send(request)
    }
}

/// [`HttpTransport`] backed by a `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom `reqwest::Client` (for connection pooling, proxies, TLS).
    pub fn with_client(client: Client) -> Self {
        Self { http: client }
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, BoxError> {
        let mut builder = self
            .http
            .request(request.method, &request.url)
            .timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?;
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
