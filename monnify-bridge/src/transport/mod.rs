//! Transport abstraction layer.
//!
//! The gateway client never talks to the network directly. It hands a fully
//! built [`HttpRequest`] to a [`Transport`] and gets a [`TransportResponse`]
//! back. Authentication headers are already attached by the time a request
//! reaches the transport.
//!
//! A transport returns a response for every HTTP status, success or not;
//! deciding what a status means is the job of [`crate::response`]. Only
//! network-level failures are errors here.
//!
//! # Examples
//!
//! ```rust,no_run
//! use monnify_bridge::transport::{HttpRequest, HttpTransport, Method, Transport};
//!
//! # async fn example() -> monnify_bridge::Result<()> {
//! let transport = HttpTransport::new()?;
//! let request = HttpRequest::new(Method::Get, "https://sandbox.monnify.com/api/v1/banks");
//!
//! let response = transport.execute(request).await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;
use std::fmt;

use crate::error::Result;

pub mod config;
pub mod http;

pub use config::HttpConfig;
pub use http::HttpTransport;

/// HTTP method used by gateway endpoints.
///
/// Read operations use `GET` with a query string, write operations `POST`
/// with a form-encoded body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Read operation.
    Get,
    /// Write operation.
    Post,
}

impl Method {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing request handed to a [`Transport`].
#[derive(Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including any query string.
    pub url: String,
    /// Header name/value pairs.
    pub headers: Vec<(String, String)>,
    /// Request body, if any.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a request without headers or body.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), headers: Vec::new(), body: None }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the first header value with the given name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the URL up to, not including, its query string.
    ///
    /// Search filters travel in the query and may name customers, so this is
    /// the form that goes into logs.
    #[must_use]
    pub fn url_without_query(&self) -> &str {
        self.url.split_once('?').map_or(self.url.as_str(), |(base, _)| base)
    }
}

// Headers carry credentials and queries carry customer data; keep both out of
// debug output.
impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url_without_query())
            .field("headers", &header_names)
            .field("body_len", &self.body.as_ref().map(Vec::len))
            .finish()
    }
}

/// Response returned by a [`Transport`].
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
    /// Response headers as received, values lossily decoded.
    ///
    /// Callers driving a [`Transport`] directly can read gateway headers such
    /// as `Content-Type` here; the normalizer uses it when a body cannot be
    /// decoded.
    pub headers: Vec<(String, String)>,
}

impl TransportResponse {
    /// Returns the first header value with the given name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Executes HTTP requests on behalf of the gateway client.
///
/// Implement this trait to plug in a different HTTP stack or a test double.
/// Implementations must:
/// - return `Ok` for every HTTP status the server answered with
/// - return [`GatewayError::Transport`](crate::GatewayError::Transport) for
///   network failures, including their own per-request timeout
/// - not retry on their own
pub trait Transport: Send + Sync {
    /// Sends a request and waits for the full response body.
    ///
    /// # Errors
    ///
    /// Returns error if the request could not be sent or the response body
    /// could not be read.
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<TransportResponse>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_as_str() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
    }

    #[test]
    fn test_request_builder_helpers() {
        let request = HttpRequest::new(Method::Post, "https://example.com/api/v1/x")
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_body(b"a=1".to_vec());

        assert_eq!(request.header("content-type"), Some("application/x-www-form-urlencoded"));
        assert_eq!(request.body.as_deref(), Some(&b"a=1"[..]));
        assert!(request.header("Authorization").is_none());
    }

    #[test]
    fn test_request_debug_hides_header_values() {
        let request = HttpRequest::new(Method::Get, "https://example.com")
            .with_header("Authorization", "Basic c2VjcmV0");

        let debug_str = format!("{request:?}");
        assert!(debug_str.contains("Authorization"));
        assert!(!debug_str.contains("c2VjcmV0"));
    }

    #[test]
    fn test_url_without_query_hides_search_filters() {
        let request = HttpRequest::new(
            Method::Get,
            "https://example.com/api/v1/transactions/search?customerEmail=jane%40example.com",
        );

        assert_eq!(request.url_without_query(), "https://example.com/api/v1/transactions/search");
        assert!(!format!("{request:?}").contains("customerEmail"));

        let plain = HttpRequest::new(Method::Get, "https://sandbox.monnify.com/api/v1/x");
        assert_eq!(plain.url_without_query(), "https://sandbox.monnify.com/api/v1/x");
    }

    #[test]
    fn test_response_header_lookup() {
        let response = TransportResponse {
            status: 200,
            body: vec![],
            headers: vec![("content-type".to_owned(), "application/json".to_owned())],
        };

        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert!(response.header("Retry-After").is_none());
    }

    #[test]
    fn test_response_is_success() {
        let ok = TransportResponse { status: 200, body: vec![], headers: vec![] };
        let created = TransportResponse { status: 201, body: vec![], headers: vec![] };
        let not_found = TransportResponse { status: 404, body: vec![], headers: vec![] };
        let redirect = TransportResponse { status: 302, body: vec![], headers: vec![] };

        assert!(ok.is_success());
        assert!(created.is_success());
        assert!(!not_found.is_success());
        assert!(!redirect.is_success());
    }
}
