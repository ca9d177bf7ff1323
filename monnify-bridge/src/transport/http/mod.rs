//! HTTP transport implementation backed by reqwest.

use reqwest::Client;
use tracing::{debug, instrument};

use super::config::HttpConfig;
use crate::{
    error::{GatewayError, Result},
    transport::{HttpRequest, Method, Transport, TransportResponse},
};

/// Rejects header names or values carrying CR, LF, or NUL.
fn validate_header(name: &str, value: &str) -> Result<()> {
    if name.contains(['\r', '\n', '\0']) {
        return Err(GatewayError::InvalidInput(
            "invalid header name: control characters not allowed".to_owned(),
        ));
    }
    if value.contains(['\r', '\n', '\0']) {
        return Err(GatewayError::InvalidInput(
            "invalid header value: control characters not allowed".to_owned(),
        ));
    }
    Ok(())
}

/// Default [`Transport`] using a pooled reqwest client.
///
/// The per-request timeout from [`HttpConfig`] applies to every call; when it
/// fires the call fails with [`GatewayError::Transport`] and
/// [`GatewayError::is_timeout`] returns true.
///
/// # Examples
///
/// ```
/// use monnify_bridge::transport::{HttpConfig, HttpTransport};
///
/// let config = HttpConfig { timeout_secs: 15, ..Default::default() };
/// let transport = HttpTransport::with_config(&config).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with [`HttpConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        Self::with_config(&HttpConfig::default())
    }

    /// Creates a transport with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is out of bounds or the HTTP client
    /// cannot be created.
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(GatewayError::Transport)?;

        Ok(Self { client })
    }

    /// Wraps an existing reqwest client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    #[instrument(
        skip(self, request),
        fields(method = %request.method, url = request.url_without_query())
    )]
    async fn execute(&self, request: HttpRequest) -> Result<TransportResponse> {
        for (name, value) in &request.headers {
            validate_header(name, value)?;
        }

        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_owned()))
            .collect();

        let body = response.bytes().await?.to_vec();
        debug!(status, body_len = body.len(), "gateway responded");

        Ok(TransportResponse { status, body, headers })
    }
}
