//! Gateway client.
//!
//! [`GatewayClient`] owns the merchant credentials, the transport, and both
//! authentication strategies. Every operation goes through the same dispatch:
//! pick the strategy the endpoint requires, build the request, send it once,
//! normalize the response.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::{
    auth::{AuthScheme, Authenticator, BasicAuth, BearerAuth},
    config::GatewayConfig,
    credentials::Credentials,
    endpoint::Endpoint,
    error::{GatewayError, Result},
    request, response,
    transactions::Transactions,
    transport::{HttpTransport, Transport},
};

/// Client for the payment gateway.
///
/// Safe to share between tasks. The only mutable state is the cached bearer
/// token inside [`BearerAuth`], which is mutex-guarded.
///
/// # Examples
///
/// ```rust,no_run
/// use monnify_bridge::{Credentials, GatewayClient};
///
/// # async fn example() -> monnify_bridge::Result<()> {
/// let credentials = Credentials::new("MK_TEST_KEY", "SK_TEST_KEY", "7059707855", "NGN");
/// let client = GatewayClient::new("https://sandbox.monnify.com", credentials)?;
///
/// let status = client.transactions().status("MNFY|20|20210101|000001").await?;
/// println!("{status}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GatewayClient<T: Transport = HttpTransport> {
    transport: T,
    base_url: Url,
    credentials: Credentials,
    basic: BasicAuth,
    bearer: BearerAuth,
}

impl GatewayClient<HttpTransport> {
    /// Creates a client with the default HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns error if `base_url` is not a valid URL or the HTTP client
    /// cannot be created.
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self> {
        Self::with_transport(HttpTransport::new()?, base_url, credentials)
    }

    /// Creates a client from configuration, reading the keys from the
    /// environment variables it names.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the configuration is invalid or a
    /// key variable is unset.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        config.validate()?;
        let credentials = config.credentials()?;
        let transport = HttpTransport::with_config(&config.http)?;
        Self::with_transport(transport, config.base_url(), credentials)
    }
}

impl<T: Transport> GatewayClient<T> {
    /// Creates a client over a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] if `base_url` is not a valid
    /// absolute URL.
    pub fn with_transport(transport: T, base_url: &str, credentials: Credentials) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| GatewayError::InvalidInput(format!("invalid base URL {base_url}: {e}")))?;
        let token_url = Endpoint::TOKEN_EXCHANGE.url(&base_url)?;

        Ok(Self {
            transport,
            basic: BasicAuth::new(&credentials),
            bearer: BearerAuth::new(&credentials, token_url),
            base_url,
            credentials,
        })
    }

    /// Returns the transaction operations.
    #[must_use]
    pub const fn transactions(&self) -> Transactions<'_, T> {
        Transactions::new(self)
    }

    /// Returns the basic-auth strategy.
    #[must_use]
    pub const fn with_basic_auth(&self) -> &BasicAuth {
        &self.basic
    }

    /// Returns the bearer-token strategy and its token cache.
    #[must_use]
    pub const fn with_oauth2(&self) -> &BearerAuth {
        &self.bearer
    }

    /// Returns the merchant credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the base URL every endpoint is joined onto.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends one request to `endpoint` and normalizes the answer.
    #[instrument(
        skip_all,
        fields(method = %endpoint.method, path = endpoint.path, auth = ?endpoint.auth)
    )]
    pub(crate) async fn dispatch<P: Serialize + Sync>(
        &self,
        endpoint: &Endpoint,
        payload: Option<&P>,
    ) -> Result<Value> {
        let url = endpoint.url(&self.base_url)?;
        let path = url.path().to_owned();
        let request = request::build(endpoint.method, url, payload)?;

        let request = match endpoint.auth {
            AuthScheme::Basic => self.basic.decorate(&self.transport, request).await?,
            AuthScheme::Bearer => self.bearer.decorate(&self.transport, request).await?,
        };

        let response = self.transport.execute(request).await?;
        debug!(status = response.status, "gateway answered");
        response::normalize(&response, &path)
    }
}
