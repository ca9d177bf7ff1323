//! Request authentication strategies.
//!
//! The gateway protects its endpoints with one of two schemes. Each scheme is
//! an [`Authenticator`] that decorates an outgoing [`HttpRequest`] with an
//! `Authorization` header:
//!
//! - [`BasicAuth`]: the API key and secret key as a basic-auth pair. Stateless,
//!   never touches the network.
//! - [`BearerAuth`]: a short-lived access token obtained from the token
//!   exchange endpoint with basic auth, cached until it expires.
//!
//! # Token Cache
//!
//! [`BearerAuth`] owns at most one [`AccessToken`], guarded by a
//! [`tokio::sync::Mutex`]. The lock is held across the exchange, so callers
//! that arrive while a refresh is in flight wait for it and reuse its token
//! instead of starting their own. A refresh happens when no token is cached or
//! the cached one is past its expiry. There is no background refresh.
//!
//! A refused or malformed exchange is returned to the call that triggered it
//! and nothing is cached.

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;
use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use url::Url;
use zeroize::Zeroizing;

use crate::{
    credentials::Credentials,
    error::{GatewayError, Result},
    response,
    transport::{HttpRequest, Method, Transport},
};

const AUTHORIZATION: &str = "Authorization";

/// Authentication scheme an endpoint requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// Static basic-auth header built from the API and secret keys.
    Basic,
    /// Cached bearer token from the token exchange endpoint.
    Bearer,
}

/// Decorates outgoing requests with authentication.
pub trait Authenticator: Send + Sync {
    /// Returns `request` with its `Authorization` header set.
    ///
    /// `transport` is only used by strategies that need to talk to the gateway
    /// first.
    ///
    /// # Errors
    ///
    /// Returns error if credentials had to be exchanged and the exchange
    /// failed.
    fn decorate<T: Transport>(
        &self,
        transport: &T,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpRequest>> + Send;
}

/// Basic-auth strategy.
#[derive(Clone)]
pub struct BasicAuth {
    header: Zeroizing<String>,
}

impl BasicAuth {
    /// Creates the strategy from merchant credentials.
    #[must_use]
    pub fn new(credentials: &Credentials) -> Self {
        Self { header: credentials.basic_authorization() }
    }

    fn apply(&self, request: HttpRequest) -> HttpRequest {
        request.with_header(AUTHORIZATION, self.header.as_str())
    }
}

impl Authenticator for BasicAuth {
    async fn decorate<T: Transport>(
        &self,
        _transport: &T,
        request: HttpRequest,
    ) -> Result<HttpRequest> {
        Ok(self.apply(request))
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth").field("header", &"[REDACTED]").finish()
    }
}

/// Bearer token issued by the gateway.
#[derive(Clone)]
pub struct AccessToken {
    value: Zeroizing<String>,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Creates a token valid for `expires_in_secs` seconds from `issued_at`.
    #[must_use]
    pub fn new(value: impl Into<String>, expires_in_secs: u64, issued_at: DateTime<Utc>) -> Self {
        let lifetime = i64::try_from(expires_in_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        let expires_at =
            issued_at.checked_add_signed(lifetime).unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self { value: Zeroizing::new(value.into()), expires_at }
    }

    /// Returns the token value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns when the token stops being valid.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true once `now` has reached the expiry instant.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token exchange payload inside the response envelope.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenGrant {
    access_token: String,
    expires_in: u64,
}

/// Bearer-token strategy with a single cached token.
pub struct BearerAuth {
    basic: BasicAuth,
    token_url: Url,
    cache: Mutex<Option<AccessToken>>,
}

impl BearerAuth {
    /// Creates the strategy.
    ///
    /// `token_url` is the absolute URL of the token exchange endpoint.
    #[must_use]
    pub fn new(credentials: &Credentials, token_url: Url) -> Self {
        Self { basic: BasicAuth::new(credentials), token_url, cache: Mutex::new(None) }
    }

    /// Returns the cached token, if any, without refreshing it.
    pub async fn cached_token(&self) -> Option<AccessToken> {
        self.cache.lock().await.clone()
    }

    /// Drops the cached token so the next call performs a fresh exchange.
    pub async fn invalidate(&self) {
        *self.cache.lock().await = None;
    }

    /// Returns a valid bearer token, exchanging credentials when needed.
    ///
    /// # Errors
    ///
    /// Returns error if the exchange fails at the transport, is refused by
    /// the gateway, or answers without a usable token.
    pub async fn token<T: Transport>(&self, transport: &T) -> Result<AccessToken> {
        let mut cache = self.cache.lock().await;

        if let Some(ref token) = *cache
            && !token.is_expired_at(Utc::now())
        {
            return Ok(token.clone());
        }

        let token = self.exchange(transport).await?;
        *cache = Some(token.clone());
        Ok(token)
    }

    #[instrument(skip_all, fields(path = %self.token_url.path()))]
    async fn exchange<T: Transport>(&self, transport: &T) -> Result<AccessToken> {
        let request = self.basic.apply(HttpRequest::new(Method::Post, self.token_url.as_str()));
        let issued_at = Utc::now();

        let response = transport.execute(request).await?;
        let payload = response::normalize(&response, self.token_url.path())?;

        let grant: TokenGrant = serde_json::from_value(payload).map_err(|e| {
            GatewayError::MalformedResponse(format!("token exchange payload: {e}"))
        })?;
        if grant.access_token.is_empty() {
            return Err(GatewayError::MalformedResponse(
                "token exchange returned an empty access token".to_owned(),
            ));
        }

        debug!(expires_in = grant.expires_in, "access token issued");
        Ok(AccessToken::new(grant.access_token, grant.expires_in, issued_at))
    }
}

impl Authenticator for BearerAuth {
    async fn decorate<T: Transport>(
        &self,
        transport: &T,
        request: HttpRequest,
    ) -> Result<HttpRequest> {
        let token = self.token(transport).await?;
        Ok(request.with_header(AUTHORIZATION, format!("Bearer {}", token.value())))
    }
}

impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuth")
            .field("token_url", &self.token_url.as_str())
            .finish_non_exhaustive()
    }
}
