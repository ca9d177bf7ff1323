//! Error types for the Monnify bridge.
//!
//! Every fallible operation in this crate returns [`Result`], whose error side is
//! [`GatewayError`]. The variants follow how a call can fail:
//!
//! - **Transport failures** ([`GatewayError::Transport`]): DNS, connect, TLS, or
//!   timeout errors raised before any HTTP response arrived
//! - **Gateway rejections** ([`GatewayError::Rejected`]): a response arrived but
//!   its status (or its envelope) reports failure; also used when the bearer
//!   token exchange itself is refused
//! - **Malformed responses** ([`GatewayError::MalformedResponse`]): a success
//!   status whose body is not the expected JSON envelope
//! - **Local errors** ([`GatewayError::InvalidInput`], [`GatewayError::Config`]):
//!   the request or the configuration could not be built
//!
//! None of these are retried by the crate. Whether a call is worth repeating is
//! the caller's decision.
//!
//! # Examples
//!
//! ```
//! use monnify_bridge::error::{Failure, GatewayError};
//!
//! let err = GatewayError::Rejected(Failure::new("Invalid reference", "99"));
//! assert_eq!(err.failure().map(|f| f.code.as_str()), Some("99"));
//! assert_eq!(err.to_string(), "Gateway rejected request: Invalid reference (code 99)");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for gateway operations.
///
/// `Ok` carries the success payload unwrapped from the gateway envelope,
/// `Err` the failure. A call never produces both.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Structured failure reported by the gateway.
///
/// `code` is the gateway's own `responseCode` when the body carries one and the
/// HTTP status code otherwise. The two namespaces are not guaranteed to be
/// disjoint, so callers should not branch on `code` without also checking
/// where the failure came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Human-readable failure message.
    pub message: String,
    /// Gateway response code, or the HTTP status when the gateway sent none.
    pub code: String,
}

impl Failure {
    /// Creates a failure from a message and code.
    #[must_use]
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self { message: message.into(), code: code.into() }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

/// Errors that can occur while talking to the gateway.
#[must_use = "errors should be handled or propagated"]
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The HTTP request never produced a response.
    ///
    /// Wraps [`reqwest::Error`]. Common causes:
    /// - Request timeout (see [`HttpConfig::timeout_secs`](crate::transport::HttpConfig))
    /// - Connection refused or reset
    /// - DNS resolution or TLS failures
    ///
    /// Use [`GatewayError::is_timeout`] to tell timeouts apart.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway answered with a failure.
    ///
    /// Produced for any non-success HTTP status, for success-status envelopes
    /// flagged `"requestSuccessful": false`, and for a refused token exchange.
    #[error("Gateway rejected request: {0}")]
    Rejected(Failure),

    /// A success response did not carry the expected JSON envelope.
    #[error("Malformed gateway response: {0}")]
    MalformedResponse(String),

    /// The request could not be built from the supplied parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be parsed, validated, or resolved.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// Returns the structured failure when the gateway sent one.
    #[must_use]
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Rejected(failure) => Some(failure),
            _ => None,
        }
    }

    /// Returns true when the transport gave up waiting for a response.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}

impl From<Failure> for GatewayError {
    fn from(failure: Failure) -> Self {
        Self::Rejected(failure)
    }
}
