//! Timeouts and pooling for calls to the gateway.
//!
//! The client never retries, so the per-request timeout is the longest a
//! caller waits on one gateway call. A token exchange counts as its own call
//! with its own timeout.

use std::{ops::RangeInclusive, time::Duration};

use serde::Deserialize;

use crate::error::{GatewayError, Result};

/// Accepted per-request timeouts, in seconds.
pub const TIMEOUT_SECS: RangeInclusive<u64> = 1..=300;

/// Accepted connect timeouts, in seconds.
pub const CONNECT_TIMEOUT_SECS: RangeInclusive<u64> = 1..=60;

/// The `[http]` table of the gateway configuration.
///
/// All fields are optional:
///
/// ```toml
/// [http]
/// timeout_secs = 30          # whole call, from connect to last body byte
/// connect_timeout_secs = 10  # TCP + TLS handshake only
/// pool_max_idle_per_host = 10
/// ```
///
/// When `timeout_secs` elapses the call fails with
/// [`GatewayError::Transport`] and [`GatewayError::is_timeout`] is true.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Upper bound on one gateway call, in seconds.
    pub timeout_secs: u64,
    /// Upper bound on establishing a connection, in seconds.
    pub connect_timeout_secs: u64,
    /// Idle keep-alive connections to the gateway host.
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30, connect_timeout_secs: 10, pool_max_idle_per_host: 10 }
    }
}

impl HttpConfig {
    /// Checks both timeouts against [`TIMEOUT_SECS`] and
    /// [`CONNECT_TIMEOUT_SECS`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] naming the first out-of-range field.
    pub fn validate(&self) -> Result<()> {
        within("timeout_secs", self.timeout_secs, &TIMEOUT_SECS)?;
        within("connect_timeout_secs", self.connect_timeout_secs, &CONNECT_TIMEOUT_SECS)
    }

    /// Per-request timeout handed to the HTTP client.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connect timeout handed to the HTTP client.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn within(field: &str, value: u64, bounds: &RangeInclusive<u64>) -> Result<()> {
    if bounds.contains(&value) {
        return Ok(());
    }
    Err(GatewayError::Config(format!(
        "{field} = {value} is outside {}..={} seconds",
        bounds.start(),
        bounds.end()
    )))
}
