//! Gateway configuration.
//!
//! [`GatewayConfig`] is TOML-deserializable and never holds key material: the
//! API and secret keys are read from environment variables named in the file,
//! when [`GatewayConfig::credentials`] is called.
//!
//! ```toml
//! environment = "sandbox"
//! contract_code = "7059707855"
//! default_currency = "NGN"
//! api_key_env = "MONNIFY_API_KEY"
//! secret_key_env = "MONNIFY_SECRET_KEY"
//!
//! [http]
//! timeout_secs = 30
//! ```

use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::{
    credentials::Credentials,
    error::{GatewayError, Result},
    transport::HttpConfig,
};

/// Base URL of the sandbox environment.
pub const SANDBOX_BASE_URL: &str = "https://sandbox.monnify.com";

/// Base URL of the live environment.
pub const LIVE_BASE_URL: &str = "https://api.monnify.com";

/// Gateway environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Test environment; no money moves.
    #[default]
    Sandbox,
    /// Production environment.
    Live,
}

impl Environment {
    /// Returns the default base URL for this environment.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_BASE_URL,
            Self::Live => LIVE_BASE_URL,
        }
    }
}

/// Root gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Target environment.
    #[serde(default)]
    pub environment: Environment,

    /// Overrides the environment's base URL.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Merchant contract code.
    pub contract_code: String,

    /// ISO 4217 currency used when a request names none.
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Environment variable holding the secret key.
    #[serde(default = "default_secret_key_env")]
    pub secret_key_env: String,

    /// HTTP transport settings.
    #[serde(default)]
    pub http: HttpConfig,
}

impl GatewayConfig {
    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if parsing or validation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use monnify_bridge::config::{Environment, GatewayConfig};
    ///
    /// let config = GatewayConfig::from_toml(r#"
    ///     environment = "live"
    ///     contract_code = "7059707855"
    /// "#).unwrap();
    ///
    /// assert_eq!(config.environment, Environment::Live);
    /// assert_eq!(config.base_url(), "https://api.monnify.com");
    /// assert_eq!(config.default_currency, "NGN");
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| GatewayError::Config(format!("invalid TOML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the file cannot be read, parsed, or
    /// validated.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Returns the effective base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or_else(|| self.environment.base_url())
    }

    /// Validates the configuration.
    ///
    /// Checks that:
    /// - the base URL override parses and uses HTTPS
    /// - the contract code is not blank
    /// - the default currency is three ASCII letters
    /// - both environment variable names are well formed
    /// - HTTP timeouts are within bounds
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref base_url) = self.base_url {
            validate_base_url(base_url)?;
        }

        if self.contract_code.trim().is_empty() {
            return Err(GatewayError::Config("contract_code cannot be empty".to_owned()));
        }

        if self.default_currency.len() != 3
            || !self.default_currency.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(GatewayError::Config(format!(
                "default_currency must be a three-letter ISO 4217 code: {}",
                self.default_currency
            )));
        }

        validate_env_var_name(&self.api_key_env)?;
        validate_env_var_name(&self.secret_key_env)?;
        self.http.validate()
    }

    /// Resolves credentials from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if either variable is unset or empty.
    pub fn credentials(&self) -> Result<Credentials> {
        self.credentials_with(|name| std::env::var(name).ok())
    }

    /// Resolves credentials through a custom variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if `lookup` yields nothing (or an
    /// empty string) for either variable.
    pub fn credentials_with<F>(&self, lookup: F) -> Result<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolve = |name: &str| {
            lookup(name).filter(|value| !value.is_empty()).ok_or_else(|| {
                GatewayError::Config(format!("environment variable {name} is not set"))
            })
        };

        let api_key = resolve(&self.api_key_env)?;
        let secret_key = resolve(&self.secret_key_env)?;

        Ok(Credentials::new(
            api_key,
            secret_key,
            self.contract_code.trim(),
            self.default_currency.to_ascii_uppercase(),
        ))
    }
}

fn validate_base_url(base_url: &str) -> Result<()> {
    let url = Url::parse(base_url)
        .map_err(|e| GatewayError::Config(format!("invalid base_url '{base_url}': {e}")))?;

    if url.scheme() != "https" {
        return Err(GatewayError::Config(format!(
            "base_url must use HTTPS, got: {}",
            url.scheme()
        )));
    }

    Ok(())
}

/// Environment variable names must match `[A-Za-z_][A-Za-z0-9_]*`.
fn validate_env_var_name(name: &str) -> Result<()> {
    let mut chars = name.chars();

    match chars.next() {
        None => {
            return Err(GatewayError::Config(
                "environment variable name cannot be empty".to_owned(),
            ));
        }
        Some(first) if !first.is_ascii_alphabetic() && first != '_' => {
            return Err(GatewayError::Config(format!(
                "environment variable name must start with letter or underscore: {name}"
            )));
        }
        Some(_) => {}
    }

    if let Some(ch) = chars.find(|ch| !ch.is_ascii_alphanumeric() && *ch != '_') {
        return Err(GatewayError::Config(format!(
            "environment variable name contains invalid character '{ch}': {name}"
        )));
    }

    Ok(())
}

fn default_currency() -> String {
    "NGN".to_owned()
}

fn default_api_key_env() -> String {
    "MONNIFY_API_KEY".to_owned()
}

fn default_secret_key_env() -> String {
    "MONNIFY_SECRET_KEY".to_owned()
}
