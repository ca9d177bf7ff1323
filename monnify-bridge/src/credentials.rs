//! Merchant credentials.

use std::fmt;

use base64::Engine;
use zeroize::Zeroizing;

/// Merchant credentials issued by the gateway.
///
/// Set once when the client is built and never mutated afterwards. The secret
/// key lives in zeroize-on-drop storage and neither key shows up in `Debug`
/// output.
///
/// # Examples
///
/// ```
/// use monnify_bridge::Credentials;
///
/// let credentials = Credentials::new("MK_TEST_KEY", "SK_TEST_KEY", "7059707855", "NGN");
/// assert_eq!(credentials.contract_code(), "7059707855");
/// assert!(!format!("{credentials:?}").contains("SK_TEST_KEY"));
/// ```
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    secret_key: Zeroizing<String>,
    contract_code: String,
    default_currency_code: String,
}

impl Credentials {
    /// Creates credentials from their parts.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        contract_code: impl Into<String>,
        default_currency_code: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: Zeroizing::new(secret_key.into()),
            contract_code: contract_code.into(),
            default_currency_code: default_currency_code.into(),
        }
    }

    /// Returns the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the secret key.
    #[must_use]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Returns the merchant contract code.
    #[must_use]
    pub fn contract_code(&self) -> &str {
        &self.contract_code
    }

    /// Returns the currency used when a request does not name one.
    #[must_use]
    pub fn default_currency_code(&self) -> &str {
        &self.default_currency_code
    }

    /// Returns the `Authorization` header value for basic auth.
    pub(crate) fn basic_authorization(&self) -> Zeroizing<String> {
        let pair = Zeroizing::new(format!("{}:{}", self.api_key, self.secret_key.as_str()));
        let encoded = base64::engine::general_purpose::STANDARD.encode(pair.as_bytes());
        Zeroizing::new(format!("Basic {encoded}"))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .field("contract_code", &self.contract_code)
            .field("default_currency_code", &self.default_currency_code)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_accessors() {
        let credentials = Credentials::new("api", "secret", "123", "NGN");
        assert_eq!(credentials.api_key(), "api");
        assert_eq!(credentials.secret_key(), "secret");
        assert_eq!(credentials.contract_code(), "123");
        assert_eq!(credentials.default_currency_code(), "NGN");
    }

    #[test]
    fn test_basic_authorization_header() {
        let credentials =
            Credentials::new("MK_TEST_SAF7HR5F3F", "4SY6TNL8CK3VPRSBTHTRG2N8XXEGC6NL", "1", "NGN");
        // base64("MK_TEST_SAF7HR5F3F:4SY6TNL8CK3VPRSBTHTRG2N8XXEGC6NL")
        assert_eq!(
            credentials.basic_authorization().as_str(),
            "Basic TUtfVEVTVF9TQUY3SFI1RjNGOjRTWTZUTkw4Q0szVlBSU0JUSFRSRzJOOFhYRUdDNk5M"
        );
    }

    #[test]
    fn test_debug_redacts_keys() {
        let credentials = Credentials::new("MK_LIVE", "SK_LIVE", "123", "NGN");
        let debug_str = format!("{credentials:?}");
        assert!(!debug_str.contains("MK_LIVE"));
        assert!(!debug_str.contains("SK_LIVE"));
        assert!(debug_str.contains("[REDACTED]"));
        assert!(debug_str.contains("123"));
    }
}
