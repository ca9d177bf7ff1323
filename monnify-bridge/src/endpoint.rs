//! Gateway endpoints.
//!
//! Each operation the client exposes is described by one [`Endpoint`]: its
//! HTTP method, API version, path below the version prefix, and the
//! [`AuthScheme`] the gateway demands for it.
//!
//! | Operation               | Auth   | Method | Path                                          |
//! |-------------------------|--------|--------|-----------------------------------------------|
//! | token exchange          | Basic  | POST   | `/api/v1/auth/login`                          |
//! | search transactions     | Bearer | GET    | `/api/v1/transactions/search`                 |
//! | initialize transaction  | Basic  | POST   | `/api/v1/merchant/transactions/init-transaction` |
//! | charge card token       | Bearer | POST   | `/api/v1/merchant/cards/charge-card-token`    |
//! | transaction status      | Bearer | GET    | `/api/v2/transactions/{reference}`            |
//! | pay with bank transfer  | Basic  | POST   | `/api/v1/merchant/bank-transfer/init-payment` |

use url::Url;

use crate::{
    auth::AuthScheme,
    error::{GatewayError, Result},
    transport::Method,
};

/// Versioned API prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    /// `/api/v1`
    V1,
    /// `/api/v2`
    V2,
}

impl ApiVersion {
    /// Returns the path prefix for this version.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::V1 => "/api/v1",
            Self::V2 => "/api/v2",
        }
    }
}

/// A gateway endpoint and the authentication it requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// HTTP method.
    pub method: Method,
    /// API version.
    pub version: ApiVersion,
    /// Path below the version prefix, without leading slash.
    pub path: &'static str,
    /// Trailing resource identifier, percent-encoded as one path segment.
    pub resource: Option<String>,
    /// Required authentication.
    pub auth: AuthScheme,
}

impl Endpoint {
    /// Bearer token exchange.
    pub const TOKEN_EXCHANGE: Self =
        Self::fixed(Method::Post, ApiVersion::V1, "auth/login", AuthScheme::Basic);

    /// Transaction search.
    pub const SEARCH_TRANSACTIONS: Self =
        Self::fixed(Method::Get, ApiVersion::V1, "transactions/search", AuthScheme::Bearer);

    /// Transaction initialization.
    pub const INITIALIZE_TRANSACTION: Self = Self::fixed(
        Method::Post,
        ApiVersion::V1,
        "merchant/transactions/init-transaction",
        AuthScheme::Basic,
    );

    /// Charge a tokenized card.
    pub const CHARGE_CARD_TOKEN: Self = Self::fixed(
        Method::Post,
        ApiVersion::V1,
        "merchant/cards/charge-card-token",
        AuthScheme::Bearer,
    );

    /// Bank transfer payment initialization.
    pub const BANK_TRANSFER_PAYMENT: Self = Self::fixed(
        Method::Post,
        ApiVersion::V1,
        "merchant/bank-transfer/init-payment",
        AuthScheme::Basic,
    );

    const fn fixed(
        method: Method,
        version: ApiVersion,
        path: &'static str,
        auth: AuthScheme,
    ) -> Self {
        Self { method, version, path, resource: None, auth }
    }

    /// Transaction status lookup for one transaction reference.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] if the reference is blank.
    pub fn transaction_status(transaction_reference: &str) -> Result<Self> {
        let reference = transaction_reference.trim();
        if reference.is_empty() {
            return Err(GatewayError::InvalidInput(
                "transaction reference cannot be empty".to_owned(),
            ));
        }

        Ok(Self {
            resource: Some(reference.to_owned()),
            ..Self::fixed(Method::Get, ApiVersion::V2, "transactions", AuthScheme::Bearer)
        })
    }

    /// Joins this endpoint onto a base URL.
    ///
    /// Any path already present on `base_url` is kept as a prefix, so a base
    /// of `https://proxy.example.com/monnify` yields
    /// `https://proxy.example.com/monnify/api/v1/...`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] if `base_url` cannot carry a
    /// path (for example a `data:` URL).
    pub fn url(&self, base_url: &Url) -> Result<Url> {
        let mut url = base_url.clone();
        url.set_query(None);
        url.set_fragment(None);

        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                GatewayError::InvalidInput(format!("base URL cannot be a base: {base_url}"))
            })?;
            segments.pop_if_empty();
            segments.extend(self.version.prefix().split('/').filter(|s| !s.is_empty()));
            segments.extend(self.path.split('/'));
            if let Some(ref resource) = self.resource {
                segments.push(resource);
            }
        }

        Ok(url)
    }
}
