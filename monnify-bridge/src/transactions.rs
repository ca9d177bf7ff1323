//! Transaction operations.
//!
//! Each operation sends exactly one gateway request (plus a token exchange
//! when an OAuth2-protected call finds no valid cached token) and returns the
//! unwrapped `responseBody` on success. Nothing is retried.

use serde_json::Value;

use crate::{
    client::GatewayClient,
    endpoint::Endpoint,
    error::Result,
    models::{BankTransferPayment, ChargeCardToken, InitializeTransaction, TransactionSearch},
    request::{BankTransferPayload, ChargeCardPayload, InitializePayload, SearchQuery},
    transport::Transport,
};

/// Transaction operations of a [`GatewayClient`].
#[derive(Debug)]
pub struct Transactions<'a, T: Transport> {
    client: &'a GatewayClient<T>,
}

impl<'a, T: Transport> Transactions<'a, T> {
    pub(crate) const fn new(client: &'a GatewayClient<T>) -> Self {
        Self { client }
    }

    /// Initializes a transaction and returns its checkout details.
    ///
    /// Uses basic auth.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`](crate::GatewayError::InvalidInput)
    /// for a blank payment reference, and any dispatch error otherwise.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use monnify_bridge::{Credentials, GatewayClient, models::InitializeTransaction};
    /// use rust_decimal::Decimal;
    ///
    /// # async fn example() -> monnify_bridge::Result<()> {
    /// let credentials = Credentials::new("MK_TEST_KEY", "SK_TEST_KEY", "7059707855", "NGN");
    /// let client = GatewayClient::new("https://sandbox.monnify.com", credentials)?;
    ///
    /// let checkout = client
    ///     .transactions()
    ///     .initialize(&InitializeTransaction {
    ///         amount: Decimal::new(50000, 2),
    ///         customer_name: "Jane Doe".into(),
    ///         customer_email: "jane@example.com".into(),
    ///         payment_reference: "order-1001".into(),
    ///         payment_description: "Order 1001".into(),
    ///         ..Default::default()
    ///     })
    ///     .await?;
    ///
    /// println!("{}", checkout["checkoutUrl"]);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn initialize(&self, params: &InitializeTransaction) -> Result<Value> {
        let payload = InitializePayload::new(params, self.client.credentials())?;
        self.client.dispatch(&Endpoint::INITIALIZE_TRANSACTION, Some(&payload)).await
    }

    /// Charges a card token from an earlier payment.
    ///
    /// Uses a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`](crate::GatewayError::InvalidInput)
    /// for a blank card token or payment reference, and any dispatch error
    /// otherwise.
    pub async fn charge_card_token(&self, params: &ChargeCardToken) -> Result<Value> {
        let payload = ChargeCardPayload::new(params, self.client.credentials())?;
        self.client.dispatch(&Endpoint::CHARGE_CARD_TOKEN, Some(&payload)).await
    }

    /// Fetches the current status of a transaction.
    ///
    /// Uses a bearer token. The reference is percent-encoded into the path.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`](crate::GatewayError::InvalidInput)
    /// for a blank reference, and any dispatch error otherwise.
    pub async fn status(&self, transaction_reference: &str) -> Result<Value> {
        let endpoint = Endpoint::transaction_status(transaction_reference)?;
        self.client.dispatch::<()>(&endpoint, None).await
    }

    /// Starts a bank transfer payment for an initialized transaction.
    ///
    /// Uses basic auth.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`](crate::GatewayError::InvalidInput)
    /// for a blank transaction reference, and any dispatch error otherwise.
    pub async fn pay_with_bank_transfer(&self, params: &BankTransferPayment) -> Result<Value> {
        let payload = BankTransferPayload::new(params)?;
        self.client.dispatch(&Endpoint::BANK_TRANSFER_PAYMENT, Some(&payload)).await
    }

    /// Searches transactions. Only the filters that are set are sent.
    ///
    /// Uses a bearer token.
    ///
    /// # Errors
    ///
    /// Returns any dispatch error.
    pub async fn search(&self, filters: &TransactionSearch) -> Result<Value> {
        let query = SearchQuery::new(filters);
        self.client.dispatch(&Endpoint::SEARCH_TRANSACTIONS, Some(&query)).await
    }
}
