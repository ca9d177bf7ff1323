//! Monnify Bridge: client-side integration with the Monnify payment gateway.
//!
//! The crate originates authenticated calls to the gateway and verifies the
//! hashes on the payment notifications it sends back. It never serves traffic
//! itself.
//!
//! # Architecture
//!
//! ```text
//! caller
//!   │  Transactions::{initialize, charge_card_token, status,
//!   │                 pay_with_bank_transfer, search}
//!   ▼
//! ┌──────────────────────────── GatewayClient ────────────────────────────┐
//! │ Endpoint ──► request::build ──► Authenticator ──► Transport ──►       │
//! │ (path, auth)  (query / form)    Basic | Bearer     (reqwest)          │
//! │                                   │                     │             │
//! │                                   └─ token exchange ────┤             │
//! │                                                         ▼             │
//! │                                            response::normalize        │
//! └───────────────────────────────────────────────────────────────────────┘
//!   │  Result<serde_json::Value>
//!   ▼
//! caller ── notification::verify_notification_hash (independent, pure)
//! ```
//!
//! # Quick Start
//!
//! ## 1. Initialize a Transaction
//!
//! ```rust,no_run
//! use monnify_bridge::{Credentials, GatewayClient, models::InitializeTransaction};
//! use rust_decimal::Decimal;
//!
//! # async fn example() -> monnify_bridge::Result<()> {
//! let credentials = Credentials::new("MK_TEST_KEY", "SK_TEST_KEY", "7059707855", "NGN");
//! let client = GatewayClient::new("https://sandbox.monnify.com", credentials)?;
//!
//! let checkout = client
//!     .transactions()
//!     .initialize(&InitializeTransaction {
//!         amount: Decimal::new(50000, 2),
//!         customer_name: "Jane Doe".into(),
//!         customer_email: "jane@example.com".into(),
//!         payment_reference: "order-1001".into(),
//!         payment_description: "Order 1001".into(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! println!("Checkout URL: {}", checkout["checkoutUrl"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## 2. Verify a Payment Notification
//!
//! ```rust
//! use monnify_bridge::notification::{NotificationFields, verify_notification_hash};
//!
//! # fn example(body: &str, supplied_hash: &str) -> Result<(), serde_json::Error> {
//! let fields: NotificationFields = serde_json::from_str(body)?;
//!
//! if !verify_notification_hash("SK_TEST_KEY", &fields, supplied_hash) {
//!     // Do not trust this notification.
//!     return Ok(());
//! }
//! // Reconfirm with `Transactions::status` before fulfilling the order.
//! # Ok(())
//! # }
//! ```
//!
//! ## 3. Load Configuration
//!
//! ```rust,no_run
//! use monnify_bridge::{GatewayClient, config::GatewayConfig};
//!
//! # fn example() -> monnify_bridge::Result<()> {
//! // Keys come from MONNIFY_API_KEY / MONNIFY_SECRET_KEY unless overridden.
//! let config = GatewayConfig::from_file("monnify.toml")?;
//! let _client = GatewayClient::from_config(&config)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`transactions`]: the five transaction operations
//! - [`auth`]: basic-auth and cached bearer-token strategies
//! - [`response`]: envelope and error-shape normalization
//! - [`notification`]: notification hash computation and verification
//! - [`transport`]: HTTP transport trait and reqwest implementation
//! - [`config`]: TOML configuration
//! - [`error`]: error types
//!
//! # Error Handling
//!
//! Every operation returns [`Result<serde_json::Value>`](Result). The crate
//! never retries and never logs failures; it reports each one once to the
//! caller. Use [`GatewayError::failure`] for the gateway's message and code,
//! and [`GatewayError::is_timeout`] to spot transport timeouts.
//!
//! # Security Considerations
//!
//! - The secret key is zeroized on drop; keys and tokens never appear in
//!   `Debug` output or tracing fields
//! - Configured base URLs must use HTTPS
//! - Header values are checked for CR/LF injection before sending
//! - Notification hashes are compared without early exit

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest and wiremock"
)]

pub mod auth;
pub mod client;
pub mod config;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod models;
pub mod notification;
mod request;
pub mod response;
pub mod transactions;
pub mod transport;

pub use client::GatewayClient;
pub use credentials::Credentials;
pub use error::{Failure, GatewayError, Result};
pub use transactions::Transactions;
