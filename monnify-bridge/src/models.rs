//! Typed parameters for transaction operations.
//!
//! These are the caller-facing inputs. They are converted into gateway wire
//! payloads by the request builder, which trims free-text fields, fills in the
//! default currency and the contract code, and leaves out anything unset.
//!
//! # Examples
//!
//! ```
//! use monnify_bridge::models::{InitializeTransaction, PaymentMethod};
//! use rust_decimal::Decimal;
//!
//! let params = InitializeTransaction {
//!     amount: Decimal::new(50000, 2),
//!     customer_name: "Jane Doe".into(),
//!     customer_email: "jane@example.com".into(),
//!     payment_reference: "order-1001".into(),
//!     payment_description: "Order 1001".into(),
//!     redirect_url: Some("https://shop.example.com/paid".into()),
//!     payment_methods: vec![PaymentMethod::Card, PaymentMethod::AccountTransfer],
//!     ..Default::default()
//! };
//! assert!(params.currency_code.is_none());
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment channel offered to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Debit or credit card.
    Card,
    /// Transfer into a dynamically generated account.
    AccountTransfer,
    /// USSD short code.
    Ussd,
    /// Payment against a phone number.
    PhoneNumber,
}

impl PaymentMethod {
    /// Returns the gateway's name for this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "CARD",
            Self::AccountTransfer => "ACCOUNT_TRANSFER",
            Self::Ussd => "USSD",
            Self::PhoneNumber => "PHONE_NUMBER",
        }
    }
}

/// One recipient of a split payment.
///
/// Unset fields are not transmitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSplit {
    /// Sub-account receiving this share.
    pub sub_account_code: String,
    /// Share of the gateway fee borne by this sub-account, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_percentage: Option<Decimal>,
    /// Fixed amount paid to this sub-account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_amount: Option<Decimal>,
    /// Share of the payment paid to this sub-account, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_percentage: Option<Decimal>,
    /// Whether this sub-account bears the gateway fee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_bearer: Option<bool>,
}

/// Parameters for initializing a transaction.
#[derive(Debug, Clone, Default)]
pub struct InitializeTransaction {
    /// Amount to charge.
    pub amount: Decimal,
    /// Customer full name.
    pub customer_name: String,
    /// Customer email address.
    pub customer_email: String,
    /// Merchant-side unique reference.
    pub payment_reference: String,
    /// Description shown to the customer.
    pub payment_description: String,
    /// Where the customer is sent after paying.
    pub redirect_url: Option<String>,
    /// Channels to offer. Empty offers every channel enabled on the contract.
    pub payment_methods: Vec<PaymentMethod>,
    /// Split settlement instructions.
    pub income_split_config: Option<Vec<IncomeSplit>>,
    /// Currency override; the credentials' default currency otherwise.
    pub currency_code: Option<String>,
}

/// Parameters for charging a previously tokenized card.
#[derive(Debug, Clone, Default)]
pub struct ChargeCardToken {
    /// Card token from an earlier card payment.
    pub card_token: String,
    /// Amount to charge.
    pub amount: Decimal,
    /// Customer full name.
    pub customer_name: String,
    /// Customer email address; must match the one the token was issued for.
    pub customer_email: String,
    /// Merchant-side unique reference.
    pub payment_reference: String,
    /// Description of the charge.
    pub payment_description: String,
    /// Split settlement instructions.
    pub income_split_config: Option<Vec<IncomeSplit>>,
    /// Currency override; the credentials' default currency otherwise.
    pub currency_code: Option<String>,
}

/// Parameters for paying an initialized transaction by bank transfer.
#[derive(Debug, Clone, Default)]
pub struct BankTransferPayment {
    /// Gateway reference returned by transaction initialization.
    pub transaction_reference: String,
    /// Bank whose USSD string should be returned, if any.
    pub bank_code: Option<String>,
}

/// Filters for transaction search. Unset filters are not sent.
#[derive(Debug, Clone, Default)]
pub struct TransactionSearch {
    /// Zero-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub size: Option<u32>,
    /// Merchant-side reference.
    pub payment_reference: Option<String>,
    /// Gateway reference.
    pub transaction_reference: Option<String>,
    /// Lower amount bound.
    pub from_amount: Option<Decimal>,
    /// Upper amount bound.
    pub to_amount: Option<Decimal>,
    /// Exact amount.
    pub amount: Option<Decimal>,
    /// Customer name.
    pub customer_name: Option<String>,
    /// Customer email address.
    pub customer_email: Option<String>,
    /// Payment status, e.g. `PAID` or `PENDING`.
    pub payment_status: Option<String>,
    /// Earliest creation time.
    pub from: Option<DateTime<Utc>>,
    /// Latest creation time.
    pub to: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_wire_names() {
        let methods = [
            PaymentMethod::Card,
            PaymentMethod::AccountTransfer,
            PaymentMethod::Ussd,
            PaymentMethod::PhoneNumber,
        ];
        let json = serde_json::to_string(&methods).unwrap();
        assert_eq!(json, r#"["CARD","ACCOUNT_TRANSFER","USSD","PHONE_NUMBER"]"#);
    }

    #[test]
    fn test_payment_method_from_json() {
        let method: PaymentMethod = serde_json::from_str(r#""ACCOUNT_TRANSFER""#).unwrap();
        assert_eq!(method, PaymentMethod::AccountTransfer);
    }

    #[test]
    fn test_income_split_skips_unset_fields() {
        let split = IncomeSplit {
            sub_account_code: "MFY_SUB_1".into(),
            split_percentage: Some(Decimal::new(20, 0)),
            ..Default::default()
        };
        let json = serde_json::to_value(&split).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"subAccountCode": "MFY_SUB_1", "splitPercentage": "20"})
        );
    }

    #[test]
    fn test_defaults_leave_optionals_unset() {
        let params = InitializeTransaction::default();
        assert!(params.redirect_url.is_none());
        assert!(params.income_split_config.is_none());
        assert!(params.payment_methods.is_empty());

        let search = TransactionSearch::default();
        assert!(search.page.is_none() && search.from.is_none());
    }
}
