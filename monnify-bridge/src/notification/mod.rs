//! Notification hash computation and verification.
//!
//! The gateway signs each payment notification with a SHA-512 digest over
//!
//! ```text
//! secretKey|paymentReference|amountPaid|paidOn|transactionReference
//! ```
//!
//! and sends it as `transactionHash`. Recomputing that digest with the
//! merchant's secret key and comparing it with the supplied one tells whether
//! the notification is authentic.
//!
//! # Security
//!
//! - Compare hashes with [`verify_notification_hash`], which does not exit
//!   early on the first differing byte.
//! - A matching hash only proves the gateway sent the claim. Before acting on
//!   it, confirm the transaction through
//!   [`Transactions::status`](crate::Transactions::status).
//!
//! # Examples
//!
//! ```
//! use monnify_bridge::notification::{NotificationFields, compute_hash, verify_notification_hash};
//!
//! let fields: NotificationFields = serde_json::from_str(r#"{
//!     "paymentReference": "REF123",
//!     "amountPaid": "100.00",
//!     "paidOn": "01/01/2021 10:00:00",
//!     "transactionReference": "TRX987"
//! }"#).unwrap();
//!
//! let hash = fields.compute_hash("SK_TEST_KEY");
//! assert_eq!(hash.len(), 128);
//! assert_eq!(
//!     hash,
//!     compute_hash("SK_TEST_KEY", "REF123", "100.00", "01/01/2021 10:00:00", "TRX987")
//! );
//! assert!(verify_notification_hash("SK_TEST_KEY", &fields, &hash));
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

#[cfg(test)]
mod proptest_hash;

/// Fields of an inbound notification covered by its hash.
///
/// Deserializes from the notification's own JSON field names, so it can be
/// read straight out of the webhook body. Other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFields {
    /// Merchant-side reference.
    pub payment_reference: String,
    /// Amount paid, exactly as the gateway formatted it.
    pub amount_paid: String,
    /// Payment time, exactly as the gateway formatted it.
    pub paid_on: String,
    /// Gateway reference.
    pub transaction_reference: String,
}

impl NotificationFields {
    /// Computes the expected notification hash for these fields.
    #[must_use]
    pub fn compute_hash(&self, secret_key: &str) -> String {
        compute_hash(
            secret_key,
            &self.payment_reference,
            &self.amount_paid,
            &self.paid_on,
            &self.transaction_reference,
        )
    }
}

/// Computes the lowercase hex SHA-512 digest of the pipe-joined fields.
///
/// Values are used verbatim; `amount_paid` and `paid_on` must be the strings
/// the gateway sent, not reformatted numbers or dates.
#[must_use]
pub fn compute_hash(
    secret_key: &str,
    payment_reference: &str,
    amount_paid: &str,
    paid_on: &str,
    transaction_reference: &str,
) -> String {
    let mut hasher = Sha512::new();
    for (i, part) in
        [secret_key, payment_reference, amount_paid, paid_on, transaction_reference]
            .iter()
            .enumerate()
    {
        if i > 0 {
            hasher.update(b"|");
        }
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Returns true when `supplied_hash` matches the hash computed for `fields`.
///
/// Hex case and surrounding whitespace in `supplied_hash` are ignored. The
/// comparison time does not depend on where the hashes differ.
#[must_use]
pub fn verify_notification_hash(
    secret_key: &str,
    fields: &NotificationFields,
    supplied_hash: &str,
) -> bool {
    let expected = fields.compute_hash(secret_key);
    let supplied = supplied_hash.trim().to_ascii_lowercase();
    expected.as_bytes().ct_eq(supplied.as_bytes()).into()
}
