use proptest::prelude::*;
use sha2::{Digest, Sha512};

use crate::notification::{NotificationFields, compute_hash, verify_notification_hash};

fn field() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ./:_-]{0,32}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_hash_is_deterministic_lowercase_hex(
        secret in field(),
        payment_reference in field(),
        amount_paid in field(),
        paid_on in field(),
        transaction_reference in field(),
    ) {
        let parts = [&secret, &payment_reference, &amount_paid, &paid_on, &transaction_reference];
        let first = compute_hash(parts[0], parts[1], parts[2], parts[3], parts[4]);
        let second = compute_hash(parts[0], parts[1], parts[2], parts[3], parts[4]);

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), 128);
        prop_assert!(first.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));

        let joined = parts.map(String::as_str).join("|");
        prop_assert_eq!(first, hex::encode(Sha512::digest(joined.as_bytes())));
    }

    #[test]
    fn test_changing_one_field_changes_hash(
        parts in prop::array::uniform5(field()),
        index in 0usize..5,
        suffix in "[A-Za-z0-9]{1,8}",
    ) {
        let original = compute_hash(&parts[0], &parts[1], &parts[2], &parts[3], &parts[4]);

        let mut changed = parts.clone();
        changed[index].push_str(&suffix);
        let altered = compute_hash(&changed[0], &changed[1], &changed[2], &changed[3], &changed[4]);

        prop_assert_ne!(original, altered);
    }

    #[test]
    fn test_verify_accepts_own_hash_and_rejects_other_secret(
        secret in "[A-Za-z0-9_]{1,32}",
        other_secret in "[A-Za-z0-9_]{1,32}",
        payment_reference in field(),
        amount_paid in field(),
        paid_on in field(),
        transaction_reference in field(),
    ) {
        prop_assume!(secret != other_secret);

        let fields =
            NotificationFields { payment_reference, amount_paid, paid_on, transaction_reference };
        let hash = fields.compute_hash(&secret);

        prop_assert!(verify_notification_hash(&secret, &fields, &hash));
        prop_assert!(verify_notification_hash(&secret, &fields, &hash.to_ascii_uppercase()));
        prop_assert!(!verify_notification_hash(&other_secret, &fields, &hash));
    }
}
