//! Monnify CLI: query transactions and check notification hashes from the
//! command line.
//!
//! ```text
//! monnify hash --secret-key SK... REF123 100.00 "01/01/2021 10:00:00" TRX987
//! monnify verify --secret-key SK... --body notification.json
//! monnify --config monnify.toml status "MNFY|20|20210101|000001"
//! monnify --config monnify.toml search --payment-status PAID --size 20
//! ```
//!
//! `status` and `search` read the gateway configuration from `--config` and
//! the keys from the environment variables it names. `hash` and `verify` work
//! offline and only need the secret key.

#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest"
)]

mod observability;

use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use monnify_bridge::{
    GatewayClient,
    config::GatewayConfig,
    models::TransactionSearch,
    notification::{NotificationFields, compute_hash, verify_notification_hash},
};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::info;

use crate::observability::{LogFormat, init_observability};

/// Command line for the Monnify payment gateway.
#[derive(Debug, Parser)]
#[command(name = "monnify", version, about)]
struct Cli {
    /// Gateway configuration file.
    #[arg(long, global = true, env = "MONNIFY_CONFIG", default_value = "monnify.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute the hash the gateway puts on a payment notification.
    Hash {
        #[command(flatten)]
        secret: SecretArgs,
        /// Merchant-side payment reference.
        payment_reference: String,
        /// Amount paid, as sent by the gateway.
        amount_paid: String,
        /// Payment time, as sent by the gateway.
        paid_on: String,
        /// Gateway transaction reference.
        transaction_reference: String,
    },

    /// Check the hash on a payment notification body.
    Verify {
        #[command(flatten)]
        secret: SecretArgs,
        /// Notification JSON file, or `-` for stdin.
        #[arg(long, default_value = "-")]
        body: PathBuf,
        /// Hash to check; defaults to the body's `transactionHash` field.
        #[arg(long)]
        hash: Option<String>,
    },

    /// Fetch the status of a transaction.
    Status {
        /// Gateway transaction reference.
        transaction_reference: String,
    },

    /// Search transactions.
    Search(SearchArgs),
}

#[derive(Debug, Args)]
struct SecretArgs {
    /// Merchant secret key.
    #[arg(long, env = "MONNIFY_SECRET_KEY", hide_env_values = true)]
    secret_key: String,
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Zero-based page number.
    #[arg(long)]
    page: Option<u32>,
    /// Page size.
    #[arg(long)]
    size: Option<u32>,
    /// Merchant-side payment reference.
    #[arg(long)]
    payment_reference: Option<String>,
    /// Gateway transaction reference.
    #[arg(long)]
    transaction_reference: Option<String>,
    /// Lower amount bound.
    #[arg(long)]
    from_amount: Option<Decimal>,
    /// Upper amount bound.
    #[arg(long)]
    to_amount: Option<Decimal>,
    /// Exact amount.
    #[arg(long)]
    amount: Option<Decimal>,
    /// Customer name.
    #[arg(long)]
    customer_name: Option<String>,
    /// Customer email address.
    #[arg(long)]
    customer_email: Option<String>,
    /// Payment status, e.g. PAID or PENDING.
    #[arg(long)]
    payment_status: Option<String>,
    /// Earliest creation time (RFC 3339).
    #[arg(long)]
    from: Option<DateTime<Utc>>,
    /// Latest creation time (RFC 3339).
    #[arg(long)]
    to: Option<DateTime<Utc>>,
}

impl From<SearchArgs> for TransactionSearch {
    fn from(args: SearchArgs) -> Self {
        Self {
            page: args.page,
            size: args.size,
            payment_reference: args.payment_reference,
            transaction_reference: args.transaction_reference,
            from_amount: args.from_amount,
            to_amount: args.to_amount,
            amount: args.amount,
            customer_name: args.customer_name,
            customer_email: args.customer_email,
            payment_status: args.payment_status,
            from: args.from,
            to: args.to,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_observability(LogFormat::from_env());

    let cli = Cli::parse();

    match cli.command {
        Command::Hash {
            secret,
            payment_reference,
            amount_paid,
            paid_on,
            transaction_reference,
        } => {
            let hash = compute_hash(
                &secret.secret_key,
                &payment_reference,
                &amount_paid,
                &paid_on,
                &transaction_reference,
            );
            println!("{hash}");
        }
        Command::Verify { secret, body, hash } => {
            let body = read_body(&body)?;
            if !check_notification(&secret.secret_key, &body, hash.as_deref())? {
                bail!("notification hash does not match; do not trust this notification");
            }
            println!("notification hash matches");
        }
        Command::Status { transaction_reference } => {
            let client = connect(&cli.config)?;
            let body = client.transactions().status(&transaction_reference).await?;
            print_json(&body)?;
        }
        Command::Search(args) => {
            let client = connect(&cli.config)?;
            let body = client.transactions().search(&args.into()).await?;
            print_json(&body)?;
        }
    }

    Ok(())
}

fn connect(config_path: &Path) -> anyhow::Result<GatewayClient> {
    let config = GatewayConfig::from_file(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    info!(environment = ?config.environment, base_url = config.base_url(), "gateway configured");
    Ok(GatewayClient::from_config(&config)?)
}

fn read_body(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut body = String::new();
        io::stdin().read_to_string(&mut body).context("reading notification from stdin")?;
        Ok(body)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

/// Returns whether the notification in `body` carries a valid hash.
///
/// `supplied_hash` overrides the body's own `transactionHash` field.
fn check_notification(
    secret_key: &str,
    body: &str,
    supplied_hash: Option<&str>,
) -> anyhow::Result<bool> {
    let json: Value = serde_json::from_str(body).context("notification is not valid JSON")?;
    let fields: NotificationFields = serde_json::from_value(json.clone())
        .context("notification is missing hashed fields")?;

    let hash = match supplied_hash {
        Some(hash) => hash.to_owned(),
        None => json
            .get("transactionHash")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .context("no --hash given and notification has no transactionHash")?,
    };

    Ok(verify_notification_hash(secret_key, &fields, &hash))
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    const HASH: &str = "0298e738c360c5cef5b5d1713e6c57128a26cf634c7ca1460421bf44f041a299\
                        4dcd2b65fdee5d38cd67b757b3639669edf253c45f07f513c7b678dca21d9744";

    fn notification(hash: &str) -> String {
        serde_json::json!({
            "transactionReference": "TRX987",
            "paymentReference": "REF123",
            "amountPaid": "100.00",
            "paidOn": "01/01/2021 10:00:00",
            "paymentStatus": "PAID",
            "transactionHash": hash
        })
        .to_string()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_status() {
        let cli = Cli::try_parse_from(["monnify", "--config", "live.toml", "status", "MNFY|1"])
            .unwrap();
        assert_eq!(cli.config, PathBuf::from("live.toml"));
        assert!(matches!(
            cli.command,
            Command::Status { ref transaction_reference } if transaction_reference == "MNFY|1"
        ));
    }

    #[test]
    fn test_parse_search_filters() {
        let cli = Cli::try_parse_from([
            "monnify",
            "search",
            "--page",
            "2",
            "--from-amount",
            "100.50",
            "--from",
            "2021-01-01T00:00:00Z",
        ])
        .unwrap();

        let Command::Search(args) = cli.command else { panic!("expected search") };
        let search = TransactionSearch::from(args);
        assert_eq!(search.page, Some(2));
        assert_eq!(search.from_amount, Some(Decimal::new(10050, 2)));
        assert_eq!(search.from.map(|t| t.timestamp()), Some(1_609_459_200));
        assert!(search.payment_status.is_none());
    }

    #[test]
    fn test_parse_hash_requires_secret() {
        let result =
            Cli::try_parse_from(["monnify", "hash", "--secret-key", "SK", "R", "1", "now", "T"]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_check_notification_uses_body_hash() {
        assert!(check_notification("SK_TEST_KEY", &notification(HASH), None).unwrap());
        assert!(!check_notification("SK_OTHER", &notification(HASH), None).unwrap());
    }

    #[test]
    fn test_check_notification_supplied_hash_overrides_body() {
        let body = notification("not-a-hash");
        assert!(!check_notification("SK_TEST_KEY", &body, None).unwrap());
        assert!(check_notification("SK_TEST_KEY", &body, Some(HASH)).unwrap());
    }

    #[test]
    fn test_check_notification_rejects_incomplete_body() {
        assert!(check_notification("SK", r#"{"paymentReference": "R"}"#, Some(HASH)).is_err());
        assert!(check_notification("SK", "not json", Some(HASH)).is_err());

        let without_hash = r#"{
            "paymentReference": "REF123",
            "amountPaid": "100.00",
            "paidOn": "01/01/2021 10:00:00",
            "transactionReference": "TRX987"
        }"#;
        assert!(check_notification("SK_TEST_KEY", without_hash, None).is_err());
    }
}
