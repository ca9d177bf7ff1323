//! Request building.
//!
//! Turns typed operation parameters into gateway wire payloads and those into
//! [`HttpRequest`]s. Read operations carry their payload as a query string,
//! write operations as an `application/x-www-form-urlencoded` body. Both use
//! bracketed keys for lists, e.g. `paymentMethods[0]=CARD` and
//! `incomeSplitConfig[0][subAccountCode]=MFY_SUB_1`.
//!
//! While converting, the builder:
//! - trims names, email addresses, descriptions, URLs and bank codes
//! - substitutes the credentials' default currency when none is given
//! - leaves out optional fields that are unset or blank

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use url::Url;

use crate::{
    credentials::Credentials,
    error::{GatewayError, Result},
    models::{
        BankTransferPayment, ChargeCardToken, IncomeSplit, InitializeTransaction,
        TransactionSearch,
    },
    transport::{HttpRequest, Method},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Trims a required field, rejecting blank input.
fn required<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GatewayError::InvalidInput(format!("{field} cannot be empty")));
    }
    Ok(trimmed)
}

/// Trims an optional field, dropping it when blank.
fn optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn currency<'a>(requested: Option<&'a str>, credentials: &'a Credentials) -> &'a str {
    optional(requested).unwrap_or_else(|| credentials.default_currency_code())
}

fn income_splits(config: Option<&[IncomeSplit]>) -> Option<&[IncomeSplit]> {
    config.filter(|splits| !splits.is_empty())
}

/// Wire payload for transaction initialization.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InitializePayload<'a> {
    amount: Decimal,
    customer_name: &'a str,
    customer_email: &'a str,
    payment_reference: &'a str,
    payment_description: &'a str,
    currency_code: &'a str,
    contract_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    payment_methods: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    income_split_config: Option<&'a [IncomeSplit]>,
}

impl<'a> InitializePayload<'a> {
    pub(crate) fn new(
        params: &'a InitializeTransaction,
        credentials: &'a Credentials,
    ) -> Result<Self> {
        Ok(Self {
            amount: params.amount,
            customer_name: params.customer_name.trim(),
            customer_email: params.customer_email.trim(),
            payment_reference: required("payment reference", &params.payment_reference)?,
            payment_description: params.payment_description.trim(),
            currency_code: currency(params.currency_code.as_deref(), credentials),
            contract_code: credentials.contract_code(),
            redirect_url: optional(params.redirect_url.as_deref()),
            payment_methods: params.payment_methods.iter().map(|m| m.as_str()).collect(),
            income_split_config: income_splits(params.income_split_config.as_deref()),
        })
    }
}

/// Wire payload for charging a card token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChargeCardPayload<'a> {
    card_token: &'a str,
    amount: Decimal,
    customer_name: &'a str,
    customer_email: &'a str,
    payment_reference: &'a str,
    payment_description: &'a str,
    currency_code: &'a str,
    contract_code: &'a str,
    api_key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    income_split_config: Option<&'a [IncomeSplit]>,
}

impl<'a> ChargeCardPayload<'a> {
    pub(crate) fn new(params: &'a ChargeCardToken, credentials: &'a Credentials) -> Result<Self> {
        Ok(Self {
            card_token: required("card token", &params.card_token)?,
            amount: params.amount,
            customer_name: params.customer_name.trim(),
            customer_email: params.customer_email.trim(),
            payment_reference: required("payment reference", &params.payment_reference)?,
            payment_description: params.payment_description.trim(),
            currency_code: currency(params.currency_code.as_deref(), credentials),
            contract_code: credentials.contract_code(),
            api_key: credentials.api_key(),
            income_split_config: income_splits(params.income_split_config.as_deref()),
        })
    }
}

/// Wire payload for bank transfer initialization.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BankTransferPayload<'a> {
    transaction_reference: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    bank_code: Option<&'a str>,
}

impl<'a> BankTransferPayload<'a> {
    pub(crate) fn new(params: &'a BankTransferPayment) -> Result<Self> {
        Ok(Self {
            transaction_reference: required(
                "transaction reference",
                &params.transaction_reference,
            )?,
            bank_code: optional(params.bank_code.as_deref()),
        })
    }
}

/// Query parameters for transaction search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_reference: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_reference: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    from_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_status: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<i64>,
}

impl<'a> SearchQuery<'a> {
    pub(crate) fn new(filters: &'a TransactionSearch) -> Self {
        let millis = |at: Option<DateTime<Utc>>| at.map(|t| t.timestamp_millis());
        Self {
            page: filters.page,
            size: filters.size,
            payment_reference: optional(filters.payment_reference.as_deref()),
            transaction_reference: optional(filters.transaction_reference.as_deref()),
            from_amount: filters.from_amount,
            to_amount: filters.to_amount,
            amount: filters.amount,
            customer_name: optional(filters.customer_name.as_deref()),
            customer_email: optional(filters.customer_email.as_deref()),
            payment_status: optional(filters.payment_status.as_deref()),
            from: millis(filters.from),
            to: millis(filters.to),
        }
    }
}

/// Encodes a payload with bracketed nested keys.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidInput`] if the payload cannot be encoded.
pub(crate) fn encode<P: Serialize>(payload: &P) -> Result<String> {
    serde_qs::to_string(payload)
        .map_err(|e| GatewayError::InvalidInput(format!("cannot encode request parameters: {e}")))
}

/// Builds an unauthenticated request for `url`.
///
/// `GET` requests get the payload as query string, `POST` requests as form
/// body. An empty payload adds neither.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidInput`] if the payload cannot be encoded.
pub(crate) fn build<P: Serialize>(
    method: Method,
    mut url: Url,
    payload: Option<&P>,
) -> Result<HttpRequest> {
    let encoded = payload.map(encode).transpose()?.filter(|e| !e.is_empty());

    match (method, encoded) {
        (Method::Get, Some(query)) => {
            url.set_query(Some(&query));
            Ok(HttpRequest::new(method, url.as_str()))
        }
        (Method::Post, Some(form)) => Ok(HttpRequest::new(method, url.as_str())
            .with_header("Content-Type", FORM_CONTENT_TYPE)
            .with_body(form.into_bytes())),
        (_, None) => Ok(HttpRequest::new(method, url.as_str())),
    }
}
