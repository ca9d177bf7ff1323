//! Gateway response normalization.
//!
//! Every gateway answer is reduced to one [`Result`]: the `responseBody` of a
//! successful envelope, or a [`Failure`] describing the rejection.
//!
//! Successful responses look like:
//!
//! ```json
//! {"requestSuccessful": true, "responseMessage": "success", "responseCode": "0",
//!  "responseBody": { ... }}
//! ```
//!
//! Failures come in two shapes depending on where they were raised. Gateway
//! logic answers with `{"responseMessage": "...", "responseCode": "..."}`. The
//! HTTP layer in front of it (unknown path, wrong method) answers with
//! `{"path": "/x", "error": "Not Found", "status": 404}`. Anything else, an
//! HTML error page for instance, is reported by HTTP status alone.
//!
//! When the body names no code, the HTTP status is used as the failure code.
//! When it names no message, the path and status reason are used instead; a
//! code the gateway did send is kept either way.

use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{Failure, GatewayError, Result},
    transport::TransportResponse,
};

/// Response code as sent by the gateway, which uses both strings and numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Code {
    Text(String),
    Number(serde_json::Number),
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        match code {
            Code::Text(text) => text,
            Code::Number(number) => number.to_string(),
        }
    }
}

/// Response envelope on success statuses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    #[serde(default)]
    request_successful: Option<bool>,
    #[serde(default)]
    response_message: Option<String>,
    #[serde(default)]
    response_code: Option<Code>,
    #[serde(default)]
    response_body: Value,
}

/// Error bodies on failure statuses, tried in declaration order.
///
/// The HTTP-layer shape needs both of its fields, so it goes first; the
/// gateway shape accepts any object and may carry neither field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorShape {
    Http {
        path: String,
        error: String,
        #[serde(default)]
        status: Option<Code>,
    },
    Gateway {
        #[serde(rename = "responseMessage", default)]
        message: Option<String>,
        #[serde(rename = "responseCode", default)]
        code: Option<Code>,
    },
}

/// Normalizes a raw gateway response.
///
/// `request_path` is the path that was called; it names the failure when the
/// body carries nothing usable.
///
/// # Errors
///
/// - [`GatewayError::Rejected`] for any non-2xx status, and for a 2xx envelope
///   with `"requestSuccessful": false`
/// - [`GatewayError::MalformedResponse`] for a 2xx status whose body is not a
///   JSON object
pub fn normalize(response: &TransportResponse, request_path: &str) -> Result<Value> {
    if !response.is_success() {
        return Err(GatewayError::Rejected(rejection(response, request_path)));
    }

    let envelope: Envelope = serde_json::from_slice(&response.body).map_err(|e| {
        let content_type = response.header("content-type").unwrap_or("no content type");
        GatewayError::MalformedResponse(format!(
            "status {} ({content_type}) with undecodable body: {e}",
            response.status
        ))
    })?;

    if envelope.request_successful == Some(false) {
        let message = envelope
            .response_message
            .unwrap_or_else(|| format!("Path '{request_path}' request was not successful"));
        let code = envelope.response_code.map_or_else(|| response.status.to_string(), String::from);
        return Err(GatewayError::Rejected(Failure::new(message, code)));
    }

    Ok(envelope.response_body)
}

fn rejection(response: &TransportResponse, request_path: &str) -> Failure {
    let status = response.status;
    let fallback_message = || format!("Path '{request_path}' {}", status_text(status));
    let fallback_code = || status.to_string();

    match serde_json::from_slice::<ErrorShape>(&response.body) {
        Ok(ErrorShape::Http { path, error, status: code }) => Failure::new(
            format!("Path '{path}' {error}"),
            code.map_or_else(fallback_code, String::from),
        ),
        Ok(ErrorShape::Gateway { message, code }) => Failure::new(
            message.unwrap_or_else(fallback_message),
            code.map_or_else(fallback_code, String::from),
        ),
        Err(_) => Failure::new(fallback_message(), fallback_code()),
    }
}

fn status_text(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map_or_else(|| format!("HTTP {status}"), str::to_owned)
}
