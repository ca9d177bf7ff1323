//! Integration tests for transaction operations.
//!
//! Each test mounts a mock gateway, drives one operation through the real HTTP
//! transport, and inspects what went over the wire and what came back.

use std::collections::HashMap;

use monnify_bridge::{
    Credentials, Failure, GatewayClient, GatewayError,
    models::{
        ChargeCardToken, IncomeSplit, InitializeTransaction, PaymentMethod, TransactionSearch,
    },
    transport::{HttpConfig, HttpTransport},
};
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::{
    Mock, MockServer, Request, ResponseTemplate,
    matchers::{header, method, path},
};

fn credentials() -> Credentials {
    Credentials::new("MK_TEST_KEY", "SK_TEST_KEY", "7059707855", "NGN")
}

fn client(server: &MockServer) -> GatewayClient {
    GatewayClient::new(&server.uri(), credentials()).expect("client should build")
}

fn envelope(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "requestSuccessful": true,
        "responseMessage": "success",
        "responseCode": "0",
        "responseBody": body
    }))
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(envelope(json!({"accessToken": "token-1", "expiresIn": 3600})))
        .mount(server)
        .await;
}

async fn single_request(server: &MockServer, request_path: &str) -> Request {
    let requests = server.received_requests().await.expect("request recording enabled");
    let mut matching = requests.into_iter().filter(|r| r.url.path() == request_path);
    let request = matching.next().expect("request should have been sent");
    assert!(matching.next().is_none(), "expected a single request to {request_path}");
    request
}

fn form_fields(request: &Request) -> HashMap<String, String> {
    url::form_urlencoded::parse(&request.body).into_owned().collect()
}

fn initialize_params() -> InitializeTransaction {
    InitializeTransaction {
        amount: Decimal::new(50000, 2),
        customer_name: "  Jane Doe  ".into(),
        customer_email: "jane@example.com".into(),
        payment_reference: "order-1001".into(),
        payment_description: "  Order 1001 ".into(),
        redirect_url: Some(" https://shop.example.com/paid  ".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_initialize_transaction_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/merchant/transactions/init-transaction"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .respond_with(envelope(json!({
            "transactionReference": "MNFY|20|0001",
            "checkoutUrl": "https://sandbox.sdk.monnify.com/checkout/MNFY|20|0001"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let body = client.transactions().initialize(&initialize_params()).await.unwrap();
    assert_eq!(body["transactionReference"], "MNFY|20|0001");

    let request = single_request(&server, "/api/v1/merchant/transactions/init-transaction").await;
    let auth = request.headers.get("authorization").unwrap().to_str().unwrap();
    assert!(auth.starts_with("Basic "));

    let fields = form_fields(&request);
    assert_eq!(fields["amount"], "500.00");
    assert_eq!(fields["customerName"], "Jane Doe");
    assert_eq!(fields["paymentDescription"], "Order 1001");
    assert_eq!(fields["redirectUrl"], "https://shop.example.com/paid");
    assert_eq!(fields["paymentReference"], "order-1001");
    assert_eq!(fields["contractCode"], "7059707855");
    // Currency unspecified: the configured default is sent.
    assert_eq!(fields["currencyCode"], "NGN");
    assert!(fields.keys().all(|k| !k.starts_with("incomeSplitConfig")));
}

#[tokio::test]
async fn test_initialize_transaction_with_splits_and_methods() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/merchant/transactions/init-transaction"))
        .respond_with(envelope(json!({})))
        .mount(&server)
        .await;

    let params = InitializeTransaction {
        payment_methods: vec![PaymentMethod::Card, PaymentMethod::Ussd],
        income_split_config: Some(vec![IncomeSplit {
            sub_account_code: "MFY_SUB_1".into(),
            fee_percentage: Some(Decimal::new(105, 1)),
            split_amount: Some(Decimal::new(2000, 2)),
            fee_bearer: Some(false),
            ..Default::default()
        }]),
        currency_code: Some("usd".into()),
        ..initialize_params()
    };

    client(&server).transactions().initialize(&params).await.unwrap();

    let request = single_request(&server, "/api/v1/merchant/transactions/init-transaction").await;
    let fields = form_fields(&request);
    assert_eq!(fields["paymentMethods[0]"], "CARD");
    assert_eq!(fields["paymentMethods[1]"], "USSD");
    assert_eq!(fields["incomeSplitConfig[0][subAccountCode]"], "MFY_SUB_1");
    assert_eq!(fields["incomeSplitConfig[0][feePercentage]"], "10.5");
    assert_eq!(fields["incomeSplitConfig[0][splitAmount]"], "20.00");
    assert_eq!(fields["incomeSplitConfig[0][feeBearer]"], "false");
    assert!(!fields.contains_key("incomeSplitConfig[0][splitPercentage]"));
    assert_eq!(fields["currencyCode"], "usd");
}

#[tokio::test]
async fn test_charge_card_token_payload() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/merchant/cards/charge-card-token"))
        .and(header("Authorization", "Bearer token-1"))
        .respond_with(envelope(json!({"status": "SUCCESS"})))
        .expect(1)
        .mount(&server)
        .await;

    let params = ChargeCardToken {
        card_token: "MNFY_CARD_TOKEN".into(),
        amount: Decimal::new(2500, 0),
        customer_name: " Jane Doe ".into(),
        customer_email: "jane@example.com".into(),
        payment_reference: "renewal-7".into(),
        payment_description: "Monthly plan".into(),
        ..Default::default()
    };

    let body = client(&server).transactions().charge_card_token(&params).await.unwrap();
    assert_eq!(body["status"], "SUCCESS");

    let request = single_request(&server, "/api/v1/merchant/cards/charge-card-token").await;
    let fields = form_fields(&request);
    assert_eq!(fields["cardToken"], "MNFY_CARD_TOKEN");
    assert_eq!(fields["amount"], "2500");
    assert_eq!(fields["customerName"], "Jane Doe");
    assert_eq!(fields["apiKey"], "MK_TEST_KEY");
    assert_eq!(fields["contractCode"], "7059707855");
    assert_eq!(fields["currencyCode"], "NGN");
    assert!(fields.keys().all(|k| !k.starts_with("incomeSplitConfig")));
}

#[tokio::test]
async fn test_search_sends_query_string() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/transactions/search"))
        .and(header("Authorization", "Bearer token-1"))
        .respond_with(envelope(json!({"content": [], "totalElements": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let filters = TransactionSearch {
        page: Some(1),
        size: Some(20),
        payment_status: Some("PAID".into()),
        customer_name: Some("  Jane Doe ".into()),
        ..Default::default()
    };

    let body = client(&server).transactions().search(&filters).await.unwrap();
    assert_eq!(body["totalElements"], 0);

    let request = single_request(&server, "/api/v1/transactions/search").await;
    let query: HashMap<String, String> = request.url.query_pairs().into_owned().collect();
    assert_eq!(query.len(), 4);
    assert_eq!(query["page"], "1");
    assert_eq!(query["size"], "20");
    assert_eq!(query["paymentStatus"], "PAID");
    assert_eq!(query["customerName"], "Jane Doe");
    assert!(request.body.is_empty());
}

#[tokio::test]
async fn test_gateway_error_shape_is_normalized() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v2/transactions/UNKNOWN"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "requestSuccessful": false,
            "responseMessage": "Invalid reference",
            "responseCode": "99"
        })))
        .mount(&server)
        .await;

    let err = client(&server).transactions().status("UNKNOWN").await.unwrap_err();
    assert_eq!(err.failure(), Some(&Failure::new("Invalid reference", "99")));
}

#[tokio::test]
async fn test_http_error_shape_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/merchant/bank-transfer/init-payment"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "timestamp": "2021-01-01T10:00:00.000+0000",
            "status": 404,
            "error": "Not Found",
            "path": "/x"
        })))
        .mount(&server)
        .await;

    let params = monnify_bridge::models::BankTransferPayment {
        transaction_reference: "MNFY-TRX-1".into(),
        bank_code: None,
    };
    let err = client(&server).transactions().pay_with_bank_transfer(&params).await.unwrap_err();
    assert_eq!(err.failure(), Some(&Failure::new("Path '/x' Not Found", "404")));
}

#[tokio::test]
async fn test_unrecognized_error_body_falls_back_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/merchant/transactions/init-transaction"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client(&server).transactions().initialize(&initialize_params()).await.unwrap_err();
    assert_eq!(
        err.failure(),
        Some(&Failure::new(
            "Path '/api/v1/merchant/transactions/init-transaction' Service Unavailable",
            "503"
        ))
    );
}

#[tokio::test]
async fn test_unsuccessful_envelope_with_ok_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/merchant/transactions/init-transaction"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "requestSuccessful": false,
            "responseMessage": "Duplicate payment reference",
            "responseCode": 99
        })))
        .mount(&server)
        .await;

    let err = client(&server).transactions().initialize(&initialize_params()).await.unwrap_err();
    assert_eq!(err.failure(), Some(&Failure::new("Duplicate payment reference", "99")));
}

#[tokio::test]
async fn test_malformed_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/merchant/transactions/init-transaction"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let err = client(&server).transactions().initialize(&initialize_params()).await.unwrap_err();
    assert!(matches!(err, GatewayError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_transport_timeout_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/merchant/transactions/init-transaction"))
        .respond_with(envelope(json!({})).set_delay(std::time::Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = HttpConfig { timeout_secs: 1, ..Default::default() };
    let transport = HttpTransport::with_config(&config).unwrap();
    let client = GatewayClient::with_transport(transport, &server.uri(), credentials()).unwrap();

    let err = client.transactions().initialize(&initialize_params()).await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err:?}");
    assert!(err.failure().is_none());
}
