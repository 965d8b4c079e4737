/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for pmxt-adapter tests

#![allow(dead_code)]

use pmxt_adapter::{ClientConfig, Exchange, ExchangeCredentials, SidecarClient, Venue};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Access token the mocked sidecar expects
pub fn mock_access_token() -> String {
    "pmxt-test-token".to_string()
}

pub fn exchange(server: &MockServer, venue: Venue, credentials: ExchangeCredentials) -> Exchange {
    let client = SidecarClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client init")
        .with_access_token(Some(mock_access_token()));
    Exchange::with_client(venue, client, credentials)
}

/// Answer `POST /api/{venue}/{method}` with a successful envelope around `data`
pub async fn mount_success(server: &MockServer, venue: &str, sidecar_method: &str, data: Value) {
    Mock::given(method("POST"))
        .and(path(format!("/api/{venue}/{sidecar_method}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": data,
        })))
        .mount(server)
        .await;
}

/// Body of the only request the server received
pub async fn single_request_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1, "expected exactly one sidecar call");
    serde_json::from_slice(&requests[0].body).expect("json body")
}

/// Two-outcome market as the sidecar returns it, without named slots
pub fn raw_binary_market(id: &str, title: &str, yes_price: f64) -> Value {
    json!({
        "marketId": id,
        "title": title,
        "outcomes": [
            { "outcomeId": format!("{id}-yes"), "label": "Yes", "price": yes_price },
            { "outcomeId": format!("{id}-no"), "label": "No", "price": 1.0 - yes_price }
        ],
        "volume24h": 1500.5,
        "liquidity": 320,
        "resolutionDate": "2026-11-03T00:00:00Z",
        "category": "Politics",
        "tags": ["Elections"]
    })
}

pub fn raw_order(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "marketId": "m-1",
        "outcomeId": "m-1-yes",
        "side": "buy",
        "type": "limit",
        "price": 0.55,
        "amount": 10,
        "status": status,
        "filled": 0,
        "remaining": 10,
        "timestamp": 1_760_000_000_000_i64
    })
}
