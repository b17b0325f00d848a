//! Shared fixtures for the mock-server tests

#![allow(dead_code)]

use serde_json::{Value, json};
use std::time::Duration;
use tally_core::auth::AuthToken;
use tally_core::cache::CachePolicies;
use tally_core::{ClientConfig, TallyClient};
use tracing_subscriber::EnvFilter;
use wiremock::MockServer;

/// Route library logs to the test harness; `RUST_LOG=tally_core=debug` shows them
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Client against `server` with in-memory session and preferences
pub fn client_for(server: &MockServer) -> TallyClient {
    client_at(&server.uri())
}

/// Client against an arbitrary base URL
pub fn client_at(base_url: &str) -> TallyClient {
    init_tracing();
    TallyClient::builder(ClientConfig::new(base_url))
        .ephemeral()
        .policies(CachePolicies::default().with_retry_delay(Duration::from_millis(10)))
        .build()
        .expect("client")
}

/// Client that already holds `token`
pub fn signed_in_client(server: &MockServer, token: &str) -> TallyClient {
    let client = client_for(server);
    client
        .session()
        .set(AuthToken::new(token).expect("token"))
        .expect("set token");
    client
}

/// Base URL of a local port with nothing listening on it
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

pub fn dashboard_body(month: &str) -> Value {
    json!({
        "month": month,
        "total_spend": 1250.5,
        "top_category": "Food",
        "top_category_spend": 600.0,
        "avg_confidence": 0.82
    })
}

pub fn transaction(id: &str, amount: f64) -> Value {
    json!({
        "id": id,
        "date": "2026-01-15T00:00:00",
        "description": "Grocery store",
        "amount": amount,
        "category": "Food",
        "confidence": 0.9,
        "source": "ml",
        "explanation": null
    })
}

pub fn authorization(request: &wiremock::Request) -> Option<String> {
    request
        .headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
