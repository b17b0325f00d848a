//! Upload fan-out against a mock server

mod common;

use common::{dashboard_body, signed_in_client};
use serde_json::json;
use tally_core::{FilePart, Namespace, TallyClient, YearMonth};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CSV: &[u8] = b"date,description,amount\n2026-02-03,Grocery store,42.50\n";

async fn mount_reads(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/analytics/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dashboard_body("2026-01")))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/analytics/trend"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/transactions/recent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/insights/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "month": "2026-01",
            "summary": "Spending is steady.",
            "breakdown": []
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "email": "asha@example.com",
            "name": "Asha"
        })))
        .mount(server)
        .await;
}

async fn warm(client: &TallyClient) {
    let january = YearMonth::new(2026, 1).unwrap();
    client.dashboard(january).await;
    client.trend().await;
    client.dashboard_recent().await;
    client.insights_summary(january).await;
    client.profile().await;
}

fn all_stale(client: &TallyClient, namespace: Namespace) -> bool {
    let cache = client.cache();
    let keys = cache.keys(namespace);
    !keys.is_empty() && keys.iter().all(|key| cache.is_stale(key))
}

fn none_stale(client: &TallyClient, namespace: Namespace) -> bool {
    let cache = client.cache();
    cache.keys(namespace).iter().all(|key| !cache.is_stale(key))
}

#[tokio::test]
async fn test_upload_selects_latest_month_and_invalidates() {
    let server = MockServer::start().await;
    mount_reads(&server).await;
    Mock::given(method("POST"))
        .and(path("/transactions/upload"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"inserted": 5, "latest_month": "2026-02"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server, "tok");
    warm(&client).await;

    let outcome = client
        .upload_pipeline()
        .upload(FilePart::new("feb.csv", "text/csv", CSV.to_vec()))
        .await
        .unwrap();

    assert_eq!(outcome.inserted, 5);
    assert_eq!(outcome.selected_month, Some(YearMonth::new(2026, 2).unwrap()));
    assert_eq!(
        client.preferences().get("selected_month", ""),
        "2026-02"
    );
    for namespace in [
        Namespace::Dashboard,
        Namespace::Trend,
        Namespace::Recent,
        Namespace::Insights,
    ] {
        assert!(all_stale(&client, namespace), "{namespace} not stale");
    }
    assert!(none_stale(&client, Namespace::Profile));

    let requests = server.received_requests().await.unwrap();
    let upload = requests
        .iter()
        .find(|r| r.url.path() == "/transactions/upload")
        .unwrap();
    let body = String::from_utf8_lossy(&upload.body);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"feb.csv\""));
    assert!(body.contains("Grocery store"));
}

#[tokio::test]
async fn test_upload_without_hint_still_invalidates() {
    let server = MockServer::start().await;
    mount_reads(&server).await;
    Mock::given(method("POST"))
        .and(path("/transactions/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"inserted": 0})))
        .mount(&server)
        .await;

    let client = signed_in_client(&server, "tok");
    let december = YearMonth::new(2025, 12).unwrap();
    client.select_month(december).unwrap();
    warm(&client).await;

    let outcome = client
        .upload_pipeline()
        .upload(FilePart::new("empty-month.csv", "text/csv", CSV.to_vec()))
        .await
        .unwrap();

    assert_eq!(outcome.selected_month, None);
    assert_eq!(client.selected_month(), december);
    assert!(all_stale(&client, Namespace::Trend));
    assert!(all_stale(&client, Namespace::Recent));
}

#[tokio::test]
async fn test_failed_upload_touches_nothing() {
    let server = MockServer::start().await;
    mount_reads(&server).await;
    Mock::given(method("POST"))
        .and(path("/transactions/upload"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"detail": "CSV must contain date, description, amount"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server, "tok");
    let december = YearMonth::new(2025, 12).unwrap();
    client.select_month(december).unwrap();
    warm(&client).await;

    let error = client
        .upload_pipeline()
        .upload(FilePart::new("bad.csv", "text/csv", CSV.to_vec()))
        .await
        .unwrap_err();

    assert_eq!(
        error.user_message("Upload failed"),
        "CSV must contain date, description, amount"
    );
    assert_eq!(client.selected_month(), december);
    for namespace in [
        Namespace::Dashboard,
        Namespace::Trend,
        Namespace::Recent,
        Namespace::Insights,
    ] {
        assert!(none_stale(&client, namespace), "{namespace} was invalidated");
    }
}

#[tokio::test]
async fn test_empty_file_rejected_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transactions/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = signed_in_client(&server, "tok");
    let error = client
        .upload_pipeline()
        .upload(FilePart::new("empty.csv", "text/csv", Vec::new()))
        .await
        .unwrap_err();

    assert_eq!(error.category(), tally_core::ErrorCategory::UserInput);
}

#[tokio::test]
async fn test_avatar_upload_accepts_any_image_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/profile/avatar"))
        .and(body_string_contains("image/bmp"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"avatar_url": "/static/avatars/u1.bmp"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let temp = tempfile::TempDir::new().unwrap();
    let image = temp.path().join("me.bmp");
    std::fs::write(&image, b"BM\x00\x00").unwrap();

    let client = signed_in_client(&server, "tok");
    let response = client.upload_avatar(&image).await.unwrap();
    assert_eq!(response.avatar_url, "/static/avatars/u1.bmp");
}

#[tokio::test]
async fn test_avatar_upload_rejects_non_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/profile/avatar"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let temp = tempfile::TempDir::new().unwrap();
    let notes = temp.path().join("notes.txt");
    std::fs::write(&notes, "not a picture").unwrap();

    let client = signed_in_client(&server, "tok");
    let error = client.upload_avatar(&notes).await.unwrap_err();
    assert_eq!(error.category(), tally_core::ErrorCategory::UserInput);
}
