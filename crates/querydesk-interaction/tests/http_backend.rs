use querydesk_core::backend::{BackendError, QueryBackend};
use querydesk_interaction::HttpQueryBackend;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> HttpQueryBackend {
    HttpQueryBackend::new(server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn query_posts_question_and_decodes_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_json(json!({"question": "total sales by region"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sql_query": "SELECT region, SUM(amount) AS total FROM sales GROUP BY region",
            "result": [{"region": "north", "total": 12}, {"region": "south", "total": 7}],
            "columns": ["region", "total"],
            "is_plotable": true,
            "chart_insight": "North leads\nSouth trails"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = backend(&server).query("total sales by region").await.unwrap();

    assert_eq!(response.result.len(), 2);
    assert_eq!(response.columns, Some(vec!["region".to_string(), "total".to_string()]));
    assert!(response.is_plotable);
    assert_eq!(response.chart_insight.as_deref(), Some("North leads\nSouth trails"));
}

#[tokio::test]
async fn query_maps_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = backend(&server).query("anything").await.unwrap_err();

    assert_eq!(
        err,
        BackendError::Status {
            status: 500,
            body: "boom".into()
        }
    );
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn query_maps_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rows": []})))
        .mount(&server)
        .await;

    let err = backend(&server).query("anything").await.unwrap_err();
    assert!(matches!(err, BackendError::Decode(_)));
}

#[tokio::test]
async fn query_unreachable_backend_is_transport_error() {
    // Reserve a free port, then release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client =
        HttpQueryBackend::new(format!("http://127.0.0.1:{}", port), Duration::from_secs(2))
            .unwrap();
    let err = client.query("anything").await.unwrap_err();
    assert!(matches!(err, BackendError::Transport(_)));
}

#[tokio::test]
async fn login_accepts_valid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "admin", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    assert!(backend(&server).login("admin", "secret").await.unwrap());
}

#[tokio::test]
async fn login_unauthorized_is_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid username or password"})),
        )
        .mount(&server)
        .await;

    assert!(!backend(&server).login("admin", "wrong").await.unwrap());
}

#[tokio::test]
async fn login_server_error_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = backend(&server).login("admin", "secret").await.unwrap_err();
    assert!(matches!(err, BackendError::Status { status: 503, .. }));
}
