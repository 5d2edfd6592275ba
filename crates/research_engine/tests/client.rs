use std::time::Duration;

use pretty_assertions::assert_eq;
use research_engine::{
    ApiConfig, ClientSettings, FailureKind, ReqwestResearchClient, ResearchClient,
    ResearchResponse,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, settings: ClientSettings) -> ReqwestResearchClient {
    let config = ApiConfig::new(&server.uri()).expect("mock server uri is valid");
    ReqwestResearchClient::new(config, settings).expect("client builds")
}

#[tokio::test]
async fn research_posts_query_and_parses_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/research"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "query": "quantum computing" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "topic": "quantum computing",
            "summary": "1. Overview\n   - qubits",
            "sources": ["a", "b"],
            "tools_used": ["wikipedia", "search"],
            "elapsed_ms": 1234
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, ClientSettings::default());
    let response = client.research("quantum computing").await.expect("research ok");

    assert_eq!(
        response,
        ResearchResponse {
            topic: "quantum computing".to_string(),
            summary: "1. Overview\n   - qubits".to_string(),
            sources: vec!["a".to_string(), "b".to_string()],
            tools_used: vec!["wikipedia".to_string(), "search".to_string()],
        }
    );
}

#[tokio::test]
async fn failure_status_carries_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/research"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({ "error": "rate limited" })))
        .mount(&server)
        .await;

    let client = client_for(&server, ClientSettings::default());
    let err = client.research("blockchain").await.unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(429));
    assert_eq!(err.server_error.as_deref(), Some("rate limited"));
}

#[tokio::test]
async fn failure_without_body_has_no_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/research"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server, ClientSettings::default());
    let err = client.research("blockchain").await.unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert_eq!(err.server_error, None);
}

#[tokio::test]
async fn failure_with_non_json_body_has_no_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/research"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, ClientSettings::default());
    let err = client.research("blockchain").await.unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(502));
    assert_eq!(err.server_error, None);
}

#[tokio::test]
async fn success_status_with_wrong_shape_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/research"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "topic": "blockchain",
            "summary": "missing lists"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, ClientSettings::default());
    let err = client.research("blockchain").await.unwrap_err();

    assert_eq!(err.kind, FailureKind::MalformedResponse);
    assert_eq!(err.server_error, None);
}

#[tokio::test]
async fn sources_must_be_strings() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/research"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "topic": "blockchain",
            "summary": "s",
            "sources": [1, 2],
            "tools_used": []
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, ClientSettings::default());
    let err = client.research("blockchain").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::MalformedResponse);
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/research"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({})),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    };
    let client = client_for(&server, settings);

    let err = client.research("slow topic").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/research"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Length", "11")
                .set_body_string("01234567890"),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        max_bytes: 10,
        ..ClientSettings::default()
    };
    let client = client_for(&server, settings);

    let err = client.research("large topic").await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let config = ApiConfig::new(&uri).unwrap();
    let client = ReqwestResearchClient::new(config, ClientSettings::default()).unwrap();

    let err = client.research("offline").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
    assert_eq!(err.server_error, None);
}

#[tokio::test]
async fn health_reports_status_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "message": "API is running"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, ClientSettings::default());
    let health = client.health().await.expect("health ok");

    assert!(health.is_healthy());
    assert_eq!(health.message.as_deref(), Some("API is running"));
}

#[tokio::test]
async fn health_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server, ClientSettings::default());
    let err = client.health().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}
