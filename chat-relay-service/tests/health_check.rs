use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chat_relay_service::config::{GoogleConfig, RelayConfig, DEFAULT_GEMINI_API_BASE};
use chat_relay_service::services::providers::mock::MockTextProvider;
use chat_relay_service::services::providers::TextProvider;
use chat_relay_service::services::AiGateway;
use chat_relay_service::startup::{build_gateway, build_router, AppState, Application};
use http_body_util::BodyExt;
use secrecy::SecretString;
use std::sync::Arc;
use tower::util::ServiceExt;

async fn get(app: axum::Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn health_check_reports_gateway_state() {
    let gateway = AiGateway::new(Some(
        Arc::new(MockTextProvider::replying("hi")) as Arc<dyn TextProvider>
    ));
    let response = get(build_router(AppState::new(gateway)), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "chat-relay-service");
    assert_eq!(body["ai_configured"], true);

    let response = get(build_router(AppState::new(AiGateway::disabled())), "/health").await;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["ai_configured"], false);
}

#[tokio::test]
async fn metrics_endpoint_works_without_recorder() {
    let response = get(build_router(AppState::new(AiGateway::disabled())), "/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).starts_with('#'));
}

#[tokio::test]
async fn unknown_route_returns_json_404() {
    let response = get(build_router(AppState::new(AiGateway::disabled())), "/nope").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Not found: /nope");
}

#[test]
fn gateway_is_disabled_without_credential() {
    assert!(!build_gateway(&RelayConfig::default()).is_configured());
}

#[test]
fn gateway_is_enabled_with_credential() {
    let config = RelayConfig {
        google: GoogleConfig {
            api_key: Some(SecretString::new("test-api-key".to_string())),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
        },
        ..RelayConfig::default()
    };

    assert!(build_gateway(&config).is_configured());
}

#[tokio::test]
async fn application_serves_over_tcp() {
    let mut config = RelayConfig::default();
    config.common.port = 0;

    let app = Application::build(config, None)
        .await
        .expect("Failed to build application");
    let port = app.port();
    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    let response = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{}/chat", port))
        .body(r#"{"data":{"user-message":"hello"}}"#)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["response"],
        "Error: AI service is not configured or unavailable."
    );
}
