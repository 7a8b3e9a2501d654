//! Integration tests for the chat relay endpoint.
//!
//! The router is driven in-process with a mock text provider, so no network
//! access or API key is needed.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use axum::routing::any;
use chat_relay_service::handlers::{chat, INVALID_INPUT_MESSAGE};
use chat_relay_service::services::providers::mock::MockTextProvider;
use chat_relay_service::services::providers::{FinishReason, ProviderError, TextProvider};
use chat_relay_service::services::AiGateway;
use chat_relay_service::startup::{build_router, AppState, CHAT_PATH, LEGACY_CHAT_PATH};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

fn app_with(provider: MockTextProvider) -> (Router, Arc<MockTextProvider>) {
    let provider = Arc::new(provider);
    let gateway = AiGateway::new(Some(provider.clone() as Arc<dyn TextProvider>));
    (build_router(AppState::new(gateway)), provider)
}

fn chat_request(method: Method, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(CHAT_PATH)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap()
}

fn post_json(body: Value) -> Request<Body> {
    chat_request(Method::POST, Body::from(body.to_string()))
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn assert_relay_headers(response: &Response) {
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn post_with_message_returns_ai_text() {
    let (app, provider) = app_with(MockTextProvider::replying("We open at 9am."));

    let response = app
        .oneshot(post_json(
            json!({ "data": { "user-message": "  When do you open?  ", "email": "x@y.z" } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_relay_headers(&response);
    assert_eq!(
        body_json(response).await,
        json!({ "response": "We open at 9am." })
    );
    assert_eq!(provider.calls(), 1);
    assert_eq!(provider.last_prompt().as_deref(), Some("When do you open?"));
}

#[tokio::test]
async fn non_post_methods_are_rejected_with_allow_header() {
    for method in [
        Method::GET,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
        Method::OPTIONS,
    ] {
        let (app, provider) = app_with(MockTextProvider::replying("unused"));

        let response = app
            .oneshot(chat_request(method.clone(), Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{}", method);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
        assert_relay_headers(&response);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Method Not Allowed" })
        );
        assert_eq!(provider.calls(), 0);
    }
}

#[tokio::test]
async fn missing_or_blank_message_is_bad_request() {
    for body in [
        json!({}),
        json!({ "data": {} }),
        json!({ "data": { "user-message": "" } }),
        json!({ "data": { "user-message": "   " } }),
        json!({ "data": { "user-message": 7 } }),
    ] {
        let (app, provider) = app_with(MockTextProvider::replying("unused"));

        let response = app.oneshot(post_json(body.clone())).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        assert_relay_headers(&response);
        assert_eq!(
            body_json(response).await,
            json!({ "error": INVALID_INPUT_MESSAGE })
        );
        assert_eq!(provider.calls(), 0);
    }
}

#[tokio::test]
async fn empty_body_is_treated_as_empty_object() {
    let (app, _) = app_with(MockTextProvider::replying("unused"));

    let response = app
        .oneshot(chat_request(Method::POST, Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Invalid input: 'user-message' not found or empty in request body.data"
    );
}

#[tokio::test]
async fn malformed_json_is_internal_server_error_with_details() {
    let (app, provider) = app_with(MockTextProvider::replying("unused"));

    let response = app
        .oneshot(chat_request(Method::POST, Body::from("{\"data\": {")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_relay_headers(&response);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Internal Server Error");
    assert!(body["details"].as_str().is_some_and(|d| !d.is_empty()));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn disabled_gateway_still_answers_200() {
    let app = build_router(AppState::new(AiGateway::disabled()));

    let response = app
        .oneshot(post_json(json!({ "data": { "user-message": "hello" } })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "response": "Error: AI service is not configured or unavailable." })
    );
}

#[tokio::test]
async fn provider_failure_is_reported_as_200_reply() {
    let (app, _) = app_with(MockTextProvider::failing(ProviderError::ApiError {
        status: 429,
        message: "Resource has been exhausted".to_string(),
    }));

    let response = app
        .oneshot(post_json(json!({ "data": { "user-message": "hello" } })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let text = body_json(response).await["response"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(text.starts_with("Error:"));
    assert!(text.contains("Resource has been exhausted"));
    assert!(text.contains("(Status: 429)"));
}

#[tokio::test]
async fn blocked_reply_is_reported_as_200_reply() {
    let (app, _) = app_with(MockTextProvider::finishing(
        "",
        Some(FinishReason::Safety),
    ));

    let response = app
        .oneshot(post_json(json!({ "data": { "user-message": "hello" } })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "response": "AI response blocked due to: SAFETY." })
    );
}

#[tokio::test]
async fn legacy_function_path_is_served() {
    let (app, _) = app_with(MockTextProvider::replying("hi"));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(LEGACY_CHAT_PATH)
                .body(Body::from(r#"{"data":{"user-message":"hello"}}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "response": "hi" }));
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let (app, _) = app_with(MockTextProvider::replying("hi"));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(CHAT_PATH)
                .header("x-request-id", "req-42")
                .body(Body::from(r#"{"data":{"user-message":"hello"}}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-42");
}

#[tokio::test]
async fn handler_serves_without_request_id_layer() {
    let provider = Arc::new(MockTextProvider::replying("hi"));
    let gateway = AiGateway::new(Some(provider.clone() as Arc<dyn TextProvider>));
    let app = Router::new()
        .route(CHAT_PATH, any(chat))
        .with_state(AppState::new(gateway));

    let response = app
        .oneshot(post_json(json!({ "data": { "user-message": "hello" } })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("x-request-id").is_none());
    assert_eq!(body_json(response).await, json!({ "response": "hi" }));
    assert_eq!(provider.calls(), 1);
}
