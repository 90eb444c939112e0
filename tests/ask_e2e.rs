use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use base64::Engine;
use http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use koolbox_service::{
    build_app,
    deck::Deck,
    genai::{GeminiClient, GeminiConfig},
    selector::RandomSelector,
    AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

const FOOL_DECK: &str = r#"{"1": {"title": "The Fool", "content": "New beginnings."}}"#;
const IMAGE_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

#[derive(Clone)]
struct MockGemini {
    calls: Arc<Mutex<Vec<(String, String)>>>,
    api_keys: Arc<Mutex<Vec<String>>>,
    text_reply: Option<String>,
    image_reply: Option<String>,
}

impl MockGemini {
    fn new(text_reply: Option<&str>, image_reply: Option<&str>) -> Self {
        Self {
            calls: Arc::default(),
            api_keys: Arc::default(),
            text_reply: text_reply.map(str::to_string),
            image_reply: image_reply.map(str::to_string),
        }
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

async fn generate_content(
    State(mock): State<MockGemini>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let model = call.trim_end_matches(":generateContent").to_string();
    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    mock.calls.lock().unwrap().push((model.clone(), prompt));
    if let Some(key) = headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) {
        mock.api_keys.lock().unwrap().push(key.to_string());
    }

    if model == "text-model" {
        return match &mock.text_reply {
            Some(text) => Json(json!({
                "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
            }))
            .into_response(),
            None => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": { "message": "backend exploded" } })),
            )
                .into_response(),
        };
    }

    let parts = match &mock.image_reply {
        Some(data) => json!([
            { "text": "Here is your picture." },
            { "inlineData": { "mimeType": "image/png", "data": data } }
        ]),
        None => json!([{ "text": "I cannot draw that." }]),
    };
    Json(json!({ "candidates": [{ "content": { "role": "model", "parts": parts } }] })).into_response()
}

async fn spawn_mock_gemini_server(mock: MockGemini) -> String {
    let app = Router::new()
        .route("/v1beta/models/{call}", post(generate_content))
        .with_state(mock);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn build_test_app(base_url: &str) -> Router {
    let gemini = Arc::new(GeminiClient::new(GeminiConfig {
        base_url: base_url.to_string(),
        api_key: "test-key".to_string(),
        text_model: "text-model".to_string(),
        image_model: "image-model".to_string(),
        timeout_ms: 5_000,
    }));

    build_app(
        Arc::new(AppState {
            deck: Deck::from_json_str(FOOL_DECK).unwrap(),
            selector: Arc::new(RandomSelector::seeded(1)),
            text_model: gemini.clone(),
            image_model: gemini,
        }),
        None,
    )
}

fn ask_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/ask")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn e2e_post_ask_success_path_returns_card_answer_and_image() {
    let mock = MockGemini::new(
        Some("Takeaway: Every start is a leap.\nAnswer to question: Try something new today."),
        Some(IMAGE_B64),
    );
    let base_url = spawn_mock_gemini_server(mock.clone()).await;
    let app = build_test_app(&base_url);

    let response = app
        .oneshot(ask_request(r#"{"question":"What should I do today?"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body["card"],
        json!({ "title": "The Fool", "content": "New beginnings." })
    );
    assert_eq!(body["takeaway"], "Every start is a leap.");
    assert_eq!(body["answer"], "Try something new today.");
    let image = body["image"].as_str().expect("image should be present");
    assert!(base64::engine::general_purpose::STANDARD.decode(image).is_ok());
    assert_eq!(body["image_mime_type"], "image/png");

    let calls = mock.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "text-model");
    assert!(calls[0].1.starts_with("The Fool\nNew beginnings.\n"));
    assert!(calls[0].1.ends_with("Answer to question: What should I do today?"));
    assert_eq!(calls[1].0, "image-model");
    assert_eq!(
        calls[1].1,
        "Create a visual representation of the following concept: Try something new today."
    );
    assert_eq!(*mock.api_keys.lock().unwrap(), vec!["test-key", "test-key"]);
}

#[tokio::test]
async fn e2e_missing_image_returns_null() {
    let mock = MockGemini::new(Some("Takeaway: a\nAnswer to question: b"), None);
    let base_url = spawn_mock_gemini_server(mock.clone()).await;
    let app = build_test_app(&base_url);

    let response = app
        .oneshot(ask_request(r#"{"question":"anything"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["image"], Value::Null);
    assert_eq!(body["image_mime_type"], Value::Null);
    assert_eq!(mock.calls().len(), 2);
}

#[tokio::test]
async fn e2e_unformatted_reply_fills_both_fields() {
    let mock = MockGemini::new(Some("  Just some text  "), Some(IMAGE_B64));
    let base_url = spawn_mock_gemini_server(mock.clone()).await;
    let app = build_test_app(&base_url);

    let response = app
        .oneshot(ask_request(r#"{"question":"anything"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["takeaway"], "Just some text");
    assert_eq!(body["answer"], "Just some text");
}

#[tokio::test]
async fn e2e_text_model_failure_returns_500_without_image_call() {
    let mock = MockGemini::new(None, Some(IMAGE_B64));
    let base_url = spawn_mock_gemini_server(mock.clone()).await;
    let app = build_test_app(&base_url);

    let response = app
        .oneshot(ask_request(r#"{"question":"anything"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    let error = body["error"].as_str().expect("error message");
    assert!(error.contains("text-model"), "unexpected error: {error}");

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "text-model");
}

#[tokio::test]
async fn e2e_unreachable_backend_returns_500() {
    let app = build_test_app("http://127.0.0.1:1");

    let response = app
        .oneshot(ask_request(r#"{"question":"anything"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn e2e_client_errors_make_no_model_calls() {
    let mock = MockGemini::new(Some("unused"), None);
    let base_url = spawn_mock_gemini_server(mock.clone()).await;

    for body in [
        r#"{"question":""}"#,
        r#"{"question":"   \n\t"}"#,
        r#"{}"#,
        r#"{"question":42}"#,
        r#"{"question":"#,
        "not json at all",
    ] {
        let response = build_test_app(&base_url)
            .oneshot(ask_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert!(json_body(response).await["error"].is_string());
    }

    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn e2e_body_without_json_content_type_is_bad_request() {
    let app = build_test_app("http://127.0.0.1:1");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/ask")
        .body(Body::from(r#"{"question":"hi"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn e2e_non_post_methods_return_405_with_allow_header() {
    let mock = MockGemini::new(Some("unused"), None);
    let base_url = spawn_mock_gemini_server(mock.clone()).await;

    for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH] {
        let request = Request::builder()
            .method(method.clone())
            .uri("/ask")
            .body(Body::empty())
            .unwrap();
        let response = build_test_app(&base_url).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(response.headers()[header::ALLOW], "POST");
    }

    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn e2e_health_reports_ok() {
    let app = build_test_app("http://127.0.0.1:1");

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn e2e_404_fallback_path_returns_not_found() {
    let app = build_test_app("http://127.0.0.1:1");

    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "Not found");
}
