//! End-to-end tests for the web routes
//!
//! - GET / and tab selection
//! - POST /log/{text,voice,document,face}
//! - GET /api/stress, POST /api/log/text
//! - GET /health, /logs gating

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use moodlog_adaptor_web::{WebUiConfig, WebUiServer};
use moodlog_core::testing::{stub_registry, FailingTextClassifier, FixedFaceAnalyzer};
use moodlog_core::{ModelRegistry, ReplyBank};
use std::sync::Arc;
use tower::util::ServiceExt;

// ============================================================================
// Test Setup
// ============================================================================

const BOUNDARY: &str = "moodlogboundary";

fn replies() -> ReplyBank {
    ReplyBank::from_json(
        r#"{"neutral": ["System stable."], "anger": ["Cooling fans engaged."], "joy": ["Bright signal."]}"#,
    )
    .unwrap()
}

fn server_with(registry: ModelRegistry, logs_enabled: bool) -> WebUiServer {
    let config = WebUiConfig {
        logs_enabled,
        ..Default::default()
    };
    WebUiServer::new(config, registry, replies()).unwrap()
}

fn router(label: &str) -> Router {
    server_with(stub_registry(label), false).router()
}

async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn session_cookie(response: &Response) -> String {
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

fn text_form(text: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/log/text")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let encoded = text.replace(' ', "+");
    builder.body(Body::from(format!("text={}", encoded))).unwrap()
}

fn multipart(uri: &str, field: &str, file_name: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{f}\"; filename=\"{n}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            b = BOUNDARY,
            f = field,
            n = file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn wav(sample_rate: u32, samples: &[i16]) -> Vec<u8> {
    let mut out = Vec::new();
    let data_len = (samples.len() * 2) as u32;
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVEfmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

// ============================================================================
// Page Tests
// ============================================================================

#[tokio::test]
async fn test_index_sets_session_cookie() {
    let response = router("neutral")
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).starts_with("moodlog_session="));
    let html = body_string(response).await;
    assert!(html.contains("STRESSOMETER"));
    assert!(html.contains("LVL: 5.0"));
    assert!(html.contains("NEW ENTRY"));
}

#[tokio::test]
async fn test_tab_query_selects_form() {
    let response = router("neutral")
        .oneshot(
            Request::builder()
                .uri("/?tab=mirror")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let html = body_string(response).await;
    assert!(html.contains("REFLECTION"));
    assert!(html.contains("name=\"snapshot\""));
    assert!(!html.contains("NEW ENTRY"));
}

#[tokio::test]
async fn test_text_entry_renders_card_with_previous_color() {
    let app = router("anger");

    let response = app.clone().oneshot(text_form("I am furious", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    let html = body_string(response).await;

    assert!(html.contains("&gt; TEXT LOG"));
    assert!(html.contains("ANGER"));
    assert!(html.contains("\"Cooling fans engaged.\""));
    // card drawn with the pre-update (5.0, OKAY) color
    assert!(html.contains("border-left-color: #ffffff"));
    // sidebar shows the new score
    assert!(html.contains("LVL: 6.4"));

    // second entry on the same session keeps climbing
    let response = app.oneshot(text_form("still furious", Some(&cookie))).await.unwrap();
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let html = body_string(response).await;
    assert!(html.contains("LVL: 7.3"));
    assert!(html.contains("border-left-color: #ffffff"));
}

#[tokio::test]
async fn test_blank_text_renders_no_card() {
    let response = router("anger").oneshot(text_form("   ", None)).await.unwrap();
    let html = body_string(response).await;
    assert!(!html.contains("log-card"));
    assert!(html.contains("LVL: 5.0"));
}

#[tokio::test]
async fn test_text_failure_shows_signal_lost() {
    let stub = stub_registry("anger");
    let registry = ModelRegistry::new(
        Arc::new(FailingTextClassifier),
        stub.audio.clone(),
        stub.documents.clone(),
        stub.face.clone(),
    );
    let app = server_with(registry, false).router();
    let response = app.oneshot(text_form("hello", None)).await.unwrap();
    let html = body_string(response).await;
    assert!(html.contains("banner banner-error"));
    assert!(html.contains("SIGNAL LOST: Model error: model offline"));
    assert!(html.contains("LVL: 5.0"));
}

#[tokio::test]
async fn test_voice_upload() {
    let clip = wav(8_000, &[1200i16; 800]);
    let response = router("sadness")
        .oneshot(multipart("/log/voice", "audio", "memo.wav", &clip))
        .await
        .unwrap();
    let html = body_string(response).await;
    assert!(html.contains("&gt; VOICE MESSAGE"));
    assert!(html.contains("SADNESS"));
    assert!(html.contains("LVL: 5.6"));
}

#[tokio::test]
async fn test_bad_voice_shows_static() {
    let response = router("sadness")
        .oneshot(multipart("/log/voice", "audio", "memo.wav", b"garbage bytes"))
        .await
        .unwrap();
    let html = body_string(response).await;
    assert!(html.contains("STATIC INTERFERENCE: "));
    assert!(!html.contains("log-card"));
}

#[tokio::test]
async fn test_overlong_voice_shows_static() {
    // 1000 samples declared at 1 Hz is over a quarter hour of audio
    let server = server_with(stub_registry("sadness"), false);
    let response = server
        .router()
        .oneshot(multipart("/log/voice", "audio", "memo.wav", &wav(1, &[0i16; 1000])))
        .await
        .unwrap();
    let html = body_string(response).await;
    assert!(html.contains("STATIC INTERFERENCE: "));
    assert!(!html.contains("log-card"));
    assert!(server.sessions.is_empty());
}

#[tokio::test]
async fn test_document_upload() {
    let response = router("joy")
        .oneshot(multipart("/log/document", "file", "page.png", &[0x89, 0x50, 0x4e, 0x47]))
        .await
        .unwrap();
    let html = body_string(response).await;
    assert!(html.contains("&gt; FILE CONTENT"));
    assert!(html.contains("\"Bright signal.\""));
}

#[tokio::test]
async fn test_unsupported_document_type() {
    let response = router("joy")
        .oneshot(multipart("/log/document", "file", "notes.docx", b"PK"))
        .await
        .unwrap();
    let html = body_string(response).await;
    assert!(html.contains("SIGNAL LOST: Validation error: unsupported file type"));
}

#[tokio::test]
async fn test_face_scan_without_face_warns() {
    let stub = stub_registry("joy");
    let registry = ModelRegistry::new(
        stub.text.clone(),
        stub.audio.clone(),
        stub.documents.clone(),
        Arc::new(FixedFaceAnalyzer { label: None }),
    );
    let app = server_with(registry, false).router();
    let response = app
        .oneshot(multipart("/log/face", "snapshot", "cam.jpg", &[0xff, 0xd8, 0xff]))
        .await
        .unwrap();
    let html = body_string(response).await;
    assert!(html.contains("banner banner-warning"));
    assert!(html.contains("NO FACE DETECTED"));
    assert!(html.contains("LVL: 5.0"));
}

#[tokio::test]
async fn test_face_scan() {
    let response = router("happy")
        .oneshot(multipart("/log/face", "snapshot", "cam.jpg", &[0xff, 0xd8, 0xff]))
        .await
        .unwrap();
    let html = body_string(response).await;
    assert!(html.contains("&gt; VISUAL SCAN"));
    assert!(html.contains("HAPPY"));
    assert!(html.contains("LVL: 4.1"));
}

// ============================================================================
// JSON API Tests
// ============================================================================

#[tokio::test]
async fn test_api_flow() {
    let app = router("anger");

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/api/stress").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let cookie = session_cookie(&response);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["indicator"]["score"], 5.0);
    assert_eq!(body["indicator"]["label"], "OKAY");
    assert_eq!(body["shake"], false);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/log/text")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::COOKIE, &cookie)
                .body(Body::from(r#"{"text":"grr"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["entry"]["emotion"], "anger");
    assert_eq!(body["entry"]["modality"], "text");
    assert_eq!(body["entry"]["score"], 6.4);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/stress")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["indicator"]["score"], 6.4);
}

#[tokio::test]
async fn test_api_upstream_failure() {
    let stub = stub_registry("anger");
    let registry = ModelRegistry::new(
        Arc::new(FailingTextClassifier),
        stub.audio.clone(),
        stub.documents.clone(),
        stub.face.clone(),
    );
    let server = server_with(registry, false);
    let response = server
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/log/text")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"text":"hello"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    // the client still learns its session id, and nothing is stored for it
    assert!(session_cookie(&response).starts_with("moodlog_session="));
    assert!(server.sessions.is_empty());
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_cookieless_reads_store_nothing() {
    let server = server_with(stub_registry("anger"), false);
    let app = server.router();
    for _ in 0..200 {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/stress").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    for _ in 0..50 {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    assert!(server.sessions.is_empty());

    app.oneshot(text_form("furious", None)).await.unwrap();
    assert_eq!(server.sessions.len(), 1);
}

#[tokio::test]
async fn test_session_count_is_capped() {
    let config = WebUiConfig {
        max_sessions: 3,
        ..Default::default()
    };
    let server = WebUiServer::new(config, stub_registry("joy"), replies()).unwrap();
    let app = server.router();
    for _ in 0..10 {
        let response = app.clone().oneshot(text_form("sunny", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    assert_eq!(server.sessions.len(), 3);
}

#[tokio::test]
async fn test_health() {
    let response = router("joy")
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["replies"], 3);
}

#[tokio::test]
async fn test_logs_route_gated() {
    let response = router("joy")
        .oneshot(Request::builder().uri("/logs").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = server_with(stub_registry("joy"), true)
        .router()
        .oneshot(Request::builder().uri("/logs").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "text/event-stream"
    );
}
