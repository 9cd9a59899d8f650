//! Route handlers

use crate::render::{Banner, Card, PageView, Tab};
use crate::session::ResolvedSession;
use crate::WebUiServer;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use moodlog_core::{Document, LogEntry, MoodlogError, SessionState, StressIndicator, Uuid};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// API error types
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Upstream(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "success": false,
            "error": message,
            "code": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl From<MoodlogError> for ApiError {
    fn from(err: MoodlogError) -> Self {
        match err {
            MoodlogError::Validation(_) | MoodlogError::Audio(_) | MoodlogError::Document(_) => {
                ApiError::BadRequest(err.to_string())
            }
            MoodlogError::Model(_) | MoodlogError::Network(_) | MoodlogError::NoFaceDetected => {
                ApiError::Upstream(err.to_string())
            }
            _ => {
                error!("MoodlogError: {}", err);
                ApiError::Internal(err.to_string())
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TabQuery {
    pub tab: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TextInput {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct StressResponse {
    pub session: Uuid,
    pub indicator: StressIndicator,
    pub shake: bool,
}

#[derive(Debug, Serialize)]
pub struct TextLogResponse {
    pub success: bool,
    pub entry: Option<LogEntry>,
    pub indicator: StressIndicator,
}

/// Uploaded multipart file
struct Upload {
    file_name: Option<String>,
    bytes: Vec<u8>,
}

/// Find `field` in a multipart body; empty uploads count as absent
async fn read_upload(
    multipart: &mut Multipart,
    field: &str,
) -> std::result::Result<Option<Upload>, MultipartError> {
    while let Some(part) = multipart.next_field().await? {
        if part.name() != Some(field) {
            continue;
        }
        let file_name = part.file_name().map(|s| s.to_string());
        let bytes = part.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }
        return Ok(Some(Upload {
            file_name,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

impl WebUiServer {
    fn session_state(&self, id: Uuid) -> SessionState {
        self.sessions.snapshot_or_default(id)
    }

    fn page(
        &self,
        session: ResolvedSession,
        tab: Tab,
        card: Option<Card>,
        banner: Option<Banner>,
    ) -> std::result::Result<Response, ApiError> {
        let state = self.session_state(session.id);
        let mut view = PageView::new(tab, state.stress.indicator())
            .with_card(card)
            .with_banner(banner);
        view.logs_enabled = self.config.logs_enabled;
        let html = self.renderer.page(&view)?;
        Ok(session.apply(Html(html).into_response()))
    }
}

/// Card or banner for a finished journal call
fn outcome(
    result: moodlog_core::Result<Option<LogEntry>>,
    color: &'static str,
    on_error: impl FnOnce(&MoodlogError) -> Banner,
) -> (Option<Card>, Option<Banner>) {
    match result {
        Ok(entry) => (entry.map(|entry| Card { entry, color }), None),
        Err(e) => (None, Some(on_error(&e))),
    }
}

fn signal_lost(e: &MoodlogError) -> Banner {
    Banner::error(format!("SIGNAL LOST: {}", e))
}

fn static_interference(e: &MoodlogError) -> Banner {
    Banner::error(format!("STATIC INTERFERENCE: {}", e))
}

fn no_face(_: &MoodlogError) -> Banner {
    Banner::warning("NO FACE DETECTED")
}

/// `GET /`
pub async fn index(
    State(server): State<WebUiServer>,
    headers: HeaderMap,
    Query(query): Query<TabQuery>,
) -> std::result::Result<Response, ApiError> {
    let session = ResolvedSession::resolve(&headers, &server.sessions);
    server.page(session, Tab::from_query(query.tab.as_deref()), None, None)
}

/// `POST /log/text`
pub async fn log_text(
    State(server): State<WebUiServer>,
    headers: HeaderMap,
    Form(input): Form<TextInput>,
) -> std::result::Result<Response, ApiError> {
    let session = ResolvedSession::resolve(&headers, &server.sessions);
    let mut state = server.session_state(session.id);
    let color = state.stress.indicator().color;

    let result = server.journal().log_text(&mut state, &input.text).await;
    if matches!(result, Ok(Some(_))) {
        server.sessions.store(state);
    }

    let (card, banner) = outcome(result, color, signal_lost);
    server.page(session, Tab::Logs, card, banner)
}

/// `POST /log/voice`
pub async fn log_voice(
    State(server): State<WebUiServer>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> std::result::Result<Response, ApiError> {
    let session = ResolvedSession::resolve(&headers, &server.sessions);
    let mut state = server.session_state(session.id);
    let color = state.stress.indicator().color;

    let result = match read_upload(&mut multipart, "audio").await {
        Ok(Some(upload)) => server
            .journal()
            .log_voice(&mut state, &upload.bytes)
            .await
            .map(Some),
        Ok(None) => Ok(None),
        Err(e) => {
            warn!(session = %session.id, "Unreadable voice upload: {}", e);
            Err(MoodlogError::audio(e.body_text()))
        }
    };
    if matches!(result, Ok(Some(_))) {
        server.sessions.store(state);
    }

    let (card, banner) = outcome(result, color, static_interference);
    server.page(session, Tab::Voice, card, banner)
}

/// `POST /log/document`
pub async fn log_document(
    State(server): State<WebUiServer>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> std::result::Result<Response, ApiError> {
    let session = ResolvedSession::resolve(&headers, &server.sessions);
    let mut state = server.session_state(session.id);
    let color = state.stress.indicator().color;

    let result = match read_upload(&mut multipart, "file").await {
        Ok(Some(upload)) => {
            let document = Document::new(upload.file_name.unwrap_or_default(), upload.bytes);
            server.journal().log_document(&mut state, &document).await
        }
        Ok(None) => Ok(None),
        Err(e) => {
            warn!(session = %session.id, "Unreadable scrapbook upload: {}", e);
            Err(MoodlogError::document(e.body_text()))
        }
    };
    if matches!(result, Ok(Some(_))) {
        server.sessions.store(state);
    }

    let (card, banner) = outcome(result, color, signal_lost);
    server.page(session, Tab::Scrapbook, card, banner)
}

/// `POST /log/face`
pub async fn log_face(
    State(server): State<WebUiServer>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> std::result::Result<Response, ApiError> {
    let session = ResolvedSession::resolve(&headers, &server.sessions);
    let mut state = server.session_state(session.id);
    let color = state.stress.indicator().color;

    let result = match read_upload(&mut multipart, "snapshot").await {
        Ok(Some(upload)) => server
            .journal()
            .log_face(&mut state, &upload.bytes)
            .await
            .map(Some),
        Ok(None) => Ok(None),
        Err(e) => {
            warn!(session = %session.id, "Unreadable snapshot upload: {}", e);
            Err(MoodlogError::validation(e.body_text()))
        }
    };
    if matches!(result, Ok(Some(_))) {
        server.sessions.store(state);
    }

    let (card, banner) = outcome(result, color, no_face);
    server.page(session, Tab::Mirror, card, banner)
}

/// `GET /api/stress`
pub async fn api_stress(State(server): State<WebUiServer>, headers: HeaderMap) -> Response {
    let session = ResolvedSession::resolve(&headers, &server.sessions);
    let state = server.session_state(session.id);
    let body = StressResponse {
        session: session.id,
        indicator: state.stress.indicator(),
        shake: state.stress.is_critical_shake(),
    };
    session.apply(Json(body).into_response())
}

/// `POST /api/log/text`
pub async fn api_log_text(
    State(server): State<WebUiServer>,
    headers: HeaderMap,
    Json(input): Json<TextInput>,
) -> Response {
    let session = ResolvedSession::resolve(&headers, &server.sessions);
    let mut state = server.session_state(session.id);

    let entry = match server.journal().log_text(&mut state, &input.text).await {
        Ok(entry) => entry,
        Err(e) => return session.apply(ApiError::from(e).into_response()),
    };
    let indicator = state.stress.indicator();
    if entry.is_some() {
        server.sessions.store(state);
    }

    let body = TextLogResponse {
        success: true,
        entry,
        indicator,
    };
    session.apply(Json(body).into_response())
}

/// `GET /health`
pub async fn health(State(server): State<WebUiServer>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "sessions": server.sessions.len(),
        "models": server.registry.describe(),
        "replies": server.replies.len(),
    }))
}
