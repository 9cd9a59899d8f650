//! Retro terminal web UI for Moodlog
//!
//! Serves the single-page journal: a sidebar stressometer, four input tabs
//! (daily log, voice phone, scrapbook, face mirror) and a result card for the
//! last classified entry. Each browser gets its own stress score through the
//! `moodlog_session` cookie.

#![warn(clippy::all)]

mod handlers;
mod logs;
mod render;
mod session;

pub use handlers::{ApiError, StressResponse, TextInput, TextLogResponse};
pub use logs::scrub_message;
pub use render::{Banner, BannerKind, Card, PageView, Renderer, Tab};
pub use session::{cookie_session_id, ResolvedSession, SESSION_COOKIE};

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use moodlog_core::session::DEFAULT_MAX_SESSIONS;
use moodlog_core::{Journal, ModelRegistry, MoodlogConfig, ReplyBank, Result, SessionStore};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone)]
pub struct WebUiConfig {
    pub host: String,
    pub port: u16,
    /// Expose `/logs` and the in-page log tail
    pub logs_enabled: bool,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
    /// Sessions kept before the least recently written is dropped
    pub max_sessions: usize,
}

impl Default for WebUiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8501,
            logs_enabled: false,
            max_upload_bytes: 25 * 1024 * 1024,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl From<&MoodlogConfig> for WebUiConfig {
    fn from(config: &MoodlogConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            logs_enabled: config.logs_enabled,
            max_upload_bytes: config.max_upload_bytes(),
            max_sessions: config.max_sessions,
        }
    }
}

#[derive(Clone)]
pub struct WebUiServer {
    pub config: Arc<WebUiConfig>,
    pub registry: Arc<ModelRegistry>,
    pub replies: Arc<ReplyBank>,
    pub sessions: SessionStore,
    renderer: Arc<Renderer>,
}

impl WebUiServer {
    pub fn new(config: WebUiConfig, registry: ModelRegistry, replies: ReplyBank) -> Result<Self> {
        Ok(Self {
            sessions: SessionStore::with_capacity(config.max_sessions),
            config: Arc::new(config),
            registry: Arc::new(registry),
            replies: Arc::new(replies),
            renderer: Arc::new(Renderer::new()?),
        })
    }

    /// Journal over the shared registry and reply bank
    pub fn journal(&self) -> Journal<'_> {
        Journal::new(&self.registry, &self.replies)
    }

    pub fn router(&self) -> Router {
        let limit = self.config.max_upload_bytes;
        let mut r = Router::new()
            .route("/", get(handlers::index))
            .route("/log/text", post(handlers::log_text))
            .route("/log/voice", post(handlers::log_voice))
            .route("/log/document", post(handlers::log_document))
            .route("/log/face", post(handlers::log_face))
            .route("/api/stress", get(handlers::api_stress))
            .route("/api/log/text", post(handlers::api_log_text))
            .route("/health", get(handlers::health));
        if self.config.logs_enabled {
            r = r.route("/logs", get(logs::logs_sse));
        }
        r.with_state(self.clone())
            .layer(DefaultBodyLimit::max(limit))
            .layer(RequestBodyLimitLayer::new(limit))
            .layer(TraceLayer::new_for_http())
    }

    /// Bind and serve until Ctrl-C
    pub async fn start(&self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("✓ Moodlog terminal listening on http://{}", addr);
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down");
            })
            .await?;
        Ok(())
    }
}
