//! Logging utilities

use once_cell::sync::OnceCell;
use serde::Serialize;
use tokio::sync::broadcast;
use std::fmt;
use tracing::{debug, info, warn};
use uuid::Uuid;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// A log record mirrored to `/logs` subscribers
#[derive(Clone, Debug, Serialize)]
pub struct LogEvent {
    pub level: String,
    pub target: String,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub time: String,
}

static LOG_TX: OnceCell<broadcast::Sender<LogEvent>> = OnceCell::new();

/// Subscribe to the live log feed; `None` until `init_logging` ran
pub fn subscribe_logs() -> Option<broadcast::Receiver<LogEvent>> {
    LOG_TX.get().map(|tx| tx.subscribe())
}

struct BroadcastLayer {
    tx: broadcast::Sender<LogEvent>,
}

impl<S> Layer<S> for BroadcastLayer
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        use tracing::field::{Field, Visit};
        struct MsgVisitor {
            msg: String,
        }
        impl Visit for MsgVisitor {
            fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.msg = format!("{:?}", value);
                }
            }
            fn record_str(&mut self, field: &Field, value: &str) {
                if field.name() == "message" {
                    self.msg = value.to_string();
                }
            }
        }
        let mut visitor = MsgVisitor { msg: String::new() };
        event.record(&mut visitor);
        let meta = event.metadata();
        let ev = LogEvent {
            level: meta.level().to_string(),
            target: meta.target().to_string(),
            message: visitor.msg,
            file: meta.file().map(|s| s.to_string()),
            line: meta.line(),
            time: chrono::Utc::now().to_rfc3339(),
        };
        // No subscribers is fine.
        let _ = self.tx.send(ev);
    }
}

/// Structured events of the journal flow, tagged with a namespace
#[derive(Clone)]
pub struct Logger {
    namespace: String,
}

impl Logger {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// A classified entry moved the session's stress score
    pub fn entry(&self, session: Uuid, modality: &str, emotion: &str, previous: f64, score: f64) {
        info!(
            ns = %self.namespace,
            %session,
            modality,
            emotion,
            "{} classified as {} (stress {:.1} -> {:.1})",
            modality,
            emotion,
            previous,
            score
        );
    }

    /// Input was accepted but carried nothing to classify
    pub fn skipped(&self, session: Uuid, modality: &str, reason: &str) {
        debug!(ns = %self.namespace, %session, modality, "{} skipped: {}", modality, reason);
    }

    /// Classification failed; the session's score is left alone
    pub fn failed(&self, session: Uuid, modality: &str, err: &dyn fmt::Display) {
        warn!(ns = %self.namespace, %session, modality, "{} log failed: {}", modality, err);
    }

    /// Text pulled out of an uploaded document
    pub fn extracted(&self, file: &str, chars: usize) {
        debug!(ns = %self.namespace, file, chars, "Extracted {} chars from {}", chars, file);
    }
}

/// Initialize the global logging system
///
/// Filter precedence: `RUST_LOG`, then `MOODLOG_LOG_LEVEL`, then `info`.
pub fn init_logging() {
    let level = std::env::var("MOODLOG_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into());

    let tx = LOG_TX
        .get_or_init(|| {
            let (tx, _rx) = broadcast::channel(1024);
            tx
        })
        .clone();

    // try_init: a second call (tests, embedding hosts) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(BroadcastLayer { tx })
        .try_init();
}
