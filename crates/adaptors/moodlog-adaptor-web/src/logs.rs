//! Live log feed over server-sent events

use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::{BoxStream, StreamExt};
use moodlog_core::utils::logger::{subscribe_logs, LogEvent};
use once_cell::sync::Lazy;
use regex::Regex;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;

const MAX_MESSAGE_CHARS: usize = 2000;

static SCRUB_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"hf_[A-Za-z0-9]{20,}", "hf_REDACTED"),
        (r"(?i)bearer\s+[A-Za-z0-9._~+/=-]{12,}", "Bearer REDACTED"),
        (
            r"(?i)(api[_-]?key|token)\s*[:=]?\s*[A-Za-z0-9_-]{12,}",
            "$1=REDACTED",
        ),
        (
            r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}",
            "email@redacted",
        ),
        (r"\b\+?\d[\d\s-]{8,}\b", "PHONE_REDACTED"),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
    .collect()
});

/// Strip credentials and contact details before a message leaves the process
pub fn scrub_message(mut s: String) -> String {
    if s.chars().count() > MAX_MESSAGE_CHARS {
        s = s.chars().take(MAX_MESSAGE_CHARS).collect();
    }
    for (re, rep) in SCRUB_PATTERNS.iter() {
        s = re.replace_all(&s, *rep).into_owned();
    }
    s
}

fn to_event(mut ev: LogEvent) -> Event {
    ev.message = scrub_message(ev.message);
    let data = serde_json::to_string(&ev).unwrap_or_else(|_| "{}".to_string());
    Event::default().data(data)
}

/// `GET /logs`
pub async fn logs_sse() -> Sse<BoxStream<'static, std::result::Result<Event, Infallible>>> {
    let rx = match subscribe_logs() {
        Some(rx) => rx,
        None => {
            let (tx, rx) = tokio::sync::broadcast::channel::<LogEvent>(1);
            let _ = tx.send(LogEvent {
                level: "INFO".into(),
                target: "init".into(),
                message: "logging not initialized".into(),
                file: None,
                line: None,
                time: chrono::Utc::now().to_rfc3339(),
            });
            rx
        }
    };
    let stream = BroadcastStream::new(rx)
        .filter_map(|item| async move { item.ok().map(|ev| Ok(to_event(ev))) })
        .boxed();
    Sse::new(stream).keep_alive(KeepAlive::default())
}
