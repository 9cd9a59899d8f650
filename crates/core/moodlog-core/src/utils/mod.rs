//! Utility functions

pub mod logger;

pub use logger::{init_logging, subscribe_logs, LogEvent, Logger};

/// Truncate to at most `max_chars` characters without splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
