//! Configuration management and environment variable loading

use crate::{MoodlogError, Result};
use std::env;
use std::path::PathBuf;

/// Load environment variables from .env file
///
/// Looks in the current directory or a parent directory. A missing file is
/// not an error; a file that fails to parse is.
///
/// # Example
///
/// ```no_run
/// use moodlog_core::load_env;
///
/// load_env().ok();
/// let port = moodlog_core::get_env_int("MOODLOG_PORT", 8501u16);
/// ```
pub fn load_env() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::info!("✓ Loaded environment from: {}", path.display());
            Ok(())
        }
        Err(dotenvy::Error::LineParse(line, pos)) => Err(MoodlogError::config(format!(
            "Failed to parse .env file at line {}, position {}",
            line, pos
        ))),
        Err(dotenvy::Error::Io(_)) => {
            tracing::warn!("No .env file found - using system environment variables only");
            Ok(())
        }
        Err(e) => Err(MoodlogError::config(format!(
            "Failed to load .env file: {}",
            e
        ))),
    }
}

/// Get required environment variable
///
/// Returns an error if the variable is not set
pub fn get_required_env(key: &str) -> Result<String> {
    env::var(key).map_err(|_| {
        MoodlogError::config(format!(
            "Required environment variable '{}' is not set. \
             Check your .env file or system environment.",
            key
        ))
    })
}

/// Get optional environment variable with default
pub fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get optional environment variable, treating empty values as unset
pub fn get_env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get environment variable as boolean
pub fn get_env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| match v.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

/// Get environment variable as integer
pub fn get_env_int<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Application-level settings for the journal host
#[derive(Debug, Clone)]
pub struct MoodlogConfig {
    /// Bind host for the web UI
    pub host: String,
    /// Bind port for the web UI
    pub port: u16,
    /// Path of the JSON reply bank
    pub replies_file: PathBuf,
    /// Expose the `/logs` SSE feed
    pub logs_enabled: bool,
    /// Largest accepted upload (audio, document, snapshot) in megabytes
    pub max_upload_mb: usize,
    /// Journaling sessions kept in memory at once
    pub max_sessions: usize,
}

impl Default for MoodlogConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            replies_file: PathBuf::from("replies.json"),
            logs_enabled: false,
            max_upload_mb: 25,
            max_sessions: crate::session::DEFAULT_MAX_SESSIONS,
        }
    }
}

impl MoodlogConfig {
    /// Read settings from `MOODLOG_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: get_env_or("MOODLOG_HOST", &defaults.host),
            port: get_env_int("MOODLOG_PORT", defaults.port),
            replies_file: get_env_opt("MOODLOG_REPLIES_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.replies_file),
            logs_enabled: get_env_bool("MOODLOG_LOGS_ENABLED", defaults.logs_enabled),
            max_upload_mb: get_env_int("MOODLOG_MAX_UPLOAD_MB", defaults.max_upload_mb),
            max_sessions: get_env_int("MOODLOG_MAX_SESSIONS", defaults.max_sessions),
        }
    }

    /// Upload limit in bytes
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}
