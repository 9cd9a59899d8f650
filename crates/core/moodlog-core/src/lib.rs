//! Moodlog Core
//!
//! Domain logic for the retro terminal mood journal:
//!
//! - Stress state with exponential smoothing toward per-emotion targets
//! - Emotion-keyed reply bank with neutral fallback
//! - Model registry traits for text, voice, document and face classification
//! - The journal flow tying classification, stress and replies together
//!
//! # Example
//!
//! ```no_run
//! use moodlog_core::*;
//!
//! # async fn run(registry: ModelRegistry) -> Result<()> {
//! let replies = ReplyBank::load("replies.json");
//! let journal = Journal::new(&registry, &replies);
//! let mut session = SessionState::new();
//! if let Some(entry) = journal.log_text(&mut session, "long day").await? {
//!     println!("{} -> {}", entry.emotion, entry.score);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub use uuid::Uuid;

pub mod audio;
pub mod config;
pub mod error;
pub mod journal;
pub mod models;
pub mod replies;
pub mod session;
pub mod stress;
pub mod templates;
pub mod testing;
pub mod types;
pub mod utils;

pub use config::{
    get_env_bool, get_env_int, get_env_opt, get_env_or, get_required_env, load_env, MoodlogConfig,
};
pub use error::{MoodlogError, Result};
pub use journal::{Journal, LogEntry, Modality, MAX_CLASSIFY_CHARS};
pub use models::{
    dominant, AudioClassifier, Document, DocumentKind, DocumentReader, FaceAnalyzer,
    ModelRegistry, Prediction, TextClassifier,
};
pub use replies::ReplyBank;
pub use session::{SessionState, SessionStore};
pub use stress::{is_critical_shake, update, StressBand, StressIndicator, StressScore};
pub use templates::TemplateEngine;
pub use types::{stress_target, EmotionLabel};
pub use utils::{init_logging, subscribe_logs, LogEvent, Logger};
