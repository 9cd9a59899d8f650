//! The journaling flow shared by every modality
//!
//! classify → update stress → pick reply. Each call is one-shot: a failure
//! anywhere before the stress update leaves the session untouched and is
//! handed back to the host to show as a message.

use crate::audio::{self, TARGET_SAMPLE_RATE};
use crate::models::{dominant, Document, ModelRegistry};
use crate::replies::ReplyBank;
use crate::session::SessionState;
use crate::types::EmotionLabel;
use crate::utils::{truncate_chars, Logger};
use crate::Result;
use serde::Serialize;

/// Text classifier input cap, in characters
pub const MAX_CLASSIFY_CHARS: usize = 512;

/// Input channel of a journal entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Text,
    Voice,
    Document,
    Face,
}

impl Modality {
    /// Card heading
    pub fn title(&self) -> &'static str {
        match self {
            Modality::Text => "TEXT LOG",
            Modality::Voice => "VOICE MESSAGE",
            Modality::Document => "FILE CONTENT",
            Modality::Face => "VISUAL SCAN",
        }
    }

    /// Short name for logs and routes
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Text => "text",
            Modality::Voice => "voice",
            Modality::Document => "document",
            Modality::Face => "face",
        }
    }
}

/// Result of one classified interaction; rendered once, never stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub modality: Modality,
    pub emotion: EmotionLabel,
    pub reply: String,
    /// Session score after the update
    pub score: f64,
}

/// Borrowed view of the loaded models and reply bank
pub struct Journal<'a> {
    registry: &'a ModelRegistry,
    replies: &'a ReplyBank,
    logger: Logger,
}

impl<'a> Journal<'a> {
    pub fn new(registry: &'a ModelRegistry, replies: &'a ReplyBank) -> Self {
        Self {
            registry,
            replies,
            logger: Logger::new("journal"),
        }
    }

    /// Typed entry. Blank text does nothing.
    pub async fn log_text(
        &self,
        session: &mut SessionState,
        text: &str,
    ) -> Result<Option<LogEntry>> {
        if text.trim().is_empty() {
            self.logger.skipped(session.id, Modality::Text.as_str(), "blank entry");
            return Ok(None);
        }
        let result = self.classify_text(text).await;
        let emotion = self.checked(session, Modality::Text, result)?;
        Ok(Some(self.record(session, Modality::Text, emotion)))
    }

    /// Recorded voice message (WAV bytes)
    pub async fn log_voice(&self, session: &mut SessionState, wav: &[u8]) -> Result<LogEntry> {
        let result = self.classify_voice(wav).await;
        let emotion = self.checked(session, Modality::Voice, result)?;
        Ok(self.record(session, Modality::Voice, emotion))
    }

    /// Uploaded PDF or image; documents with no readable text do nothing
    pub async fn log_document(
        &self,
        session: &mut SessionState,
        document: &Document,
    ) -> Result<Option<LogEntry>> {
        let result = self.document_text(document).await;
        let text = self.checked(session, Modality::Document, result)?;
        if text.trim().is_empty() {
            self.logger.skipped(session.id, Modality::Document.as_str(), "no readable text");
            return Ok(None);
        }
        let result = self.classify_text(&text).await;
        let emotion = self.checked(session, Modality::Document, result)?;
        Ok(Some(self.record(session, Modality::Document, emotion)))
    }

    /// Camera snapshot
    pub async fn log_face(&self, session: &mut SessionState, image: &[u8]) -> Result<LogEntry> {
        let result = self.registry.face.dominant_emotion(image).await;
        let label = self.checked(session, Modality::Face, result)?;
        Ok(self.record(session, Modality::Face, EmotionLabel::new(label)))
    }

    async fn classify_text(&self, text: &str) -> Result<EmotionLabel> {
        let input = truncate_chars(text, MAX_CLASSIFY_CHARS);
        let predictions = self.registry.text.classify(input).await?;
        Ok(EmotionLabel::new(dominant(&predictions)?.label.clone()))
    }

    async fn classify_voice(&self, wav: &[u8]) -> Result<EmotionLabel> {
        let samples = audio::normalize(wav)?;
        let predictions = self
            .registry
            .audio
            .classify(&samples, TARGET_SAMPLE_RATE)
            .await?;
        Ok(EmotionLabel::new(dominant(&predictions)?.label.clone()))
    }

    async fn document_text(&self, document: &Document) -> Result<String> {
        document.kind()?;
        let text = self.registry.documents.extract_text(document).await?;
        self.logger.extracted(&document.name, text.chars().count());
        Ok(text)
    }

    /// Log a failed step against the session before handing it back
    fn checked<T>(
        &self,
        session: &SessionState,
        modality: Modality,
        result: Result<T>,
    ) -> Result<T> {
        if let Err(e) = &result {
            self.logger.failed(session.id, modality.as_str(), e);
        }
        result
    }

    fn record(
        &self,
        session: &mut SessionState,
        modality: Modality,
        emotion: EmotionLabel,
    ) -> LogEntry {
        let previous = session.stress.value();
        let score = session.stress.apply(emotion.as_str());
        let reply = self.replies.reply(emotion.as_str());
        self.logger.entry(session.id, modality.as_str(), &emotion.key(), previous, score);
        LogEntry {
            modality,
            emotion,
            reply,
            score,
        }
    }
}
