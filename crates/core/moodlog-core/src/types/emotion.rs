//! Emotion labels as produced by the classification models
//!
//! Labels are kept as the raw model strings: every model speaks its own
//! vocabulary (`joy`, `happy`, `angry`, `neutral`, ...). Only a handful of
//! them carry a stress target; anything else counts as neutral.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stress target used for labels outside the table
pub const NEUTRAL_TARGET: f64 = 5.0;

/// Emotion → stress target, keys lowercase
const STRESS_TARGETS: &[(&str, f64)] = &[
    ("joy", 2.0),
    ("happy", 2.0),
    ("neutral", 5.0),
    ("sadness", 7.0),
    ("fear", 8.5),
    ("anger", 9.5),
];

/// A single emotion label returned by a model
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionLabel(String);

impl EmotionLabel {
    /// Wrap a raw label
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into().trim().to_string())
    }

    /// The label as the model returned it
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase lookup key
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }

    /// Uppercase form shown on log cards
    pub fn display(&self) -> String {
        self.0.to_uppercase()
    }

    /// Stress target for this label
    pub fn stress_target(&self) -> f64 {
        stress_target(&self.0)
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EmotionLabel {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EmotionLabel {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Stress target for an emotion, case-insensitive, neutral when unknown
pub fn stress_target(emotion: &str) -> f64 {
    let key = emotion.trim().to_lowercase();
    STRESS_TARGETS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, target)| *target)
        .unwrap_or(NEUTRAL_TARGET)
}
