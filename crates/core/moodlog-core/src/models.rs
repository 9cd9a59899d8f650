//! Classification capabilities and the registry that holds them
//!
//! Each modality is backed by one pretrained model living behind a trait.
//! The host builds a [`ModelRegistry`] once at boot and lends it to every
//! journal call; handles are reused for the process lifetime.

use crate::{MoodlogError, Result};
use async_trait::async_trait;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One scored label from a classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub score: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Highest scoring prediction; the first one wins ties
pub fn dominant(predictions: &[Prediction]) -> Result<&Prediction> {
    predictions
        .iter()
        .rev()
        .max_by_key(|p| OrderedFloat(p.score))
        .ok_or_else(|| MoodlogError::model("classifier returned no labels"))
}

/// An uploaded scrapbook file
#[derive(Debug, Clone)]
pub struct Document {
    /// Original file name, used to pick PDF vs image handling
    pub name: String,
    pub bytes: Vec<u8>,
}

/// What a scrapbook file contains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Image,
}

impl Document {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Kind by extension: `.pdf`, `.png`, `.jpg`, `.jpeg` (case-insensitive)
    pub fn kind(&self) -> Result<DocumentKind> {
        let lower = self.name.to_lowercase();
        if lower.ends_with(".pdf") {
            Ok(DocumentKind::Pdf)
        } else if lower.ends_with(".png") || lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
            Ok(DocumentKind::Image)
        } else {
            Err(MoodlogError::validation(format!(
                "unsupported file type '{}': expected png, jpg or pdf",
                self.name
            )))
        }
    }
}

/// Text → emotion labels
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextClassifier: Send + Sync {
    fn name(&self) -> String;

    async fn classify(&self, text: &str) -> Result<Vec<Prediction>>;
}

/// Normalized mono audio → emotion labels
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AudioClassifier: Send + Sync {
    fn name(&self) -> String;

    /// `samples` are mono f32 at `sample_rate`
    async fn classify(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<Prediction>>;
}

/// PDF text extraction and image OCR
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentReader: Send + Sync {
    fn name(&self) -> String;

    /// Plain text of the document; empty when nothing was found
    async fn extract_text(&self, document: &Document) -> Result<String>;
}

/// Camera snapshot → dominant facial emotion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FaceAnalyzer: Send + Sync {
    fn name(&self) -> String;

    async fn dominant_emotion(&self, image: &[u8]) -> Result<String>;
}

/// Loaded model handles, one per capability
#[derive(Clone)]
pub struct ModelRegistry {
    pub text: Arc<dyn TextClassifier>,
    pub audio: Arc<dyn AudioClassifier>,
    pub documents: Arc<dyn DocumentReader>,
    pub face: Arc<dyn FaceAnalyzer>,
}

impl ModelRegistry {
    pub fn new(
        text: Arc<dyn TextClassifier>,
        audio: Arc<dyn AudioClassifier>,
        documents: Arc<dyn DocumentReader>,
        face: Arc<dyn FaceAnalyzer>,
    ) -> Self {
        Self {
            text,
            audio,
            documents,
            face,
        }
    }

    /// One-line summary for boot logs
    pub fn describe(&self) -> String {
        format!(
            "text={} audio={} documents={} face={}",
            self.text.name(),
            self.audio.name(),
            self.documents.name(),
            self.face.name()
        )
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.describe())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominant_picks_highest() {
        let preds = vec![
            Prediction::new("sadness", 0.1),
            Prediction::new("anger", 0.7),
            Prediction::new("joy", 0.2),
        ];
        assert_eq!(dominant(&preds).unwrap().label, "anger");
    }

    #[test]
    fn test_dominant_first_wins_ties() {
        let preds = vec![Prediction::new("fear", 0.5), Prediction::new("joy", 0.5)];
        assert_eq!(dominant(&preds).unwrap().label, "fear");
    }

    #[test]
    fn test_dominant_empty_is_model_error() {
        assert!(matches!(dominant(&[]), Err(MoodlogError::Model(_))));
    }

    #[test]
    fn test_document_kinds() {
        assert_eq!(Document::new("scan.PDF", vec![]).kind().unwrap(), DocumentKind::Pdf);
        assert_eq!(Document::new("note.jpg", vec![]).kind().unwrap(), DocumentKind::Image);
        assert_eq!(Document::new("note.JPEG", vec![]).kind().unwrap(), DocumentKind::Image);
        assert_eq!(Document::new("a.png", vec![]).kind().unwrap(), DocumentKind::Image);
        assert!(matches!(
            Document::new("notes.txt", vec![]).kind(),
            Err(MoodlogError::Validation(_))
        ));
    }
}
