//! Testing utilities
//!
//! Fixed-answer capabilities so hosts can exercise the full journal flow
//! without reaching any model server.

use crate::models::{
    AudioClassifier, Document, DocumentReader, FaceAnalyzer, ModelRegistry, Prediction,
    TextClassifier,
};
use crate::{MoodlogError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Text classifier that always answers with one label
#[derive(Debug, Clone)]
pub struct FixedTextClassifier {
    pub label: String,
}

#[async_trait]
impl TextClassifier for FixedTextClassifier {
    fn name(&self) -> String {
        format!("fixed-text({})", self.label)
    }

    async fn classify(&self, _text: &str) -> Result<Vec<Prediction>> {
        Ok(vec![Prediction::new(self.label.clone(), 1.0)])
    }
}

/// Audio classifier that always answers with one label
#[derive(Debug, Clone)]
pub struct FixedAudioClassifier {
    pub label: String,
}

#[async_trait]
impl AudioClassifier for FixedAudioClassifier {
    fn name(&self) -> String {
        format!("fixed-audio({})", self.label)
    }

    async fn classify(&self, _samples: &[f32], _sample_rate: u32) -> Result<Vec<Prediction>> {
        Ok(vec![Prediction::new(self.label.clone(), 1.0)])
    }
}

/// Document reader returning canned text
#[derive(Debug, Clone)]
pub struct FixedDocumentReader {
    pub text: String,
}

#[async_trait]
impl DocumentReader for FixedDocumentReader {
    fn name(&self) -> String {
        "fixed-documents".to_string()
    }

    async fn extract_text(&self, _document: &Document) -> Result<String> {
        Ok(self.text.clone())
    }
}

/// Face analyzer with a fixed outcome; `None` means no face is ever found
#[derive(Debug, Clone)]
pub struct FixedFaceAnalyzer {
    pub label: Option<String>,
}

#[async_trait]
impl FaceAnalyzer for FixedFaceAnalyzer {
    fn name(&self) -> String {
        "fixed-face".to_string()
    }

    async fn dominant_emotion(&self, _image: &[u8]) -> Result<String> {
        self.label.clone().ok_or(MoodlogError::NoFaceDetected)
    }
}

/// Text classifier that always fails, for error paths
#[derive(Debug, Clone, Default)]
pub struct FailingTextClassifier;

#[async_trait]
impl TextClassifier for FailingTextClassifier {
    fn name(&self) -> String {
        "failing-text".to_string()
    }

    async fn classify(&self, _text: &str) -> Result<Vec<Prediction>> {
        Err(MoodlogError::model("model offline"))
    }
}

/// Registry where every capability answers `label`
pub fn stub_registry(label: &str) -> ModelRegistry {
    ModelRegistry::new(
        Arc::new(FixedTextClassifier {
            label: label.to_string(),
        }),
        Arc::new(FixedAudioClassifier {
            label: label.to_string(),
        }),
        Arc::new(FixedDocumentReader {
            text: format!("a page that reads as {}", label),
        }),
        Arc::new(FixedFaceAnalyzer {
            label: Some(label.to_string()),
        }),
    )
}
