//! Inference Provider for Moodlog
//!
//! HTTP-backed implementations of the four classification capabilities:
//!
//! - Text emotion via a hosted DistilBERT emotion model
//! - Speech emotion via a hosted wav2vec2 model (audio re-encoded as float WAV)
//! - Scrapbook text via pdf-extract for PDFs and an OCR server for images
//! - Facial emotion via a DeepFace-compatible `analyze` server
//!
//! All four share one pooled HTTP client.

#![warn(clippy::all)]

mod audio;
mod client;
mod config;
mod documents;
mod face;
mod text;

pub use audio::{encode_wav, HfAudioClassifier};
pub use client::{parse_predictions, InferenceClient};
pub use config::*;
pub use documents::{extract_pdf_text, join_fragments, ScrapbookReader};
pub use face::{parse_analysis, HttpFaceAnalyzer};
pub use text::HfTextClassifier;

use moodlog_core::{ModelRegistry, Result};
use std::sync::Arc;

/// Build every capability once; the result is shared for the process lifetime
pub fn build_registry(config: &InferenceConfig) -> Result<ModelRegistry> {
    let client = InferenceClient::new(config)?;

    let registry = ModelRegistry::new(
        Arc::new(HfTextClassifier::new(
            client.clone(),
            config.text_model.clone(),
            config.model_url(&config.text_model),
        )),
        Arc::new(HfAudioClassifier::new(
            client.clone(),
            config.audio_model.clone(),
            config.model_url(&config.audio_model),
        )),
        Arc::new(ScrapbookReader::new(client.clone(), config.ocr_url.clone())),
        Arc::new(HttpFaceAnalyzer::new(client, config.face_url.clone())),
    );

    tracing::info!(
        base_url = %config.base_url,
        authenticated = config.api_token.is_some(),
        "✓ Model registry ready: {}",
        registry.describe()
    );
    Ok(registry)
}
