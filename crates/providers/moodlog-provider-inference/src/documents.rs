//! Scrapbook reader: PDF text extraction and image OCR

use crate::client::InferenceClient;
use async_trait::async_trait;
use base64::Engine;
use moodlog_core::{Document, DocumentKind, DocumentReader, MoodlogError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct OcrRequest {
    image: String,
}

#[derive(Debug, Deserialize)]
struct OcrResponse {
    #[serde(default)]
    texts: Vec<String>,
}

/// Join OCR fragments with single spaces, dropping blank ones
pub fn join_fragments(fragments: &[String]) -> String {
    fragments
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract all page text from an in-memory PDF
pub async fn extract_pdf_text(bytes: Vec<u8>) -> Result<String> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| MoodlogError::document(format!("PDF extraction aborted: {}", e)))?
        .map_err(|e| MoodlogError::document(format!("Failed to extract PDF text: {}", e)))?;
    Ok(text.trim().to_string())
}

/// PDF via pdf-extract, images via an OCR server
pub struct ScrapbookReader {
    client: InferenceClient,
    ocr_url: String,
}

impl ScrapbookReader {
    pub fn new(client: InferenceClient, ocr_url: impl Into<String>) -> Self {
        Self {
            client,
            ocr_url: ocr_url.into(),
        }
    }

    async fn ocr(&self, image: &[u8]) -> Result<String> {
        let body = OcrRequest {
            image: base64::engine::general_purpose::STANDARD.encode(image),
        };
        let request = self.client.post_plain(&self.ocr_url).json(&body);
        let response = self.client.send("OCR", request).await?;
        let parsed: OcrResponse = response
            .json()
            .await
            .map_err(|e| MoodlogError::document(format!("Unexpected OCR response: {}", e)))?;
        Ok(join_fragments(&parsed.texts))
    }
}

#[async_trait]
impl DocumentReader for ScrapbookReader {
    fn name(&self) -> String {
        format!("pdf-extract+ocr({})", self.ocr_url)
    }

    async fn extract_text(&self, document: &Document) -> Result<String> {
        let text = match document.kind()? {
            DocumentKind::Pdf => extract_pdf_text(document.bytes.clone()).await?,
            DocumentKind::Image => self.ocr(&document.bytes).await?,
        };
        tracing::debug!(file = %document.name, chars = text.chars().count(), "Extracted scrapbook text");
        Ok(text)
    }
}
