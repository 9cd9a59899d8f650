//! Text emotion classifier on a hosted transformer model

use crate::client::{parse_predictions, InferenceClient};
use async_trait::async_trait;
use moodlog_core::{Prediction, Result, TextClassifier};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct TextRequest<'a> {
    inputs: &'a str,
}

/// DistilBERT-style emotion classifier behind the inference API
pub struct HfTextClassifier {
    client: InferenceClient,
    model: String,
    url: String,
}

impl HfTextClassifier {
    pub fn new(client: InferenceClient, model: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl TextClassifier for HfTextClassifier {
    fn name(&self) -> String {
        self.model.clone()
    }

    async fn classify(&self, text: &str) -> Result<Vec<Prediction>> {
        tracing::debug!(model = %self.model, chars = text.chars().count(), "Text classification request");
        let request = self
            .client
            .post(&self.url)
            .json(&TextRequest { inputs: text });
        let response = self.client.send("text classifier", request).await?;
        let body = response.text().await?;
        parse_predictions(&body)
    }
}
