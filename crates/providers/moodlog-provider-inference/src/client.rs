//! Shared HTTP plumbing for the inference backends

use crate::config::InferenceConfig;
use moodlog_core::{MoodlogError, Prediction, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;

/// Longest slice of an error body carried into the error message
const ERROR_BODY_EXCERPT: usize = 200;

/// One pooled client plus the auth every backend shares
#[derive(Debug, Clone)]
pub struct InferenceClient {
    http: Client,
    api_token: Option<String>,
}

impl InferenceClient {
    /// Build the pooled client
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            api_token: config.api_token.clone(),
        })
    }

    /// POST with bearer auth when a token is configured
    pub fn post(&self, url: &str) -> RequestBuilder {
        let request = self.http.post(url);
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// POST without auth, for self-hosted helpers
    pub fn post_plain(&self, url: &str) -> RequestBuilder {
        self.http.post(url)
    }

    /// Send and turn transport failures and non-2xx statuses into model errors
    pub async fn send(&self, what: &str, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                MoodlogError::model(format!("Cannot connect to {} backend: {}", what, e))
            } else if e.is_timeout() {
                MoodlogError::model(format!("{} request timed out: {}", what, e))
            } else {
                MoodlogError::Network(e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MoodlogError::model(format!(
                "{} error ({}): {}",
                what,
                status,
                excerpt(&body)
            )));
        }
        Ok(response)
    }
}

fn excerpt(body: &str) -> &str {
    moodlog_core::utils::truncate_chars(body.trim(), ERROR_BODY_EXCERPT)
}

/// Classification payloads come back flat or wrapped once per input
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Flat(Vec<Prediction>),
    Batched(Vec<Vec<Prediction>>),
}

/// Decode a hosted classification response into predictions
pub fn parse_predictions(body: &str) -> Result<Vec<Prediction>> {
    let parsed: ClassificationResponse = serde_json::from_str(body).map_err(|e| {
        MoodlogError::model(format!(
            "unexpected classifier response ({}): {}",
            e,
            excerpt(body)
        ))
    })?;
    let predictions = match parsed {
        ClassificationResponse::Flat(p) => p,
        ClassificationResponse::Batched(batches) => {
            batches.into_iter().next().unwrap_or_default()
        }
    };
    if predictions.is_empty() {
        return Err(MoodlogError::model("classifier returned no labels"));
    }
    Ok(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_predictions() {
        let body = r#"[{"label":"joy","score":0.91},{"label":"anger","score":0.09}]"#;
        let preds = parse_predictions(body).unwrap();
        assert_eq!(preds.len(), 2);
        assert_eq!(preds[0].label, "joy");
    }

    #[test]
    fn test_batched_predictions() {
        let body = r#"[[{"label":"sadness","score":0.7},{"label":"fear","score":0.3}]]"#;
        let preds = parse_predictions(body).unwrap();
        assert_eq!(preds[1].label, "fear");
    }

    #[test]
    fn test_error_payloads_rejected() {
        let err = parse_predictions(r#"{"error":"Model is currently loading"}"#).unwrap_err();
        assert!(matches!(err, MoodlogError::Model(_)));
        assert!(err.to_string().contains("currently loading"));
        assert!(matches!(parse_predictions("[]"), Err(MoodlogError::Model(_))));
        assert!(matches!(parse_predictions("[[]]"), Err(MoodlogError::Model(_))));
    }

    #[test]
    fn test_client_builds_with_and_without_timeout() {
        assert!(InferenceClient::new(&InferenceConfig::default()).is_ok());
        let config = InferenceConfig {
            timeout_secs: Some(5),
            ..Default::default()
        };
        assert!(InferenceClient::new(&config).is_ok());
    }
}
