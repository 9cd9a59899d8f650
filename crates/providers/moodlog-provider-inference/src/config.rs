//! Inference endpoint configuration

use moodlog_core::{get_env_int, get_env_opt, get_env_or};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default hosted inference API
pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co";
/// Default text emotion model
pub const DEFAULT_TEXT_MODEL: &str = "bhadresh-savani/distilbert-base-uncased-emotion";
/// Default speech emotion model
pub const DEFAULT_AUDIO_MODEL: &str = "ehcalabres/wav2vec2-lg-xlsr-en-speech-emotion-recognition";
/// Default OCR server
pub const DEFAULT_OCR_URL: &str = "http://127.0.0.1:8866/ocr";
/// Default face analysis server
pub const DEFAULT_FACE_URL: &str = "http://127.0.0.1:5005/analyze";

/// Where each capability's model lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Base URL of the model-hosting API
    pub base_url: String,
    /// Bearer token for the model-hosting API
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
    pub text_model: String,
    pub audio_model: String,
    /// OCR endpoint for scrapbook images
    pub ocr_url: String,
    /// Face analysis endpoint for camera snapshots
    pub face_url: String,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_INFERENCE_URL.to_string(),
            api_token: None,
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            audio_model: DEFAULT_AUDIO_MODEL.to_string(),
            ocr_url: DEFAULT_OCR_URL.to_string(),
            face_url: DEFAULT_FACE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl InferenceConfig {
    /// Read from `MOODLOG_*` / `HF_API_TOKEN` variables
    pub fn from_env() -> Self {
        let timeout_secs = match get_env_int::<u64>("MOODLOG_REQUEST_TIMEOUT_SECS", 0) {
            0 => None,
            secs => Some(secs),
        };
        Self {
            base_url: get_env_or("MOODLOG_INFERENCE_URL", DEFAULT_INFERENCE_URL),
            api_token: get_env_opt("HF_API_TOKEN"),
            text_model: get_env_or("MOODLOG_TEXT_MODEL", DEFAULT_TEXT_MODEL),
            audio_model: get_env_or("MOODLOG_AUDIO_MODEL", DEFAULT_AUDIO_MODEL),
            ocr_url: get_env_or("MOODLOG_OCR_URL", DEFAULT_OCR_URL),
            face_url: get_env_or("MOODLOG_FACE_URL", DEFAULT_FACE_URL),
            timeout_secs,
        }
    }

    /// Hosted-model endpoint for `model`
    pub fn model_url(&self, model: &str) -> String {
        format!("{}/models/{}", self.base_url.trim_end_matches('/'), model)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InferenceConfig::default();
        assert_eq!(config.base_url, DEFAULT_INFERENCE_URL);
        assert!(config.api_token.is_none());
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_model_url_joins_cleanly() {
        let config = InferenceConfig {
            base_url: "http://localhost:9000/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.model_url("org/model"),
            "http://localhost:9000/models/org/model"
        );
    }

    #[test]
    fn test_token_not_serialized() {
        let config = InferenceConfig {
            api_token: Some("hf_secret".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hf_secret"));
    }
}
