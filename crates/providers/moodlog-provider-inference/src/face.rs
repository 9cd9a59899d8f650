//! Facial emotion analysis against a DeepFace-compatible REST server

use crate::client::InferenceClient;
use async_trait::async_trait;
use base64::Engine;
use moodlog_core::{FaceAnalyzer, MoodlogError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct AnalyzeRequest {
    img_path: String,
    actions: Vec<&'static str>,
    enforce_detection: bool,
}

impl AnalyzeRequest {
    fn for_image(image: &[u8]) -> Self {
        Self {
            img_path: format!(
                "data:image/jpeg;base64,{}",
                base64::engine::general_purpose::STANDARD.encode(image)
            ),
            actions: vec!["emotion"],
            enforce_detection: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FaceResult {
    dominant_emotion: String,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    results: Vec<FaceResult>,
}

/// Dominant emotion of the first detected face
pub fn parse_analysis(body: &str) -> Result<String> {
    let parsed: AnalyzeResponse = serde_json::from_str(body)
        .map_err(|e| MoodlogError::model(format!("Unexpected face analysis response: {}", e)))?;
    parsed
        .results
        .into_iter()
        .next()
        .map(|r| r.dominant_emotion)
        .filter(|e| !e.trim().is_empty())
        .ok_or(MoodlogError::NoFaceDetected)
}

/// DeepFace `analyze` endpoint client
pub struct HttpFaceAnalyzer {
    client: InferenceClient,
    url: String,
}

impl HttpFaceAnalyzer {
    pub fn new(client: InferenceClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl FaceAnalyzer for HttpFaceAnalyzer {
    fn name(&self) -> String {
        format!("deepface({})", self.url)
    }

    async fn dominant_emotion(&self, image: &[u8]) -> Result<String> {
        if image.is_empty() {
            return Err(MoodlogError::NoFaceDetected);
        }
        let request = self
            .client
            .post_plain(&self.url)
            .json(&AnalyzeRequest::for_image(image));
        let response = self.client.send("face analyzer", request).await?;
        let body = response.text().await?;
        parse_analysis(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = serde_json::to_value(AnalyzeRequest::for_image(&[0xff, 0xd8, 0xff])).unwrap();
        assert_eq!(body["img_path"], "data:image/jpeg;base64,/9j/");
        assert_eq!(body["actions"], serde_json::json!(["emotion"]));
        assert_eq!(body["enforce_detection"], false);
    }

    #[test]
    fn test_first_face_wins() {
        let body = r#"{"results":[
            {"dominant_emotion":"sad","emotion":{"sad":80.1}},
            {"dominant_emotion":"happy"}
        ]}"#;
        assert_eq!(parse_analysis(body).unwrap(), "sad");
    }

    #[test]
    fn test_no_results_is_no_face() {
        assert!(matches!(
            parse_analysis(r#"{"results":[]}"#),
            Err(MoodlogError::NoFaceDetected)
        ));
        assert!(matches!(
            parse_analysis("{}"),
            Err(MoodlogError::NoFaceDetected)
        ));
    }

    #[test]
    fn test_garbage_is_model_error() {
        assert!(matches!(
            parse_analysis("<html>502</html>"),
            Err(MoodlogError::Model(_))
        ));
    }
}
