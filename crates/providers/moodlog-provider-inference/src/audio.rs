//! Speech emotion classifier on a hosted wav2vec2 model

use crate::client::{parse_predictions, InferenceClient};
use async_trait::async_trait;
use bytes::Bytes;
use moodlog_core::{AudioClassifier, MoodlogError, Prediction, Result};
use std::io::Cursor;

/// Encode mono f32 samples as a 32-bit float WAV
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Bytes> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut cursor = Cursor::new(Vec::with_capacity(44 + samples.len() * 4));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| MoodlogError::audio(format!("Failed to start WAV: {}", e)))?;
        for sample in samples {
            writer
                .write_sample(*sample)
                .map_err(|e| MoodlogError::audio(format!("Failed to write WAV: {}", e)))?;
        }
        writer
            .finalize()
            .map_err(|e| MoodlogError::audio(format!("Failed to finish WAV: {}", e)))?;
    }
    Ok(Bytes::from(cursor.into_inner()))
}

/// wav2vec2 speech emotion recognizer behind the inference API
pub struct HfAudioClassifier {
    client: InferenceClient,
    model: String,
    url: String,
}

impl HfAudioClassifier {
    pub fn new(client: InferenceClient, model: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl AudioClassifier for HfAudioClassifier {
    fn name(&self) -> String {
        self.model.clone()
    }

    async fn classify(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<Prediction>> {
        let wav = encode_wav(samples, sample_rate)?;
        tracing::debug!(
            model = %self.model,
            samples = samples.len(),
            bytes = wav.len(),
            "Audio classification request"
        );
        let request = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "audio/wav")
            .body(wav);
        let response = self.client.send("audio classifier", request).await?;
        let body = response.text().await?;
        parse_predictions(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_wav_decodes_back() {
        let samples = vec![0.0f32, 0.25, -0.5, 1.0];
        let wav = encode_wav(&samples, 16_000).unwrap();
        let clip = moodlog_core::audio::decode_wav(&wav).unwrap();
        assert_eq!(clip.sample_rate, 16_000);
        assert_eq!(clip.channels, 1);
        assert_eq!(clip.samples, samples);
    }

    #[test]
    fn test_header_size() {
        let wav = encode_wav(&[0.0; 10], 16_000).unwrap();
        assert_eq!(&wav[..4], b"RIFF");
        assert!(wav.len() >= 44 + 40);
    }
}
