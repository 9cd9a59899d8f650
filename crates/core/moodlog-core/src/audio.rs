//! Voice clip normalization
//!
//! The speech emotion model wants 16 kHz mono f32. Clips arrive as WAV at
//! whatever rate and channel count the browser recorded, so every clip goes
//! through decode → downmix → resample before classification.

use crate::{MoodlogError, Result};
use std::io::Cursor;

/// Sample rate expected by the audio classifier
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Longest clip accepted for classification
pub const MAX_CLIP_SECS: u64 = 300;

/// Decoded WAV content
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    /// Interleaved samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioClip {
    /// Frames (samples per channel)
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }

    /// Duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.frames() as u64 * 1000) / self.sample_rate as u64
    }
}

/// Decode WAV bytes into f32 samples
pub fn decode_wav(bytes: &[u8]) -> Result<AudioClip> {
    if bytes.is_empty() {
        return Err(MoodlogError::audio("empty recording"));
    }
    let mut reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| MoodlogError::audio(format!("Failed to read WAV: {}", e)))?;

    let spec = reader.spec();
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| MoodlogError::audio(format!("Corrupt WAV samples: {}", e)))?,
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| MoodlogError::audio(format!("Corrupt WAV samples: {}", e)))?
        }
    };

    if samples.is_empty() {
        return Err(MoodlogError::audio("recording contains no samples"));
    }

    Ok(AudioClip {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

/// Average channels into one; mono clips pass through
pub fn downmix(clip: &AudioClip) -> Vec<f32> {
    let channels = clip.channels.max(1) as usize;
    if channels == 1 {
        return clip.samples.clone();
    }
    clip.samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Sample count after resampling `len` samples from `from_rate` to `to_rate`
pub fn resampled_len(len: usize, from_rate: u32, to_rate: u32) -> usize {
    if from_rate == to_rate || from_rate == 0 {
        return len;
    }
    (len as f64 * to_rate as f64 / from_rate as f64) as usize
}

/// Linear interpolation resampling
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let new_len = resampled_len(samples.len(), from_rate, to_rate);
    let mut resampled = Vec::with_capacity(new_len);

    for i in 0..new_len {
        let src_idx = i as f64 * ratio;
        let idx = src_idx as usize;
        let frac = (src_idx - idx as f64) as f32;

        if idx + 1 < samples.len() {
            resampled.push(samples[idx] * (1.0 - frac) + samples[idx + 1] * frac);
        } else if idx < samples.len() {
            resampled.push(samples[idx]);
        }
    }

    resampled
}

/// WAV bytes → 16 kHz mono f32 ready for the audio classifier
pub fn normalize(bytes: &[u8]) -> Result<Vec<f32>> {
    let clip = decode_wav(bytes)?;
    tracing::debug!(
        sample_rate = clip.sample_rate,
        channels = clip.channels,
        duration_ms = clip.duration_ms(),
        "Decoded voice clip"
    );
    if clip.sample_rate == 0 {
        return Err(MoodlogError::audio("recording reports a zero sample rate"));
    }
    let out_len = resampled_len(clip.frames(), clip.sample_rate, TARGET_SAMPLE_RATE);
    if out_len as u64 > MAX_CLIP_SECS * TARGET_SAMPLE_RATE as u64 {
        return Err(MoodlogError::audio(format!(
            "recording runs {} s at {} Hz; the limit is {} s",
            clip.frames() as u64 / clip.sample_rate as u64,
            clip.sample_rate,
            MAX_CLIP_SECS
        )));
    }
    let mono = downmix(&clip);
    Ok(resample(&mono, clip.sample_rate, TARGET_SAMPLE_RATE))
}
