//! Canned reply bank keyed by emotion
//!
//! The bank is a JSON object of `emotion -> [reply, ...]` read once at
//! startup. It must always answer, so every load failure degrades to a
//! single-entry bank under `neutral`.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use std::path::Path;

/// Key every bank must carry; unknown emotions resolve here
pub const FALLBACK_KEY: &str = "neutral";

/// Reply used when no bank could be loaded
pub const DEFAULT_REPLY: &str = "System stable.";

/// Emotion-keyed collection of reply strings
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyBank {
    buckets: HashMap<String, Vec<String>>,
}

impl Default for ReplyBank {
    fn default() -> Self {
        let mut buckets = HashMap::new();
        buckets.insert(FALLBACK_KEY.to_string(), vec![DEFAULT_REPLY.to_string()]);
        Self { buckets }
    }
}

impl ReplyBank {
    /// Load a bank from a JSON file, falling back to the default bank on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Reply bank unreadable, using default bank");
                return Self::default();
            }
        };
        match Self::from_json(&raw) {
            Some(bank) => {
                tracing::info!(
                    path = %path.display(),
                    buckets = bank.buckets.len(),
                    "✓ Loaded reply bank"
                );
                bank
            }
            None => {
                tracing::warn!(path = %path.display(), "Reply bank malformed, using default bank");
                Self::default()
            }
        }
    }

    /// Parse a bank from JSON text; `None` when malformed or lacking `neutral`
    pub fn from_json(raw: &str) -> Option<Self> {
        let parsed: HashMap<String, Vec<String>> = serde_json::from_str(raw).ok()?;
        Self::from_map(parsed)
    }

    /// Build from a map; keys are lowercased and empty buckets dropped
    pub fn from_map(map: HashMap<String, Vec<String>>) -> Option<Self> {
        let mut buckets: HashMap<String, Vec<String>> = HashMap::new();
        for (key, replies) in map {
            if replies.is_empty() {
                continue;
            }
            buckets
                .entry(key.trim().to_lowercase())
                .or_default()
                .extend(replies);
        }
        if !buckets.contains_key(FALLBACK_KEY) {
            return None;
        }
        Some(Self { buckets })
    }

    /// Candidates for an emotion after case folding and fallback
    pub fn candidates(&self, emotion: &str) -> &[String] {
        let key = emotion.trim().to_lowercase();
        self.buckets
            .get(&key)
            .or_else(|| self.buckets.get(FALLBACK_KEY))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Pick a reply uniformly at random
    pub fn reply(&self, emotion: &str) -> String {
        self.reply_with(emotion, &mut rand::thread_rng())
    }

    /// Pick a reply with a caller-supplied RNG
    pub fn reply_with<R: Rng + ?Sized>(&self, emotion: &str, rng: &mut R) -> String {
        self.candidates(emotion)
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| DEFAULT_REPLY.to_string())
    }

    /// Whether a bucket exists for this emotion (case-insensitive)
    pub fn has_bucket(&self, emotion: &str) -> bool {
        self.buckets.contains_key(&emotion.trim().to_lowercase())
    }

    /// Number of emotion buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Never true for a constructed bank; kept for API symmetry
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Write;

    fn sample_bank() -> ReplyBank {
        ReplyBank::from_json(
            r#"{
                "joy": ["Signal bright.", "Keep broadcasting."],
                "neutral": ["Logged.", "Holding steady.", "Noted."],
                "Anger": ["Vent the steam."]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_default_bank() {
        let bank = ReplyBank::default();
        assert_eq!(bank.reply("anything"), DEFAULT_REPLY);
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn test_mixed_case_lookup() {
        let bank = sample_bank();
        for _ in 0..20 {
            let reply = bank.reply("JOY");
            assert!(bank.candidates("joy").contains(&reply));
        }
    }

    #[test]
    fn test_keys_lowercased_on_load() {
        let bank = sample_bank();
        assert!(bank.has_bucket("anger"));
        assert_eq!(bank.reply("anger"), "Vent the steam.");
    }

    #[test]
    fn test_unknown_falls_back_to_neutral() {
        let bank = sample_bank();
        let neutral = bank.candidates("neutral").to_vec();
        for _ in 0..20 {
            assert!(neutral.contains(&bank.reply("unknown_emotion")));
        }
    }

    #[test]
    fn test_mixed_case_without_bucket_falls_back() {
        let bank = ReplyBank::default();
        assert_eq!(bank.reply("JOY"), DEFAULT_REPLY);
    }

    #[test]
    fn test_seeded_selection_is_reproducible() {
        let bank = sample_bank();
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            assert_eq!(bank.reply_with("neutral", &mut a), bank.reply_with("neutral", &mut b));
        }
    }

    #[test]
    fn test_selection_reaches_every_candidate() {
        let bank = sample_bank();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(bank.reply_with("neutral", &mut rng));
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_missing_neutral_rejected() {
        assert!(ReplyBank::from_json(r#"{"joy": ["yay"]}"#).is_none());
        assert!(ReplyBank::from_json(r#"{"neutral": [], "joy": ["yay"]}"#).is_none());
    }

    #[test]
    fn test_malformed_shapes_rejected() {
        assert!(ReplyBank::from_json("not json").is_none());
        assert!(ReplyBank::from_json(r#"["neutral"]"#).is_none());
        assert!(ReplyBank::from_json(r#"{"neutral": "just a string"}"#).is_none());
        assert!(ReplyBank::from_json(r#"{"neutral": [1, 2]}"#).is_none());
    }

    #[test]
    fn test_load_missing_file_uses_default() {
        let bank = ReplyBank::load("/definitely/not/here/replies.json");
        assert_eq!(bank, ReplyBank::default());
    }

    #[test]
    fn test_load_malformed_file_uses_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ broken").unwrap();
        assert_eq!(ReplyBank::load(file.path()), ReplyBank::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"neutral": ["Static hum."], "sadness": ["Rain on the wire."]}}"#
        )
        .unwrap();
        let bank = ReplyBank::load(file.path());
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.reply("Sadness"), "Rain on the wire.");
    }
}
