//! Stress score smoothing and the stressometer read-out
//!
//! The score is a single scalar in `[0, 10]` that moves 30% of the way toward
//! the target of each classified emotion and is rounded to one decimal.
//! Nothing clamps it: every target lies in `[2.0, 9.5]` and the score starts
//! at 5.0, so a convex combination can never leave the band.

use crate::types::emotion::stress_target;
use serde::{Deserialize, Serialize};

/// Starting score for a new session
pub const INITIAL_STRESS: f64 = 5.0;

/// Weight kept from the previous score
pub const RETAIN_WEIGHT: f64 = 0.7;

/// Weight given to the emotion target
pub const TARGET_WEIGHT: f64 = 0.3;

/// Above this the UI starts shaking
pub const SHAKE_THRESHOLD: f64 = 8.5;

/// Round half away from zero at one decimal
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// One smoothing step toward the emotion's target
///
/// `update(5.0, "anger") == 6.4`; unknown emotions pull toward 5.0.
pub fn update(current: f64, emotion: &str) -> f64 {
    let target = stress_target(emotion);
    round1(current * RETAIN_WEIGHT + target * TARGET_WEIGHT)
}

/// Smoothed stress score owned by a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StressScore(f64);

impl Default for StressScore {
    fn default() -> Self {
        Self(INITIAL_STRESS)
    }
}

impl StressScore {
    /// Wrap a raw value
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Current value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Apply one classified emotion, returning the new value
    pub fn apply(&mut self, emotion: &str) -> f64 {
        let previous = self.0;
        self.0 = update(previous, emotion);
        tracing::debug!(
            emotion = %emotion,
            previous = previous,
            next = self.0,
            "Stress score updated"
        );
        self.0
    }

    /// Read-out for the sidebar widget
    pub fn indicator(&self) -> StressIndicator {
        StressIndicator::from_score(self.0)
    }

    /// Whether the page should shake
    pub fn is_critical_shake(&self) -> bool {
        is_critical_shake(self.0)
    }
}

/// Whether a score is high enough to shake the page
pub fn is_critical_shake(score: f64) -> bool {
    score > SHAKE_THRESHOLD
}

/// Severity band of the stressometer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressBand {
    Zen,
    Fine,
    Okay,
    Warn,
    Crit,
}

impl StressBand {
    /// Band for a score, strict less-than thresholds
    pub fn from_score(score: f64) -> Self {
        if score < 3.0 {
            StressBand::Zen
        } else if score < 5.0 {
            StressBand::Fine
        } else if score < 7.0 {
            StressBand::Okay
        } else if score < 9.0 {
            StressBand::Warn
        } else {
            StressBand::Crit
        }
    }

    /// CSS theme class
    pub fn theme(&self) -> &'static str {
        match self {
            StressBand::Zen => "s-zen",
            StressBand::Fine => "s-happy",
            StressBand::Okay => "s-neutral",
            StressBand::Warn => "s-warn",
            StressBand::Crit => "s-crit",
        }
    }

    /// Accent color
    pub fn color(&self) -> &'static str {
        match self {
            StressBand::Zen => "#00ff00",
            StressBand::Fine => "#ffff00",
            StressBand::Okay => "#ffffff",
            StressBand::Warn => "#ff8800",
            StressBand::Crit => "#ff0000",
        }
    }

    /// Status label
    pub fn label(&self) -> &'static str {
        match self {
            StressBand::Zen => "ZEN",
            StressBand::Fine => "FINE",
            StressBand::Okay => "OKAY",
            StressBand::Warn => "WARN",
            StressBand::Crit => "CRIT",
        }
    }
}

/// Emoji for an integer level, 😐 outside 0..=10
pub fn level_emoji(level: i64) -> &'static str {
    match level {
        0 => "🧘",
        1 => "😌",
        2 => "🙂",
        3 => "😐",
        4 => "😕",
        5 => "😟",
        6 => "😰",
        7 => "😣",
        8 => "😖",
        9 => "😫",
        10 => "🤯",
        _ => "😐",
    }
}

/// Everything the sidebar needs to draw the stressometer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressIndicator {
    pub score: f64,
    pub level: i64,
    pub emoji: &'static str,
    pub band: StressBand,
    pub theme: &'static str,
    pub color: &'static str,
    pub label: &'static str,
    /// Fill height of the vertical bar, percent, capped at 100
    pub bar_height: f64,
    /// Integer load percentage
    pub load_percent: i64,
}

impl StressIndicator {
    /// Pure mapping from score to read-out
    pub fn from_score(score: f64) -> Self {
        // Halves round up, matching the one-decimal score rounding.
        let level = score.round() as i64;
        let band = StressBand::from_score(score);
        // Scores carry one decimal; the nudge keeps 8.7 * 10 from truncating to 86.
        let load_percent = (score * 10.0 + 1e-9).trunc() as i64;
        Self {
            score,
            level,
            emoji: level_emoji(level),
            band,
            theme: band.theme(),
            color: band.color(),
            label: band.label(),
            bar_height: (score * 10.0).min(100.0),
            load_percent,
        }
    }
}
