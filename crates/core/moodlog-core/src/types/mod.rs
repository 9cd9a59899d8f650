//! Shared domain types

pub mod emotion;

pub use emotion::{stress_target, EmotionLabel, NEUTRAL_TARGET};
