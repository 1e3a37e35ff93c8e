use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::drill_engine::{
    error::ConfigError,
    narrator::VoiceSettings,
    session::{DEFAULT_COMPLETION_MESSAGE, DEFAULT_TOTAL_ROUNDS},
};

pub const DEFAULT_LOCALE: &str = "en-US";
pub const DEFAULT_FEEDBACK_DELAY_MS: u64 = 1500;

/// Drill settings. Every field has a default, so a partial JSON document
/// (or `{}`) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillConfig {
    /// Correct answers needed to finish.
    pub total_rounds: u32,
    /// How long wrong-answer feedback stays up before a new exercise.
    pub feedback_delay_ms: u64,
    pub locale: String,
    pub voice: VoiceSettings,
    /// `Some` makes every drill reproducible.
    pub rng_seed: Option<u64>,
    pub completion_message: String,
}

impl Default for DrillConfig {
    fn default() -> Self {
        DrillConfig {
            total_rounds: DEFAULT_TOTAL_ROUNDS,
            feedback_delay_ms: DEFAULT_FEEDBACK_DELAY_MS,
            locale: DEFAULT_LOCALE.to_string(),
            voice: VoiceSettings::default(),
            rng_seed: None,
            completion_message: DEFAULT_COMPLETION_MESSAGE.to_string(),
        }
    }
}

impl DrillConfig {
    /// Parse and validate. The document must be a JSON object.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(ConfigError::NotAnObject);
        }
        let config: DrillConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_rounds == 0 {
            return Err(ConfigError::InvalidTotalRounds(self.total_rounds));
        }
        if self.locale.trim().is_empty() {
            return Err(ConfigError::EmptyLocale);
        }
        let v = self.voice;
        if !(v.rate > 0.0 && v.rate <= 10.0) {
            return Err(ConfigError::InvalidRate(v.rate));
        }
        if !(0.0..=2.0).contains(&v.pitch) {
            return Err(ConfigError::InvalidPitch(v.pitch));
        }
        if !(0.0..=1.0).contains(&v.volume) {
            return Err(ConfigError::InvalidVolume(v.volume));
        }
        Ok(())
    }

    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }
}
