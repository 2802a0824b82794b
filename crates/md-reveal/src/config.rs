//! Reveal timing configuration.

use serde::{Deserialize, Serialize};

/// Timing knobs for reveal sessions.
///
/// Passed explicitly at engine construction; there is no ambient global
/// state. All delays are milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Delay between character ticks before any per-character adjustment.
    pub base_delay_ms: u64,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// When off, every character waits exactly the base delay.
    pub smart_timing_enabled: bool,
    /// At this many characters the base delay is halved.
    pub long_message_char_threshold: usize,
    /// At this many characters the base delay collapses to the minimum.
    pub very_long_message_char_threshold: usize,
    pub space_factor: f32,
    pub punctuation_factor: f32,
    pub newline_factor: f32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 12,
            min_delay_ms: 1,
            max_delay_ms: 80,
            smart_timing_enabled: true,
            long_message_char_threshold: 600,
            very_long_message_char_threshold: 2000,
            space_factor: 0.4,
            punctuation_factor: 2.5,
            newline_factor: 3.0,
        }
    }
}

/// Rejected configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("min delay {min}ms exceeds max delay {max}ms")]
    DelayRangeInverted { min: u64, max: u64 },

    #[error("max delay must be non-zero")]
    ZeroMaxDelay,

    #[error("{name} factor must be non-negative, got {value}")]
    NegativeFactor { name: &'static str, value: f32 },
}

impl RevealConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_delay_ms == 0 {
            return Err(ConfigError::ZeroMaxDelay);
        }
        if self.min_delay_ms > self.max_delay_ms {
            return Err(ConfigError::DelayRangeInverted {
                min: self.min_delay_ms,
                max: self.max_delay_ms,
            });
        }
        for (name, value) in [
            ("space", self.space_factor),
            ("punctuation", self.punctuation_factor),
            ("newline", self.newline_factor),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeFactor { name, value });
            }
        }
        Ok(())
    }
}
