//! Per-character delay policy.

use std::time::Duration;

use crate::config::RevealConfig;

/// The delay policy for one piece of text.
///
/// Pure: build it once per text (length-based pre-scaling of the base delay
/// happens here, exactly once), then ask it for each character's delay.
#[derive(Debug, Clone)]
pub struct TimingPolicy {
    base_ms: f32,
    min_ms: f32,
    max_ms: f32,
    smart: bool,
    space_factor: f32,
    punctuation_factor: f32,
    newline_factor: f32,
}

impl TimingPolicy {
    /// Builds the policy for a text of `total_chars` characters.
    ///
    /// Very long texts collapse to the minimum delay and moderately long
    /// ones halve it, a display-smoothness heuristic applied before any
    /// per-character rule.
    pub fn for_text(config: &RevealConfig, total_chars: usize) -> Self {
        let base_ms = if total_chars >= config.very_long_message_char_threshold {
            config.min_delay_ms as f32
        } else if total_chars >= config.long_message_char_threshold {
            config.base_delay_ms as f32 / 2.0
        } else {
            config.base_delay_ms as f32
        };
        Self {
            base_ms,
            min_ms: config.min_delay_ms as f32,
            max_ms: config.max_delay_ms as f32,
            smart: config.smart_timing_enabled,
            space_factor: config.space_factor,
            punctuation_factor: config.punctuation_factor,
            newline_factor: config.newline_factor,
        }
    }

    /// Delay to wait before revealing `c`.
    pub fn delay_for(&self, c: char) -> Duration {
        let ms = if !self.smart {
            self.base_ms
        } else if c == '\n' {
            self.base_ms * self.newline_factor
        } else if c.is_whitespace() {
            self.base_ms * self.space_factor
        } else if matches!(c, ',' | '.' | '!' | '?' | ':' | ';') {
            self.base_ms * self.punctuation_factor
        } else {
            self.base_ms
        };
        // max wins over min if the configured range is inverted; validate()
        // is where bad ranges get rejected.
        let clamped = ms.max(self.min_ms).min(self.max_ms);
        Duration::from_micros((clamped * 1000.0).round() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RevealConfig {
        RevealConfig {
            base_delay_ms: 10,
            min_delay_ms: 2,
            max_delay_ms: 25,
            smart_timing_enabled: true,
            long_message_char_threshold: 100,
            very_long_message_char_threshold: 1000,
            space_factor: 0.5,
            punctuation_factor: 2.0,
            newline_factor: 4.0,
        }
    }

    #[test]
    fn test_smart_mode_off_always_base() {
        let mut cfg = config();
        cfg.smart_timing_enabled = false;
        let policy = TimingPolicy::for_text(&cfg, 10);

        for c in ['a', ' ', '\n', '.'] {
            assert_eq!(policy.delay_for(c), Duration::from_millis(10));
        }
    }

    #[test]
    fn test_per_character_factors() {
        let policy = TimingPolicy::for_text(&config(), 10);

        assert_eq!(policy.delay_for('a'), Duration::from_millis(10));
        assert_eq!(policy.delay_for(' '), Duration::from_millis(5));
        assert_eq!(policy.delay_for('.'), Duration::from_millis(20));
        // 10 * 4.0 = 40ms, clamped to the 25ms max.
        assert_eq!(policy.delay_for('\n'), Duration::from_millis(25));
    }

    #[test]
    fn test_clamped_to_min() {
        let mut cfg = config();
        cfg.space_factor = 0.01;
        let policy = TimingPolicy::for_text(&cfg, 10);

        assert_eq!(policy.delay_for(' '), Duration::from_millis(2));
    }

    #[test]
    fn test_long_text_halves_base() {
        let policy = TimingPolicy::for_text(&config(), 100);
        assert_eq!(policy.delay_for('a'), Duration::from_millis(5));
    }

    #[test]
    fn test_very_long_text_uses_min() {
        let policy = TimingPolicy::for_text(&config(), 1000);
        assert_eq!(policy.delay_for('a'), Duration::from_millis(2));
    }
}
