use serde::{Deserialize, Serialize};

/// Per-session tuning for silence-based auto-stop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Energy level below which a tick counts as silence (0.0..=1.0).
    #[serde(default = "default_silence_threshold")]
    pub silence_threshold: f32,

    /// Contiguous silence required before the session stops itself.
    #[serde(default = "default_silence_timeout_ms")]
    pub silence_timeout_ms: u64,

    /// Polling cadence for energy samples and fragment collection.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_silence_threshold() -> f32 {
    0.01
}

fn default_silence_timeout_ms() -> u64 {
    2000
}

fn default_tick_interval_ms() -> u64 {
    100
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            silence_threshold: default_silence_threshold(),
            silence_timeout_ms: default_silence_timeout_ms(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl CaptureConfig {
    /// Clamp caller-supplied values into usable ranges.
    pub fn normalized(mut self) -> Self {
        self.silence_threshold = self.silence_threshold.clamp(0.0, 1.0);
        self.tick_interval_ms = self.tick_interval_ms.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CaptureConfig::default();
        assert_eq!(config.silence_threshold, 0.01);
        assert_eq!(config.silence_timeout_ms, 2000);
        assert_eq!(config.tick_interval_ms, 100);
    }

    #[test]
    fn test_normalized_clamps_out_of_range_values() {
        let config = CaptureConfig {
            silence_threshold: 1.5,
            silence_timeout_ms: 1500,
            tick_interval_ms: 0,
        }
        .normalized();

        assert_eq!(config.silence_threshold, 1.0);
        assert_eq!(config.tick_interval_ms, 1);
    }
}
