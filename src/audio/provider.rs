use async_trait::async_trait;
use thiserror::Error;

/// Signal energy for one polling tick, normalized to [0, 1].
pub type EnergySample = f32;

/// Errors from acquiring an audio input stream.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Microphone access was refused. Terminal for this attempt; the caller
    /// decides whether to ask again.
    #[error("microphone permission denied")]
    PermissionDenied,

    /// Device missing, busy, or otherwise unusable.
    #[error("audio input unavailable: {0}")]
    Unavailable(String),
}

/// Source of audio input streams (microphone, file, scripted playback).
#[async_trait]
pub trait AudioProvider: Send + Sync {
    /// Request a new input stream. Resolves once access has been granted
    /// or refused.
    async fn request_stream(&self) -> Result<Box<dyn AudioStream>, ProviderError>;
}

/// An open audio input stream, exclusively owned by one capture session.
pub trait AudioStream: Send {
    /// Read the current signal energy. `None` means the device was lost
    /// mid-stream; the session treats that as an implicit stop.
    fn poll(&mut self) -> Option<EnergySample>;

    /// Drain any PCM buffered since the last call.
    fn collect(&mut self) -> Option<Vec<i16>>;

    /// Release the underlying device and any analysis resources.
    fn close(&mut self);

    fn sample_rate(&self) -> u32;

    fn channels(&self) -> u16;
}

/// Average byte-valued frequency bins into a [0, 1] energy level.
pub fn energy_from_bins(bins: &[u8]) -> EnergySample {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u32 = bins.iter().map(|&b| b as u32).sum();
    sum as f32 / bins.len() as f32 / 255.0
}

/// RMS of a PCM fragment, normalized to [0, 1].
pub fn energy_from_pcm(samples: &[i16]) -> EnergySample {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: i64 = samples
        .iter()
        .map(|&sample| {
            let s = sample as i64;
            s * s
        })
        .sum();
    let mean_square = sum_squares as f64 / samples.len() as f64;
    (mean_square.sqrt() / 32768.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bins_are_silent() {
        assert_eq!(energy_from_bins(&[]), 0.0);
    }

    #[test]
    fn test_bins_normalize_to_unit_range() {
        assert_eq!(energy_from_bins(&[0, 0, 0, 0]), 0.0);
        assert!((energy_from_bins(&[255; 8]) - 1.0).abs() < f32::EPSILON);

        let mid = energy_from_bins(&[128; 16]);
        assert!(mid > 0.49 && mid < 0.51);
    }

    #[test]
    fn test_pcm_silence_has_zero_energy() {
        let silence = vec![0i16; 512];
        assert_eq!(energy_from_pcm(&silence), 0.0);
    }

    #[test]
    fn test_pcm_full_scale_energy() {
        let full_scale = vec![32767i16; 512];
        let energy = energy_from_pcm(&full_scale);
        assert!((energy - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_pcm_sine_wave_rms() {
        let sine: Vec<i16> = (0..512)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * i as f32 / 512.0;
                (phase.sin() * 16384.0) as i16
            })
            .collect();

        // RMS of a half-scale sine is 0.5 / sqrt(2).
        let energy = energy_from_pcm(&sine);
        assert!((energy - 0.354).abs() < 0.01);
    }
}
