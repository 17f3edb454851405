use std::io::Cursor;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

/// Immutable output of a finished capture session: the ordered concatenation
/// of every buffered fragment, produced exactly once per session.
#[derive(Debug, Clone)]
pub struct FinalizedRecording {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
    fragment_count: usize,
    captured_at: DateTime<Utc>,
}

impl FinalizedRecording {
    pub fn from_fragments(fragments: Vec<Vec<i16>>, sample_rate: u32, channels: u16) -> Self {
        let fragment_count = fragments.len();
        let samples: Vec<i16> = fragments.into_iter().flatten().collect();
        Self {
            samples,
            sample_rate,
            channels,
            fragment_count,
            captured_at: Utc::now(),
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn fragment_count(&self) -> usize {
        self.fragment_count
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Audio duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0;
        }
        self.samples.len() as u64 * 1000 / (self.sample_rate as u64 * self.channels as u64)
    }

    /// Encode as a 16-bit PCM WAV payload.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        let spec = hound::WavSpec {
            channels: self.channels.max(1),
            sample_rate: self.sample_rate.max(1),
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .context("Failed to create WAV writer")?;
            for &sample in &self.samples {
                writer
                    .write_sample(sample)
                    .context("Failed to write sample to WAV payload")?;
            }
            writer
                .finalize()
                .context("Failed to finalize WAV payload")?;
        }

        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragments_concatenate_in_order() {
        let fragments = vec![vec![1i16, 2, 3], vec![4, 5], vec![6]];
        let recording = FinalizedRecording::from_fragments(fragments, 16000, 1);

        assert_eq!(recording.samples(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(recording.fragment_count(), 3);
    }

    #[test]
    fn test_empty_session_yields_empty_recording() {
        let recording = FinalizedRecording::from_fragments(Vec::new(), 16000, 1);
        assert!(recording.is_empty());
        assert_eq!(recording.fragment_count(), 0);
        assert_eq!(recording.duration_ms(), 0);
    }

    #[test]
    fn test_duration_from_sample_count() {
        // 16000 mono samples at 16kHz = 1 second.
        let recording = FinalizedRecording::from_fragments(vec![vec![0i16; 16000]], 16000, 1);
        assert_eq!(recording.duration_ms(), 1000);

        // Interleaved stereo halves the duration.
        let stereo = FinalizedRecording::from_fragments(vec![vec![0i16; 16000]], 16000, 2);
        assert_eq!(stereo.duration_ms(), 500);
    }

    #[test]
    fn test_wav_payload_round_trips() {
        let fragments = vec![vec![100i16, -200, 300], vec![-400, 500]];
        let recording = FinalizedRecording::from_fragments(fragments, 16000, 1);

        let bytes = recording.to_wav_bytes().unwrap();
        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec().sample_rate, 16000);
        assert_eq!(reader.spec().channels, 1);

        let decoded: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, recording.samples());
    }
}
