use std::path::PathBuf;

use async_trait::async_trait;
use hound::WavReader;
use tracing::info;

use super::provider::{energy_from_pcm, AudioProvider, AudioStream, EnergySample, ProviderError};

/// Serves a WAV file as the capture input, one fragment per polling tick.
///
/// Stands in for live microphone capture during development and batch runs.
/// Energy per tick is the RMS of the fragment about to be collected, so
/// silence in the file auto-stops the session the way real silence would.
pub struct WavFileProvider {
    path: PathBuf,
    tick_interval_ms: u64,
}

impl WavFileProvider {
    pub fn new(path: impl Into<PathBuf>, tick_interval_ms: u64) -> Self {
        Self {
            path: path.into(),
            tick_interval_ms: tick_interval_ms.max(1),
        }
    }
}

#[async_trait]
impl AudioProvider for WavFileProvider {
    async fn request_stream(&self) -> Result<Box<dyn AudioStream>, ProviderError> {
        let reader = WavReader::open(&self.path)
            .map_err(|e| ProviderError::Unavailable(format!("{}: {e}", self.path.display())))?;

        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<_, _>>()
            .map_err(|e| ProviderError::Unavailable(format!("{}: {e}", self.path.display())))?;

        // One fragment covers one polling tick of audio.
        let fragment_len = (spec.sample_rate as u64 * spec.channels as u64 * self.tick_interval_ms
            / 1000)
            .max(1) as usize;

        info!(
            "Opened WAV input: {} ({} samples, {}Hz, {} channels)",
            self.path.display(),
            samples.len(),
            spec.sample_rate,
            spec.channels
        );

        Ok(Box::new(WavFileStream {
            samples,
            position: 0,
            fragment_len,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            closed: false,
        }))
    }
}

struct WavFileStream {
    samples: Vec<i16>,
    position: usize,
    fragment_len: usize,
    sample_rate: u32,
    channels: u16,
    closed: bool,
}

impl AudioStream for WavFileStream {
    fn poll(&mut self) -> Option<EnergySample> {
        if self.closed || self.position >= self.samples.len() {
            return None;
        }
        let end = (self.position + self.fragment_len).min(self.samples.len());
        Some(energy_from_pcm(&self.samples[self.position..end]))
    }

    fn collect(&mut self) -> Option<Vec<i16>> {
        if self.closed || self.position >= self.samples.len() {
            return None;
        }
        let end = (self.position + self.fragment_len).min(self.samples.len());
        let fragment = self.samples[self.position..end].to_vec();
        self.position = end;
        Some(fragment)
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> u16 {
        self.channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_wav(dir: &TempDir, samples: &[i16]) -> PathBuf {
        let path = dir.path().join("input.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        path
    }

    #[tokio::test]
    async fn test_file_stream_serves_tick_sized_fragments() {
        let dir = TempDir::new().unwrap();
        // 100ms ticks at 16kHz mono = 1600 samples per fragment.
        let path = write_wav(&dir, &vec![1000i16; 4000]);

        let provider = WavFileProvider::new(&path, 100);
        let mut stream = provider.request_stream().await.unwrap();

        assert_eq!(stream.sample_rate(), 16000);
        assert_eq!(stream.channels(), 1);

        assert!(stream.poll().unwrap() > 0.0);
        assert_eq!(stream.collect().unwrap().len(), 1600);
        assert_eq!(stream.collect().unwrap().len(), 1600);
        // Last fragment is the 800-sample remainder.
        assert_eq!(stream.collect().unwrap().len(), 800);
        assert_eq!(stream.collect(), None);
        assert_eq!(stream.poll(), None, "exhausted file reads as stream end");
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let provider = WavFileProvider::new("does/not/exist.wav", 100);
        match provider.request_stream().await {
            Err(ProviderError::Unavailable(_)) => {}
            other => panic!("expected Unavailable, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_closed_stream_stops_serving() {
        let dir = TempDir::new().unwrap();
        let path = write_wav(&dir, &vec![500i16; 3200]);

        let provider = WavFileProvider::new(&path, 100);
        let mut stream = provider.request_stream().await.unwrap();
        stream.close();

        assert_eq!(stream.poll(), None);
        assert_eq!(stream.collect(), None);
    }
}
