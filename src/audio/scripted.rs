use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::provider::{AudioProvider, AudioStream, EnergySample, ProviderError};

/// Deterministic in-memory provider: plays back a fixed sequence of energy
/// samples and serves index-tagged fragments. Used by the session tests and
/// handy for demos without a real input device.
pub struct ScriptedProvider {
    energies: Vec<f32>,
    fragment_len: usize,
    deny: bool,
    probe: ScriptedProbe,
}

/// Shared counters observing a scripted stream from the outside.
#[derive(Clone, Default)]
pub struct ScriptedProbe {
    polls: Arc<AtomicUsize>,
    collects: Arc<AtomicUsize>,
    closed: Arc<AtomicBool>,
}

impl ScriptedProbe {
    /// Energy samples consumed so far.
    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    /// Fragments handed out so far.
    pub fn collects(&self) -> usize {
        self.collects.load(Ordering::SeqCst)
    }

    /// Whether the most recent stream has been released.
    pub fn stream_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl ScriptedProvider {
    pub fn new(energies: Vec<f32>) -> Self {
        Self {
            energies,
            fragment_len: 4,
            deny: false,
            probe: ScriptedProbe::default(),
        }
    }

    /// Provider that refuses every stream request.
    pub fn denying() -> Self {
        Self {
            energies: Vec::new(),
            fragment_len: 0,
            deny: true,
            probe: ScriptedProbe::default(),
        }
    }

    /// Samples per fragment returned by `collect` (0 disables fragments).
    pub fn with_fragment_len(mut self, len: usize) -> Self {
        self.fragment_len = len;
        self
    }

    pub fn probe(&self) -> ScriptedProbe {
        self.probe.clone()
    }
}

#[async_trait]
impl AudioProvider for ScriptedProvider {
    async fn request_stream(&self) -> Result<Box<dyn AudioStream>, ProviderError> {
        if self.deny {
            return Err(ProviderError::PermissionDenied);
        }
        self.probe.closed.store(false, Ordering::SeqCst);
        Ok(Box::new(ScriptedStream {
            energies: self.energies.iter().copied().collect(),
            fragment_len: self.fragment_len,
            next_fragment: 0,
            probe: self.probe.clone(),
        }))
    }
}

struct ScriptedStream {
    energies: VecDeque<f32>,
    fragment_len: usize,
    next_fragment: i16,
    probe: ScriptedProbe,
}

impl AudioStream for ScriptedStream {
    fn poll(&mut self) -> Option<EnergySample> {
        // An exhausted script behaves like a device that went away.
        let sample = self.energies.pop_front()?;
        self.probe.polls.fetch_add(1, Ordering::SeqCst);
        Some(sample)
    }

    fn collect(&mut self) -> Option<Vec<i16>> {
        if self.fragment_len == 0 {
            return None;
        }
        let tag = self.next_fragment;
        self.next_fragment = self.next_fragment.wrapping_add(1);
        self.probe.collects.fetch_add(1, Ordering::SeqCst);
        Some(vec![tag; self.fragment_len])
    }

    fn close(&mut self) {
        self.probe.closed.store(true, Ordering::SeqCst);
    }

    fn sample_rate(&self) -> u32 {
        16000
    }

    fn channels(&self) -> u16 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_stream_playback() {
        let provider = ScriptedProvider::new(vec![0.5, 0.2]).with_fragment_len(2);
        let probe = provider.probe();

        let mut stream = provider.request_stream().await.unwrap();
        assert_eq!(stream.poll(), Some(0.5));
        assert_eq!(stream.collect(), Some(vec![0, 0]));
        assert_eq!(stream.collect(), Some(vec![1, 1]));
        assert_eq!(stream.poll(), Some(0.2));
        assert_eq!(stream.poll(), None, "exhausted script reads as device loss");

        stream.close();
        assert_eq!(probe.polls(), 2);
        assert_eq!(probe.collects(), 2);
        assert!(probe.stream_closed());
    }

    #[tokio::test]
    async fn test_denying_provider() {
        let provider = ScriptedProvider::denying();
        match provider.request_stream().await {
            Err(ProviderError::PermissionDenied) => {}
            other => panic!("expected PermissionDenied, got {:?}", other.map(|_| ())),
        }
    }
}
