use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::audio::{AudioProvider, AudioStream};
use crate::chat::ChatMessage;
use crate::delivery::{DeliverySink, SinkReply};

use super::config::CaptureConfig;
use super::error::{StartError, StopReason};
use super::recording::FinalizedRecording;
use super::silence::{SilenceDetector, SilenceVerdict};

/// Lifecycle of the capture component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No session; nothing holds the input device.
    Idle,
    /// Waiting for the provider to grant or refuse a stream.
    Requesting,
    /// Polling loop live, fragments accumulating.
    Recording,
    /// Loop halted; flushing fragments, releasing the stream, delivering.
    Finalizing,
}

/// Result of one finished capture session.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureOutcome {
    pub reason: StopReason,
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
    /// Audio duration of the finalized recording.
    pub audio_ms: u64,
    pub fragment_count: usize,
    pub sample_count: usize,
    /// Upstream transcription/response, when delivery succeeded.
    pub reply: Option<SinkReply>,
    /// Why delivery failed, when it did. The recording itself was still
    /// finalized; callers substitute their fallback messages.
    pub delivery_error: Option<String>,
}

/// Owns at most one live capture session plus the collaborators it needs.
///
/// The active stream, silence run, and fragment buffer all live inside the
/// session's polling task; the `Recorder` only holds the task handle and a
/// stop signal, so repeated start/stop cycles can never see stale state.
pub struct Recorder {
    provider: Arc<dyn AudioProvider>,
    sink: Arc<dyn DeliverySink>,
    state: Arc<Mutex<SessionState>>,
    active: Mutex<Option<ActiveSession>>,
    last_outcome: Mutex<Option<CaptureOutcome>>,
}

struct ActiveSession {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<CaptureOutcome>,
}

impl Recorder {
    pub fn new(provider: Arc<dyn AudioProvider>, sink: Arc<dyn DeliverySink>) -> Self {
        Self {
            provider,
            sink,
            state: Arc::new(Mutex::new(SessionState::Idle)),
            active: Mutex::new(None),
            last_outcome: Mutex::new(None),
        }
    }

    pub async fn state(&self) -> SessionState {
        *self.state.lock().await
    }

    /// Outcome of the most recently finished session, harvesting one that
    /// auto-stopped since the last call.
    pub async fn last_outcome(&self) -> Option<CaptureOutcome> {
        let finished = {
            let mut active = self.active.lock().await;
            let done = matches!(active.as_ref(), Some(session) if session.task.is_finished());
            if done {
                active.take()
            } else {
                None
            }
        };
        if let Some(session) = finished {
            self.harvest(session).await;
        }
        self.last_outcome.lock().await.clone()
    }

    /// Start a new capture session.
    ///
    /// Fails fast with `AlreadyActive` while a session is live; a second
    /// stream is never opened. `history` is the conversation context handed
    /// to the delivery sink alongside the finalized recording.
    pub async fn start(
        &self,
        config: CaptureConfig,
        history: Vec<ChatMessage>,
    ) -> Result<(), StartError> {
        let mut active = self.active.lock().await;

        match active.as_ref() {
            Some(session) if !session.task.is_finished() => {
                warn!("start rejected: a capture session is already active");
                return Err(StartError::AlreadyActive);
            }
            _ => {}
        }

        // A previous session that stopped itself still holds its outcome.
        if let Some(finished) = active.take() {
            self.harvest(finished).await;
        }

        let config = config.normalized();

        *self.state.lock().await = SessionState::Requesting;
        info!(
            "Requesting audio stream (threshold={}, timeout={}ms, tick={}ms)",
            config.silence_threshold, config.silence_timeout_ms, config.tick_interval_ms
        );

        let stream = match self.provider.request_stream().await {
            Ok(stream) => stream,
            Err(e) => {
                *self.state.lock().await = SessionState::Idle;
                warn!("Audio stream request failed: {}", e);
                return Err(e.into());
            }
        };

        let (stop_tx, stop_rx) = watch::channel(false);

        // State must read Recording before the task runs: a zero-timeout
        // session can finalize on its very first tick.
        *self.state.lock().await = SessionState::Recording;

        let task = tokio::spawn(run_session(
            stream,
            config,
            Arc::clone(&self.sink),
            history,
            Arc::clone(&self.state),
            stop_rx,
        ));

        *active = Some(ActiveSession { stop_tx, task });
        info!("Recording started");

        Ok(())
    }

    /// Stop the live session, if any, and return its outcome.
    ///
    /// Idempotent: with no session (started or finished) to account for,
    /// this is a no-op returning `None` and the sink is never invoked.
    pub async fn stop(&self) -> Option<CaptureOutcome> {
        let session = self.active.lock().await.take()?;

        // Signal first, then wait for the loop to flush and release the
        // stream. If the session already stopped itself this is a harvest.
        let _ = session.stop_tx.send(true);
        let outcome = match session.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Capture task panicked: {}", e);
                *self.state.lock().await = SessionState::Idle;
                return None;
            }
        };

        *self.last_outcome.lock().await = Some(outcome.clone());
        info!("Recording stopped ({:?})", outcome.reason);
        Some(outcome)
    }

    async fn harvest(&self, session: ActiveSession) {
        match session.task.await {
            Ok(outcome) => {
                *self.last_outcome.lock().await = Some(outcome);
            }
            Err(e) => {
                error!("Capture task panicked: {}", e);
                *self.state.lock().await = SessionState::Idle;
            }
        }
    }
}

/// The per-session polling loop, one spawned task per recording.
///
/// Single logical timeline: the loop is the only code that touches the
/// stream, and stop requests go through the watch channel, so no tick can
/// fire against a released resource.
async fn run_session(
    mut stream: Box<dyn AudioStream>,
    config: CaptureConfig,
    sink: Arc<dyn DeliverySink>,
    history: Vec<ChatMessage>,
    state: Arc<Mutex<SessionState>>,
    stop_rx: watch::Receiver<bool>,
) -> CaptureOutcome {
    let started_at = Utc::now();
    let mut detector = SilenceDetector::new(
        config.silence_threshold,
        config.silence_timeout_ms,
        config.tick_interval_ms,
    );
    let mut fragments: Vec<Vec<i16>> = Vec::new();

    let mut interval = tokio::time::interval(Duration::from_millis(config.tick_interval_ms));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let reason = loop {
        interval.tick().await;

        // Re-read the stop signal after every suspension. A value cached
        // across the await could let one extra tick run against a session
        // that is already stopping.
        if *stop_rx.borrow() {
            break StopReason::Manual;
        }

        if let Some(fragment) = stream.collect() {
            fragments.push(fragment);
        }

        match stream.poll() {
            None => {
                warn!("Audio stream lost mid-recording; finalizing partial capture");
                break StopReason::StreamInterrupted;
            }
            Some(sample) => match detector.observe(sample) {
                SilenceVerdict::Elapsed => {
                    info!(
                        "Silence timeout reached ({}ms); stopping",
                        config.silence_timeout_ms
                    );
                    break StopReason::SilenceTimeout;
                }
                SilenceVerdict::Sound | SilenceVerdict::Quiet => {}
            },
        }
    };

    // Finalizing: the loop has halted, so flush what the stream still
    // buffers, release it, then hand the artifact off.
    *state.lock().await = SessionState::Finalizing;

    if let Some(fragment) = stream.collect() {
        fragments.push(fragment);
    }
    let sample_rate = stream.sample_rate();
    let channels = stream.channels();
    stream.close();

    let recording = FinalizedRecording::from_fragments(fragments, sample_rate, channels);
    info!(
        "Recording finalized: {} fragments, {} samples, {}ms",
        recording.fragment_count(),
        recording.samples().len(),
        recording.duration_ms()
    );

    let (reply, delivery_error) = match sink.deliver(&recording, &history).await {
        Ok(reply) => (Some(reply), None),
        Err(e) => {
            error!("Delivery failed: {}", e);
            (None, Some(e.to_string()))
        }
    };

    *state.lock().await = SessionState::Idle;

    CaptureOutcome {
        reason,
        started_at,
        stopped_at: Utc::now(),
        audio_ms: recording.duration_ms(),
        fragment_count: recording.fragment_count(),
        sample_count: recording.samples().len(),
        reply,
        delivery_error,
    }
}
