//! Voice capture session management
//!
//! This module owns the recording lifecycle:
//! - Acquiring an audio stream from an [`crate::audio::AudioProvider`]
//! - Polling signal energy on a fixed cadence
//! - Silence detection and auto-stop after a contiguous quiet run
//! - Finalizing buffered fragments into an immutable recording
//! - Handing the artifact to a [`crate::delivery::DeliverySink`]

mod config;
mod error;
mod recording;
mod session;
mod silence;

pub use config::CaptureConfig;
pub use error::{StartError, StopReason};
pub use recording::FinalizedRecording;
pub use session::{CaptureOutcome, Recorder, SessionState};
pub use silence::{SilenceDetector, SilenceVerdict};
