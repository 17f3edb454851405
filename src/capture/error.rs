use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::ProviderError;

/// Why `start()` was rejected. No state changes when one of these comes back.
#[derive(Debug, Error)]
pub enum StartError {
    /// A session is already recording; the existing stream is left untouched.
    #[error("a capture session is already active")]
    AlreadyActive,

    /// The audio provider refused or failed the stream request.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// What ended a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Explicit stop from the caller.
    Manual,
    /// The contiguous silence run reached the configured timeout.
    SilenceTimeout,
    /// The device disappeared mid-recording; partial audio was still finalized.
    StreamInterrupted,
}
