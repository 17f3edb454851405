use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capture::FinalizedRecording;
use crate::chat::ChatMessage;

/// Transcription and assistant response for one delivered recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkReply {
    pub transcription: String,
    pub response: String,
}

/// Why a delivery attempt failed. Never fatal to the session: finalization
/// has already completed by the time the sink runs.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to encode recording: {0}")]
    Encode(String),

    #[error("delivery endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("delivery endpoint returned status {0}")]
    Rejected(u16),

    #[error("malformed delivery response: {0}")]
    Malformed(String),
}

/// Receives finalized recordings, alongside the conversation context they
/// belong to, and returns the upstream transcription and response.
#[async_trait]
pub trait DeliverySink: Send + Sync {
    async fn deliver(
        &self,
        recording: &FinalizedRecording,
        history: &[ChatMessage],
    ) -> Result<SinkReply, DeliveryError>;
}

/// User-visible stand-ins when delivery fails.
pub const FALLBACK_TRANSCRIPTION: &str = "Failed to transcribe audio";
pub const FALLBACK_RESPONSE: &str = "Sorry, I encountered an error processing your request.";
