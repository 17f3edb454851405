use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::capture::FinalizedRecording;
use crate::chat::{ChatMessage, ChatStore, Role};

use super::sink::{DeliveryError, DeliverySink, SinkReply};

/// Request body for the upstream speech endpoint: base64 WAV plus the
/// conversation so far (roles and content only).
#[derive(Serialize)]
struct ProcessAudioRequest<'a> {
    audio: String,
    history: Vec<HistoryEntry<'a>>,
}

#[derive(Serialize)]
struct HistoryEntry<'a> {
    role: Role,
    content: &'a str,
}

#[derive(Deserialize)]
struct ProcessAudioResponse {
    transcription: String,
    response: String,
}

/// Delivers recordings to the speech/response backend over HTTP, then
/// persists the extended chat history.
pub struct HttpDeliverySink {
    client: reqwest::Client,
    base_url: String,
    chats: ChatStore,
}

impl HttpDeliverySink {
    pub fn new(base_url: impl Into<String>, chats: ChatStore) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            chats,
        }
    }
}

#[async_trait]
impl DeliverySink for HttpDeliverySink {
    async fn deliver(
        &self,
        recording: &FinalizedRecording,
        history: &[ChatMessage],
    ) -> Result<SinkReply, DeliveryError> {
        let wav = recording
            .to_wav_bytes()
            .map_err(|e| DeliveryError::Encode(e.to_string()))?;

        let body = ProcessAudioRequest {
            audio: base64::engine::general_purpose::STANDARD.encode(&wav),
            history: history
                .iter()
                .map(|m| HistoryEntry {
                    role: m.role,
                    content: &m.content,
                })
                .collect(),
        };

        let url = format!("{}/process-audio", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DeliveryError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DeliveryError::Rejected(response.status().as_u16()));
        }

        let parsed: ProcessAudioResponse = response
            .json()
            .await
            .map_err(|e| DeliveryError::Malformed(e.to_string()))?;

        info!(
            "Recording delivered: {}ms of audio transcribed to {} chars",
            recording.duration_ms(),
            parsed.transcription.len()
        );

        // Best-effort persistence of the extended conversation; a failed
        // save must not turn a successful delivery into an error.
        let mut messages = history.to_vec();
        messages.push(ChatMessage::new(Role::User, parsed.transcription.clone()));
        messages.push(ChatMessage::new(Role::Assistant, parsed.response.clone()));
        if let Err(e) = self.chats.save(&messages).await {
            warn!("Failed to persist chat history: {}", e);
        }

        Ok(SinkReply {
            transcription: parsed.transcription,
            response: parsed.response,
        })
    }
}
