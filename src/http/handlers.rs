use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::audio::ProviderError;
use crate::capture::{CaptureOutcome, SessionState, StartError};
use crate::chat::ChatMessage;
use crate::delivery::{FALLBACK_RESPONSE, FALLBACK_TRANSCRIPTION};

use super::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartCaptureRequest {
    /// Energy level below which a tick counts as silence (default from config)
    pub silence_threshold: Option<f32>,

    /// Contiguous silence before auto-stop, in milliseconds
    pub silence_timeout_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct StartCaptureResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StopCaptureResponse {
    pub status: String,
    /// Transcription of the captured audio, or the fallback text when
    /// delivery failed.
    pub transcription: Option<String>,
    pub response: Option<String>,
    pub outcome: Option<CaptureOutcome>,
}

#[derive(Debug, Serialize)]
pub struct CaptureStatusResponse {
    pub state: SessionState,
    pub last_outcome: Option<CaptureOutcome>,
}

#[derive(Debug, Deserialize)]
pub struct SaveChatsRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Capture Handlers
// ============================================================================

/// POST /capture/start
/// Start a new capture session; silence parameters override config defaults
pub async fn start_capture(
    State(state): State<AppState>,
    Json(req): Json<StartCaptureRequest>,
) -> impl IntoResponse {
    let mut config = state.defaults.clone();
    if let Some(threshold) = req.silence_threshold {
        config.silence_threshold = threshold;
    }
    if let Some(timeout_ms) = req.silence_timeout_ms {
        config.silence_timeout_ms = timeout_ms;
    }

    // Conversation context for the delivery sink, as of utterance start.
    let history = match state.chats.fetch().await {
        Ok(messages) => messages,
        Err(e) => {
            warn!("Chat history unavailable, starting with empty context: {}", e);
            Vec::new()
        }
    };

    match state.recorder.start(config, history).await {
        Ok(()) => {
            info!("Capture session started");
            (
                StatusCode::OK,
                Json(StartCaptureResponse {
                    status: "recording".to_string(),
                    message: "Recording started; will stop automatically after silence"
                        .to_string(),
                }),
            )
                .into_response()
        }
        Err(StartError::AlreadyActive) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "A capture session is already active".to_string(),
            }),
        )
            .into_response(),
        Err(StartError::Provider(ProviderError::PermissionDenied)) => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                error: "Microphone access denied".to_string(),
            }),
        )
            .into_response(),
        Err(StartError::Provider(e)) => {
            error!("Failed to start capture: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to start capture: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// POST /capture/stop
/// Stop the live session (no-op when idle) and return its outcome
pub async fn stop_capture(State(state): State<AppState>) -> impl IntoResponse {
    match state.recorder.stop().await {
        Some(outcome) => {
            let (transcription, response) = match &outcome.reply {
                Some(reply) => (reply.transcription.clone(), reply.response.clone()),
                None => (
                    FALLBACK_TRANSCRIPTION.to_string(),
                    FALLBACK_RESPONSE.to_string(),
                ),
            };
            (
                StatusCode::OK,
                Json(StopCaptureResponse {
                    status: "stopped".to_string(),
                    transcription: Some(transcription),
                    response: Some(response),
                    outcome: Some(outcome),
                }),
            )
        }
        None => (
            StatusCode::OK,
            Json(StopCaptureResponse {
                status: "idle".to_string(),
                transcription: None,
                response: None,
                outcome: None,
            }),
        ),
    }
}

/// GET /capture/status
/// Current session state plus the most recently finished outcome
pub async fn capture_status(State(state): State<AppState>) -> impl IntoResponse {
    // Harvest first so an auto-stopped session reads as idle with its outcome.
    let last_outcome = state.recorder.last_outcome().await;
    let session_state = state.recorder.state().await;

    (
        StatusCode::OK,
        Json(CaptureStatusResponse {
            state: session_state,
            last_outcome,
        }),
    )
}

// ============================================================================
// Chat Proxy Handlers
// ============================================================================

/// GET /chats
/// Proxy the ordered chat history from the upstream datastore
pub async fn get_chats(State(state): State<AppState>) -> impl IntoResponse {
    match state.chats.fetch().await {
        Ok(messages) => (StatusCode::OK, Json(messages)).into_response(),
        Err(e) => {
            error!("Error fetching chat history: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch chat history".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// POST /chats
/// Proxy a chat save to the upstream datastore, returning its ack
pub async fn save_chats(
    State(state): State<AppState>,
    Json(req): Json<SaveChatsRequest>,
) -> impl IntoResponse {
    match state.chats.save(&req.messages).await {
        Ok(ack) => (StatusCode::OK, Json(ack)).into_response(),
        Err(e) => {
            error!("Error saving chat: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to save chat".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
