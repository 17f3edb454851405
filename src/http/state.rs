use std::sync::Arc;

use crate::capture::{CaptureConfig, Recorder};
use crate::chat::ChatStore;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single capture component; at most one live session inside.
    pub recorder: Arc<Recorder>,

    /// Upstream chat datastore client.
    pub chats: ChatStore,

    /// File-config capture defaults; per-request overrides go on top.
    pub defaults: CaptureConfig,
}

impl AppState {
    pub fn new(recorder: Arc<Recorder>, chats: ChatStore, defaults: CaptureConfig) -> Self {
        Self {
            recorder,
            chats,
            defaults,
        }
    }
}
