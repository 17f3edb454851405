//! HTTP API server for the voice chat client
//!
//! This module provides a REST API for driving capture and chat history:
//! - POST /capture/start - Start a capture session
//! - POST /capture/stop - Stop the live session
//! - GET /capture/status - Query session state and last outcome
//! - GET /chats - Proxy chat history from the upstream datastore
//! - POST /chats - Proxy a chat save upstream
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
