//! Chat history types and the upstream persistence client.

mod message;
mod store;

pub use message::{ChatMessage, Role};
pub use store::ChatStore;
