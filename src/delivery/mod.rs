//! Delivery of finalized recordings to the speech/response backend.

mod http;
mod sink;

pub use http::HttpDeliverySink;
pub use sink::{
    DeliveryError, DeliverySink, SinkReply, FALLBACK_RESPONSE, FALLBACK_TRANSCRIPTION,
};
