pub mod audio;
pub mod capture;
pub mod chat;
pub mod config;
pub mod delivery;
pub mod http;

pub use audio::{
    AudioProvider, AudioStream, EnergySample, ProviderError, ScriptedProbe, ScriptedProvider,
    WavFileProvider,
};
pub use capture::{
    CaptureConfig, CaptureOutcome, FinalizedRecording, Recorder, SessionState, SilenceDetector,
    SilenceVerdict, StartError, StopReason,
};
pub use chat::{ChatMessage, ChatStore, Role};
pub use config::Config;
pub use delivery::{DeliveryError, DeliverySink, HttpDeliverySink, SinkReply};
pub use http::{create_router, AppState};
