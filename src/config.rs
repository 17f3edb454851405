use anyhow::Result;
use serde::Deserialize;

use crate::capture::CaptureConfig;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub upstream: UpstreamConfig,
    pub audio: AudioConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the speech/response backend (also hosts /chats).
    pub api_base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    /// WAV file served as the capture input. Live microphone capture is the
    /// host environment's concern; anything implementing `AudioProvider`
    /// can be wired in instead.
    pub input_path: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
