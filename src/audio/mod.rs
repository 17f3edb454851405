pub mod file;
pub mod provider;
pub mod scripted;

pub use file::WavFileProvider;
pub use provider::{
    energy_from_bins, energy_from_pcm, AudioProvider, AudioStream, EnergySample, ProviderError,
};
pub use scripted::{ScriptedProbe, ScriptedProvider};
