use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use voxchat::{
    create_router, AppState, ChatStore, Config, HttpDeliverySink, Recorder, WavFileProvider,
};

#[derive(Debug, Parser)]
#[command(name = "voxchat", about = "Voice chat capture service")]
struct Cli {
    /// Configuration file, without extension (`config` crate convention)
    #[arg(short, long, default_value = "config/voxchat")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("{} starting", cfg.service.name);
    info!("Upstream backend: {}", cfg.upstream.api_base_url);
    info!("Audio input: {}", cfg.audio.input_path);

    let chats = ChatStore::new(cfg.upstream.api_base_url.clone());
    let provider = Arc::new(WavFileProvider::new(
        &cfg.audio.input_path,
        cfg.capture.tick_interval_ms,
    ));
    let sink = Arc::new(HttpDeliverySink::new(
        cfg.upstream.api_base_url.clone(),
        chats.clone(),
    ));
    let recorder = Arc::new(Recorder::new(provider, sink));

    let state = AppState::new(recorder, chats, cfg.capture.clone());
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .context("HTTP server exited")?;

    Ok(())
}
