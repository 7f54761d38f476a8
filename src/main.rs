//! sfxmix demo player - main entry point
//!
//! Plays a looping music track and/or a set of one-shot sound effects
//! through the mixing engine, exercising the full public surface: load,
//! queue, crossfade, pause/resume, shutdown.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sfxmix::{AudioEngine, EngineConfig, MAX_VOLUME};

/// Command-line arguments for the sfxmix demo player
#[derive(Parser, Debug)]
#[command(name = "sfxmix")]
#[command(about = "Demo player for the sfxmix mixing engine")]
#[command(version)]
struct Args {
    /// Looping music track to play
    #[arg(short, long)]
    music: Option<PathBuf>,

    /// One-shot sound effects, played one second apart
    sounds: Vec<PathBuf>,

    /// Playback volume, 0-128
    #[arg(short, long, default_value_t = MAX_VOLUME)]
    volume: u8,

    /// Seconds to keep playing before shutting down
    #[arg(short, long, default_value_t = 10)]
    duration: u64,

    /// Optional TOML engine configuration file
    #[arg(short, long, env = "SFXMIX_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sfxmix=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = match args.config.as_ref() {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str::<EngineConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    let mut engine = AudioEngine::new(config);
    if !engine.is_enabled() {
        info!("No audio device available; running silently");
    }

    if let Some(music) = args.music.as_ref() {
        info!("Playing music: {}", music.display());
        engine.play_music(music, args.volume);
    }

    for sound in &args.sounds {
        thread::sleep(Duration::from_secs(1));
        info!("Playing sound: {}", sound.display());
        engine.play_sound(sound, args.volume);
    }

    thread::sleep(Duration::from_secs(args.duration));

    info!("Shutting down");
    engine.shutdown();

    Ok(())
}
