use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use std::{fs::File, path::PathBuf};

use spinwheel::audio::fanfare_length;
use spinwheel::ui::run_tui;
use spinwheel::{run_spin, App, AudioFeedback, Config, ItemStore, SoundPlayer, SpinEngine};

/// spinwheel - Spin a wheel of choices in your terminal
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Path to a TOML config file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Item to put on the wheel; repeat to add more (replaces configured items)
    #[clap(short, long = "item", value_name = "LABEL")]
    items: Vec<String>,

    /// Animation frames per second
    #[clap(long)]
    fps: Option<u32>,

    /// Start with sound effects off
    #[clap(short, long)]
    mute: bool,

    /// Seed for reproducible spins
    #[clap(long)]
    seed: Option<u64>,

    /// Spin once without the interface and print the winner
    #[clap(long)]
    once: bool,

    /// Write logs to this file
    #[clap(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,
}

fn init_logging(args: &Args) -> Result<()> {
    let level = if args.debug { "debug" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));

    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    } else if !args.once {
        // Log lines would corrupt the terminal interface
        builder.filter_level(log::LevelFilter::Off);
    }

    builder.init();
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let config = config.with_overrides(args.items.clone(), args.fps, args.mute, args.seed)?;
    debug!("Using config: {:?}", config);
    Ok(config)
}

/// Spins once on a timer and prints the winning label
async fn spin_once(config: &Config) -> Result<()> {
    let mut sound = AudioFeedback::new();
    sound.set_muted(config.muted);

    let mut engine = config.seed.map(SpinEngine::with_seed).unwrap_or_default();
    let items = ItemStore::with_labels(&config.items);

    let result = run_spin(&mut engine, items.items(), &mut sound, config.fps).await?;
    println!("{}", result.item.label);

    // Let the fanfare finish before the stream is dropped
    if !sound.is_muted() && sound.is_available() {
        tokio::time::sleep(fanfare_length()).await;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = load_config(&args)?;
    info!("Starting spinwheel with {} items", config.items.len());

    if args.once {
        return spin_once(&config).await;
    }

    let mut app = App::new(&config, Box::new(AudioFeedback::new()));
    run_tui(&mut app, config.frame_period()).context("Terminal interface failed")?;

    info!("Exiting spinwheel");
    Ok(())
}
