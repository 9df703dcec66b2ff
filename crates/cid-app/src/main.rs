use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cid_app::autoplay::AutoPlayer;
use cid_app::game_loop::LoopOptions;
use cid_app::renderer::{JsonLinesRenderer, LogRenderer, Renderer};
use cid_app::state::AppState;
use cid_core::constants::TICK_RATE;
use cid_sim::engine::{SimConfig, SimulationEngine};

#[derive(Parser, Debug)]
#[command(name = "cid-defender")]
#[command(about = "Headless CID Defender session driven by an auto-player")]
struct Args {
    /// JSON file with session configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed, overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Chance the auto-player answers a question correctly
    #[arg(long, default_value_t = 0.75)]
    accuracy: f64,

    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,

    /// Simulation ticks per second
    #[arg(long, default_value_t = TICK_RATE)]
    tick_rate: u32,

    /// Pace ticks to wall-clock time instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Write every snapshot as a JSON line to this file
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn load_config(path: &Path) -> anyhow::Result<SimConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    ensure!(
        (0.0..=1.0).contains(&args.accuracy),
        "--accuracy must be between 0 and 1"
    );
    ensure!(args.tick_rate > 0, "--tick-rate must be positive");

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    info!(seed = config.seed, max_waves = config.max_waves, "starting session");

    let engine = SimulationEngine::new(config.clone()).context("failed to load question bank")?;
    let renderer: Box<dyn Renderer> = match &args.dump {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Box::new(JsonLinesRenderer::new(BufWriter::new(file)))
        }
        None => Box::new(LogRenderer::default()),
    };
    let options = LoopOptions {
        tick_rate: args.tick_rate,
        max_ticks: args.ticks,
        realtime: args.realtime,
        stop_on_end: true,
        autoplayer: Some(AutoPlayer::new(args.accuracy, config.seed.wrapping_add(1))),
    };

    let state = AppState::new();
    state.start(engine, options, renderer)?;
    let summary = state.wait()?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
