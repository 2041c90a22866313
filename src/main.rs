//! Solar Town entry point
//!
//! The browser build embeds the library directly. Natively this runs a
//! scripted headless mission and prints the final snapshot as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use solar_town::consts::FRAME_DT;
use solar_town::platform::{Key, KeyEvent};
use solar_town::sim::GameEvent;
use solar_town::{MissionConfig, QualityPreset, Session, Settings, logging};

/// Headless Solar Town mission runner
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Mission config JSON (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the mission seed
    #[arg(short, long)]
    seed: Option<u64>,
    /// Lamps to switch on, by slot id
    #[arg(short, long, value_delimiter = ',', default_values_t = [7u32, 14, 21, 28])]
    lamps: Vec<u32>,
    /// Simulated seconds to play before finishing (the timer may end it first)
    #[arg(short = 't', long, default_value_t = 30.0)]
    play_secs: f32,
    /// Effects quality: low, medium or high
    #[arg(short, long, default_value = "medium", value_parser = parse_quality)]
    quality: QualityPreset,
    /// Mission id reported on commit
    #[arg(short, long, default_value = "solar-town-demo")]
    mission: String,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_quality(s: &str) -> Result<QualityPreset, String> {
    QualityPreset::parse(s).ok_or_else(|| format!("unknown quality preset '{s}'"))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);
    log::info!("Solar Town (native) starting...");

    let mut config = match &args.config {
        Some(path) => MissionConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => MissionConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let settings = Settings::from_preset(args.quality);
    log::info!(
        "Quality {} (up to {} effects)",
        settings.quality.as_str(),
        settings.max_effects()
    );
    let mut session = Session::new(config, settings).context("mission setup")?;
    session.start();
    for &id in &args.lamps {
        if !session.place(id) {
            log::warn!("Lamp {} does not exist", id);
        }
    }

    // Stroll right for a while, then stop
    let frames = (args.play_secs / FRAME_DT).round() as u32;
    for frame in 0..frames {
        if frame % 10 == 0 && frame < frames / 2 {
            session.key_event(KeyEvent::down(Key::D));
        }
        if frame == frames / 2 {
            session.key_event(KeyEvent::up(Key::D));
        }
        session.frame(FRAME_DT);
        for event in session.drain_events() {
            if let GameEvent::Completed { metrics } = event {
                log::info!("Timer ended the mission at energy {}", metrics.energy);
            }
        }
    }

    session.complete();
    if let Some(done) = session.complete_and_commit(&args.mission) {
        log::info!(
            "Committed {}: {} lamps, happiness {}",
            done.mission_id,
            done.devices_placed,
            done.metrics.happiness
        );
    }

    let json = serde_json::to_string_pretty(&session.snapshot())?;
    println!("{json}");

    session.teardown();
    Ok(())
}
