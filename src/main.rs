//! Expression game driven by recorded landmark frames.

use anyhow::{Context, Result};
use clap::Parser;
use expression_quest::{
    app::GameApp,
    classifier::Expression,
    config::{Config, EXAMPLE_CONFIG},
    events::LogEvents,
    replay::JsonLinesReplay,
};
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Landmark recording to replay (JSON Lines, one frame per line)
    replay: Option<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Comma-separated target sequence overriding the configuration
    #[arg(short, long, value_delimiter = ',')]
    targets: Option<Vec<String>>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print an example configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    info!("Expression Quest");

    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        Config::from_file(config_path).with_context(|| format!("Failed to load config {config_path}"))?
    } else {
        Config::default()
    };

    if let Some(targets) = &args.targets {
        config.game.target_sequence = targets
            .iter()
            .map(|t| t.parse::<Expression>())
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid --targets")?;
    }

    config.validate().context("Invalid configuration")?;

    let replay_path = args
        .replay
        .context("A landmark replay file is required (see --help)")?;
    let source = JsonLinesReplay::from_path(&replay_path)
        .with_context(|| format!("Failed to open replay {replay_path}"))?;

    let mut app = GameApp::new(&config, Box::new(source), Box::new(LogEvents))?;
    let summary = app.run()?;

    let snapshot = &summary.snapshot;
    info!(
        "Processed {} frames ({} without a face)",
        summary.frames_processed, summary.no_face_frames
    );
    info!(
        "State: {:?}, level {}/{}, score {}, progress {:.0}%",
        snapshot.state, snapshot.level, snapshot.total_levels, snapshot.score, snapshot.progress_percent
    );
    if let Some(target) = snapshot.current_target.filter(|_| !snapshot.completed) {
        info!("Waiting for: {}", target.description());
    }

    Ok(())
}
