//! session-build: compiles the authored CSV sheets into the app's JSON tree.
//!
//! Stages can be run one at a time:
//! - `sessions`: surveys around the doses and every domain's doses
//! - `surveys`: end-of-day, reasons-for-ending and progress tracking
//! - `resources`: the on-demand resource library

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tracing::info;

use session_core::{Config, Pipeline, DEFAULT_CONFIG_FILE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Stage {
    Sessions,
    Surveys,
    Resources,
    All,
}

#[derive(Parser)]
#[command(name = "session-build")]
#[command(about = "Compile MindTrails Movement content sheets into session JSON")]
struct Cli {
    /// Stage to build
    #[arg(value_enum, default_value = "all")]
    stage: Stage,

    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Directory of the authored CSV sheets (overrides config file)
    #[arg(long, env = "MTM_CSV_DIR")]
    csv_dir: Option<PathBuf>,

    /// Output root (overrides config file)
    #[arg(short, long, env = "MTM_OUT_DIR")]
    out_dir: Option<PathBuf>,

    /// Directory referenced images must exist in (overrides config file)
    #[arg(long, env = "MTM_MEDIA_DIR")]
    media_dir: Option<PathBuf>,

    /// Shuffle seed (overrides config file)
    #[arg(long, env = "MTM_SEED")]
    seed: Option<u64>,

    /// Do not check that referenced images exist
    #[arg(long)]
    skip_media_check: bool,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("session_core=info".parse()?)
        )
        .init();

    let cli = Cli::parse();

    info!("Config file: {}", cli.config);
    let mut config = Config::load(Path::new(&cli.config))?;

    // Apply CLI overrides
    if let Some(csv_dir) = cli.csv_dir {
        config.csv_dir = csv_dir;
    }
    if let Some(out_dir) = cli.out_dir {
        config.out_dir = out_dir;
    }
    if let Some(media_dir) = cli.media_dir {
        config.media_dir = media_dir;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if cli.skip_media_check {
        config.verify_media = false;
    }

    info!("CSV dir: {}", config.csv_dir.display());
    info!("Output dir: {}", config.out_dir.display());
    info!("Seed: {}", config.seed);

    let mut pipeline = Pipeline::new(config);
    let written = match cli.stage {
        Stage::Sessions => pipeline.run_sessions()?,
        Stage::Surveys => pipeline.run_surveys()?,
        Stage::Resources => pipeline.run_library()?,
        Stage::All => pipeline.run_all()?,
    };

    info!(files = written, "Build complete");
    Ok(())
}
