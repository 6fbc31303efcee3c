use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use duel_snake::game::GameConfig;
use duel_snake::modes::DuelMode;
use log::{LevelFilter, info};
use simplelog::{Config, WriteLogger};

#[derive(Parser)]
#[command(name = "duel_snake")]
#[command(version, about = "Two-player snake on a wraparound grid")]
struct Cli {
    /// JSON game configuration; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Milliseconds between game ticks
    #[arg(long)]
    period_ms: Option<u64>,

    /// Foods on the field at the start of a round
    #[arg(long)]
    foods: Option<usize>,

    /// Segments gained per food eaten
    #[arg(long)]
    grow: Option<i32>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the log (the terminal belongs to the game)
    #[arg(long, default_value = "duel_snake.log")]
    log_file: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Cli {
    /// Build the game configuration from the optional file and the flags
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(period_ms) = self.period_ms {
            config.tick_period_ms = period_ms;
        }
        if let Some(foods) = self.foods {
            config.food_count = foods;
        }
        if let Some(grow) = self.grow {
            config.food_increase = grow;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(path: &Path, level: LogLevel) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    WriteLogger::init(level.into(), Config::default(), file).context("Failed to initialize logger")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_file, cli.log_level)?;

    let config = cli.game_config()?;
    info!("starting with {:?}", config);

    let mut duel_mode = DuelMode::new(config)?;
    duel_mode.run().await?;

    Ok(())
}
