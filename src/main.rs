use anyhow::Result;
use clap::Parser;
use grid_snake::game::{GameConfig, GameEngine};
use grid_snake::logging;
use grid_snake::modes::HumanMode;
use std::path::PathBuf;

const DEFAULT_BOARD_PX: usize = 400;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Classic snake in the terminal")]
struct Cli {
    /// Grid width in cells (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// Board width in pixels (default 400); the grid is this divided by --cell-size
    #[arg(long, requires = "cell_size")]
    board_width: Option<usize>,

    /// Board height in pixels (default 400); the grid is this divided by --cell-size
    #[arg(long, requires = "cell_size")]
    board_height: Option<usize>,

    /// Cell size in pixels; derives the grid from the board size
    #[arg(long, conflicts_with_all = ["width", "height"])]
    cell_size: Option<usize>,

    /// JSON game configuration; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter directive, e.g. "grid_snake=debug" (defaults to RUST_LOG)
    #[arg(long, requires = "log_file")]
    log_level: Option<String>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        if let Some(cell_size) = self.cell_size {
            let board = GameConfig::from_board(
                self.board_width.unwrap_or(DEFAULT_BOARD_PX),
                self.board_height.unwrap_or(DEFAULT_BOARD_PX),
                cell_size,
            )?;
            config.grid_width = board.grid_width;
            config.grid_height = board.grid_height;
        }
        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        logging::init_file_logging(path, cli.log_level.as_deref())?;
    }

    // Validation happens here, before the terminal is taken over
    let config = cli.game_config()?;
    let engine = match cli.seed {
        Some(seed) => GameEngine::seeded(config, seed)?,
        None => GameEngine::new(config)?,
    };

    let mut human_mode = HumanMode::new(engine);
    human_mode.run().await?;

    Ok(())
}
