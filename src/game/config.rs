use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{heading::Heading, state::Position};

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid, in cells
    pub grid_width: usize,
    /// Height of the game grid, in cells
    pub grid_height: usize,
    /// Cell the single-segment snake starts on
    pub origin: Position,
    /// Heading applied on the first step
    pub initial_heading: Heading,

    // Speed progression
    /// Tick interval at the start of a game, in milliseconds
    pub initial_speed_ms: u64,
    /// The tick interval never drops below this
    pub min_speed_ms: u64,
    /// Amount the interval shrinks at each speed-up
    pub speed_step_ms: u64,

    // Scoring
    /// Points awarded per food eaten
    pub food_score: u32,
    /// Speed goes up each time the score lands on a multiple of this
    pub speed_up_every: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            origin: Position::new(5, 5),
            initial_heading: Heading::Right,
            initial_speed_ms: 150,
            min_speed_ms: 50,
            speed_step_ms: 10,
            food_score: 10,
            speed_up_every: 50,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Derive the grid from a board size and a cell size, both in pixels.
    ///
    /// A 400x400 board with 20px cells gives the default 20x20 grid. Partial
    /// cells at the right and bottom edges are dropped.
    pub fn from_board(board_width: usize, board_height: usize, cell_size: usize) -> Result<Self> {
        ensure!(cell_size > 0, "cell size must be positive");
        Ok(Self::new(board_width / cell_size, board_height / cell_size))
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_width > 0 && self.grid_height > 0,
            "grid dimensions must be positive, got {}x{}",
            self.grid_width,
            self.grid_height
        );
        ensure!(
            i32::try_from(self.grid_width).is_ok() && i32::try_from(self.grid_height).is_ok(),
            "grid dimensions {}x{} are too large",
            self.grid_width,
            self.grid_height
        );
        ensure!(
            self.contains(self.origin),
            "origin ({}, {}) lies outside the {}x{} grid",
            self.origin.x,
            self.origin.y,
            self.grid_width,
            self.grid_height
        );
        ensure!(self.min_speed_ms > 0, "minimum speed must be positive");
        ensure!(
            self.initial_speed_ms >= self.min_speed_ms,
            "initial speed {}ms is below the minimum {}ms",
            self.initial_speed_ms,
            self.min_speed_ms
        );
        ensure!(self.food_score > 0, "food score must be positive");
        ensure!(self.speed_up_every > 0, "speed-up threshold must be positive");
        Ok(())
    }

    /// Check if a position is within the grid bounds
    pub fn contains(&self, pos: Position) -> bool {
        pos.is_within(self.grid_width, self.grid_height)
    }
}
