//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The engine never touches a timer; whoever drives it decides when a tick happens.

pub mod config;
pub mod engine;
pub mod heading;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use engine::{GameEngine, StepInfo, StepOutcome};
pub use heading::Heading;
pub use state::{CollisionType, GameSession, Position, Snake, Snapshot};
