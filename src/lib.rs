//! Grid Snake - a terminal snake game
//!
//! This library provides:
//! - Core game logic, free of I/O (game module)
//! - Tick scheduling around the engine (schedule module)
//! - TUI rendering and keyboard input (render, input modules)
//! - The interactive play loop (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod schedule;
