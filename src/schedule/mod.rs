//! Pacing for the game engine.
//!
//! The engine only knows how to take one step; this module decides when a
//! step happens and keeps the tick interval in line with the session's speed.

pub mod driver;
pub mod ticker;

pub use driver::{GameDriver, Phase};
pub use ticker::{ManualTicker, Ticker, TokioTicker};
