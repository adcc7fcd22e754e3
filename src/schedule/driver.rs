use std::time::Duration;

use rand::{Rng, rngs::StdRng};
use tracing::{debug, info};

use super::ticker::Ticker;
use crate::game::{GameEngine, GameSession, Heading, Snapshot, StepOutcome};

/// Where the driven game currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first start command
    Idle,
    Running,
    GameOver,
}

/// Owns the engine, the one live session and the ticker that paces it.
///
/// Every mutation goes through `&mut self`, so a single owner serialises
/// steps, turns and restarts.
pub struct GameDriver<T: Ticker, R: Rng = StdRng> {
    engine: GameEngine<R>,
    session: GameSession,
    ticker: T,
    started: bool,
}

impl<T: Ticker, R: Rng> GameDriver<T, R> {
    /// Prepare a session without starting the ticker
    pub fn new(mut engine: GameEngine<R>, mut ticker: T) -> Self {
        ticker.stop();
        let session = engine.reset();
        Self {
            engine,
            session,
            ticker,
            started: false,
        }
    }

    /// Stop the old loop, start a fresh session and install the ticker at its speed
    pub fn restart(&mut self) -> Snapshot {
        self.ticker.stop();
        self.session = self.engine.reset();
        self.ticker.start(Self::interval(&self.session));
        self.started = true;
        info!(speed_ms = self.session.speed_ms, "ticker started");
        self.session.snapshot()
    }

    /// Forward a directional command to the engine
    pub fn turn(&mut self, heading: Heading) {
        self.engine.set_heading(&mut self.session, heading);
    }

    /// Advance the session by one tick and keep the ticker in step with it
    pub fn handle_tick(&mut self) -> StepOutcome {
        let outcome = self.engine.step(&mut self.session);

        if outcome.terminated {
            self.ticker.stop();
        } else if outcome.info.speed_changed {
            // Cancel before re-installing so the old interval cannot fire again
            self.ticker.stop();
            self.ticker.start(Self::interval(&self.session));
            debug!(speed_ms = self.session.speed_ms, "ticker re-installed");
        }

        outcome
    }

    /// Wait for the ticker. Never resolves while it is stopped.
    pub async fn next_tick(&mut self) {
        self.ticker.tick().await
    }

    pub fn phase(&self) -> Phase {
        if !self.started {
            Phase::Idle
        } else if self.session.is_game_over() {
            Phase::GameOver
        } else {
            Phase::Running
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }

    fn interval(session: &GameSession) -> Duration {
        Duration::from_millis(session.speed_ms)
    }
}
