use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, info};

use crate::game::GameEngine;
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::schedule::{GameDriver, Phase, Ticker, TokioTicker};

/// Keyboard play in the terminal
pub struct HumanMode<T: Ticker = TokioTicker> {
    driver: GameDriver<T>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode<TokioTicker> {
    pub fn new(engine: GameEngine) -> Self {
        Self::with_ticker(engine, TokioTicker::new())
    }
}

impl<T: Ticker> HumanMode<T> {
    pub fn with_ticker(engine: GameEngine, ticker: T) -> Self {
        Self {
            driver: GameDriver::new(engine, ticker),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS, independent of the game speed
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(&event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Pends forever while the game is idle or over
                _ = self.driver.next_tick() => {
                    self.on_tick();
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    let snapshot = self.driver.snapshot();
                    let phase = self.driver.phase();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, phase, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!("quit requested");
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: &Event) {
        match self.input_handler.handle_event(event) {
            KeyAction::Turn(heading) => self.driver.turn(heading),
            KeyAction::Restart => self.start_game(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn on_tick(&mut self) {
        let outcome = self.driver.handle_tick();
        if outcome.terminated {
            self.metrics.on_game_over(outcome.snapshot.score);
            info!(
                score = outcome.snapshot.score,
                high_score = self.metrics.high_score,
                games_played = self.metrics.games_played,
                "game finished"
            );
        }
    }

    /// Throw away whatever game is in progress and start a fresh one
    fn start_game(&mut self) {
        if self.driver.phase() == Phase::Running {
            debug!(score = self.driver.session().score, "abandoning running game");
        }
        self.driver.restart();
        self.metrics.on_game_start();
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
