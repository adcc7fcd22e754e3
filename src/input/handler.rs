use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::game::Heading;

/// What a key press asks the game to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Heading),
    /// Start a game, or a new one once the current one is over
    Restart,
    Quit,
    None,
}

/// Maps terminal keys onto game commands
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Translate any terminal event. Only key presses count; releases,
    /// repeats, resizes and mouse events are dropped.
    pub fn handle_event(&self, event: &Event) -> KeyAction {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(*key),
            _ => KeyAction::None,
        }
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('w' | 'W') => KeyAction::Turn(Heading::Up),
            KeyCode::Down | KeyCode::Char('s' | 'S') => KeyAction::Turn(Heading::Down),
            KeyCode::Left | KeyCode::Char('a' | 'A') => KeyAction::Turn(Heading::Left),
            KeyCode::Right | KeyCode::Char('d' | 'D') => KeyAction::Turn(Heading::Right),

            KeyCode::Char('q' | 'Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r' | 'R' | ' ') | KeyCode::Enter => KeyAction::Restart,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
