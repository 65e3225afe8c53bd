//! Key mapping from terminal events to flight commands.

use crate::types::InputCommand;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to flight commands.
pub fn handle_key_event(key: KeyEvent) -> Option<InputCommand> {
    if should_quit(key) {
        return Some(InputCommand::Quit);
    }

    match key.code {
        // Thrust
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(InputCommand::ThrustUp),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(InputCommand::ThrustDown),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(InputCommand::ThrustLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(InputCommand::ThrustRight)
        }

        // Stages
        KeyCode::Char(' ') => Some(InputCommand::ToggleStage),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
