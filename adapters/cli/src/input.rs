//! Keyboard mapping from terminal key events to player intents.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use snake_arena_core::Operation;

/// Intent captured from a single key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Steer(Operation),
    Quit,
}

/// Maps a key press to an intent; releases and unbound keys map to nothing.
pub(crate) fn map_key(event: KeyEvent) -> Option<Input> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let input = match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Input::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Input::Quit,
        KeyCode::Up | KeyCode::Char('w' | 'k') => Input::Steer(Operation::MoveUp),
        KeyCode::Down | KeyCode::Char('s' | 'j') => Input::Steer(Operation::MoveDown),
        KeyCode::Left | KeyCode::Char('a' | 'h') => Input::Steer(Operation::MoveLeft),
        KeyCode::Right | KeyCode::Char('d' | 'l') => Input::Steer(Operation::MoveRight),
        _ => return None,
    };
    Some(input)
}
