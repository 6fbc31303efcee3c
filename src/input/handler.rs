use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

/// Player steered with the arrow keys
pub const ARROWS_PLAYER: usize = 0;
/// Player steered with W/A/S/D
pub const WASD_PLAYER: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Turn { player: usize, direction: Direction },
    NewGame,
    Stop,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // First player - Arrow keys
            KeyCode::Up => turn(ARROWS_PLAYER, Direction::Up),
            KeyCode::Down => turn(ARROWS_PLAYER, Direction::Down),
            KeyCode::Left => turn(ARROWS_PLAYER, Direction::Left),
            KeyCode::Right => turn(ARROWS_PLAYER, Direction::Right),

            // Second player - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => turn(WASD_PLAYER, Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => turn(WASD_PLAYER, Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => turn(WASD_PLAYER, Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => turn(WASD_PLAYER, Direction::Right),

            // Controls
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::F(2) => KeyAction::NewGame,
            KeyCode::Char('x') | KeyCode::Char('X') => KeyAction::Stop,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

fn turn(player: usize, direction: Direction) -> KeyAction {
    KeyAction::Turn { player, direction }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
