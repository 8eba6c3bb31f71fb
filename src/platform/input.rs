//! Input mapping
//!
//! Raw keys become abstract commands. What a key means depends on the mode:
//! during name entry every printable key is a typed character.

use crate::game::Mode;

/// Raw key (or window) events from the device layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Backspace,
    Space,
    Left,
    Right,
    Char(char),
    /// Window closed
    Close,
}

/// Abstract command consumed by the game controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// Held this frame
    MoveLeft,
    /// Held this frame
    MoveRight,
    Fire,
    Confirm,
    Backspace,
    Character(char),
    Back,
    Restart,
    ViewRanking,
}

/// Map one key to a command for the given mode
pub fn map_key(key: Key, mode: Mode) -> Option<Command> {
    match key {
        Key::Close => Some(Command::Quit),
        Key::Left => Some(Command::MoveLeft),
        Key::Right => Some(Command::MoveRight),
        Key::Enter => Some(Command::Confirm),
        Key::Escape => Some(Command::Back),
        Key::Backspace => Some(Command::Backspace),
        Key::Space if mode == Mode::EnterName => Some(Command::Character(' ')),
        Key::Space => Some(Command::Fire),
        Key::Char(c) if mode == Mode::EnterName => Some(Command::Character(c)),
        Key::Char('r' | 'R') => match mode {
            Mode::Menu => Some(Command::ViewRanking),
            Mode::GameOver => Some(Command::Restart),
            _ => None,
        },
        Key::Char(_) => None,
    }
}
