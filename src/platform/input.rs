//! Keyboard mapping
//!
//! Movement keys are claimed before the host's own shortcut handling sees
//! them. A `Consumed` disposition tells the host to stop propagation.

use crate::sim::{ControlMode, MoveCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Q,
    E,
    Other,
}

impl Key {
    /// Map a DOM-style `KeyboardEvent.key` value, case-insensitively
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "w" => Key::W,
            "a" => Key::A,
            "s" => Key::S,
            "d" => Key::D,
            "arrowup" => Key::Up,
            "arrowdown" => Key::Down,
            "arrowleft" => Key::Left,
            "arrowright" => Key::Right,
            "q" => Key::Q,
            "e" => Key::E,
            _ => Key::Other,
        }
    }

    /// WASD and arrows; these clear `moving` on release
    pub fn is_movement(&self) -> bool {
        !matches!(self, Key::Q | Key::E | Key::Other)
    }

    /// Command for a key press in the given mode
    pub fn command(&self, mode: ControlMode) -> Option<MoveCommand> {
        match self {
            Key::W | Key::Up => Some(MoveCommand::Forward),
            Key::S | Key::Down => Some(MoveCommand::Back),
            Key::A | Key::Left => Some(MoveCommand::Left),
            Key::D | Key::Right => Some(MoveCommand::Right),
            Key::Q if mode == ControlMode::Relative => Some(MoveCommand::TurnLeft),
            Key::E if mode == ControlMode::Relative => Some(MoveCommand::TurnRight),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub action: KeyAction,
}

impl KeyEvent {
    pub fn down(key: Key) -> Self {
        Self {
            key,
            action: KeyAction::Down,
        }
    }

    pub fn up(key: Key) -> Self {
        Self {
            key,
            action: KeyAction::Up,
        }
    }
}

/// Whether the host should keep processing the event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Handled here; prevent default and stop propagation
    Consumed,
    PassThrough,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(Key::from_name("W"), Key::W);
        assert_eq!(Key::from_name("ArrowLeft"), Key::Left);
        assert_eq!(Key::from_name("Enter"), Key::Other);
    }

    #[test]
    fn test_turn_keys_only_in_relative_mode() {
        assert_eq!(Key::Q.command(ControlMode::Absolute), None);
        assert_eq!(
            Key::Q.command(ControlMode::Relative),
            Some(MoveCommand::TurnLeft)
        );
        assert_eq!(
            Key::E.command(ControlMode::Relative),
            Some(MoveCommand::TurnRight)
        );
        assert_eq!(Key::Up.command(ControlMode::Absolute), Some(MoveCommand::Forward));
        assert!(!Key::Q.is_movement());
        assert!(Key::Down.is_movement());
    }
}
