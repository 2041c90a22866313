//! Platform abstraction layer
//!
//! Translates host events (keyboard) into simulation commands.

pub mod input;

pub use input::{Disposition, Key, KeyAction, KeyEvent};
