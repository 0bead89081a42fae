//! Terminal front end: LCD view, keypad emulation and action log

pub mod keypad;
pub mod lcd_view;
pub mod state;
pub mod terminal;

pub use keypad::{button_for_key, KeypadEmulator};
pub use state::{GameUI, LogCategory, LogEntry};
pub use terminal::TerminalGuard;
