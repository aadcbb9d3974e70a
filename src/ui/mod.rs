// User Interface module
// Handles the terminal user interface

pub mod commands;
pub mod terminal_ui;
pub mod widgets;

// Re-export important types
pub use commands::{Command, CommandHandler, CommandProcessor};
pub use terminal_ui::{draw_ui, run_tui, TerminalUI, UiAction};
