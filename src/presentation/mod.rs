//! Presentation layer handling terminal UI and user input.
//!
//! This module renders the user table, the form popup and the toast stack
//! with ratatui, and maps key presses onto application actions.

pub mod input;
pub mod modal;
pub mod ui;

pub use input::*;
pub use modal::*;
pub use ui::*;
