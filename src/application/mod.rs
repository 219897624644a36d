//! Application layer managing state and business workflows.
//!
//! This module coordinates between the domain layer and presentation layer:
//! the directory state machine, simulated request timing, notifications,
//! and the UI-facing application state.

pub mod directory;
pub mod notifications;
pub mod scheduler;
pub mod state;

pub use directory::*;
pub use notifications::*;
pub use scheduler::*;
pub use state::*;
