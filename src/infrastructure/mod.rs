//! Infrastructure layer providing external service integrations.
//!
//! This module contains the configuration file loader, the logging setup,
//! and the in-memory stand-in for the user backend.

pub mod config;
pub mod logging;
pub mod mock_backend;

pub use config::*;
pub use logging::*;
pub use mock_backend::*;
