//! usrdir - Terminal User Directory Library
//!
//! A terminal user-management table with add, edit and delete forms,
//! backed by an in-memory directory and a simulated slow backend.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
