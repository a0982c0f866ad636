//! Bolo API Library Crate
//!
//! This library contains all the logic for the language-practice web
//! service: application state, configuration, API handlers, and routing.
//! The `bin/api.rs` binary is a thin wrapper around this library.

pub mod audio;
pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
