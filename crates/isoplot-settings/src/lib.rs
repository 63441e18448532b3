//! Isoplot Settings Crate
//!
//! Loads, validates and saves the engine and logging configuration.

pub mod config;
pub mod error;

pub use config::{Config, LoggingSettings};
pub use error::{SettingsError, SettingsResult};
