//! Tilawa CLI Library
//!
//! Configuration and subcommands of the `tilawa` command-line player.
//!
//! This library exposes the components for testing purposes.

pub mod commands;
pub mod config;
pub mod error;

// Re-export commonly used types for convenience
pub use commands::AppContext;
pub use config::AppConfig;
pub use error::{CliError, Result};
