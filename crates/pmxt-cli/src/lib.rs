/*
[INPUT]:  Public API exports for the pmxt CLI crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod commands;
pub mod config;
pub mod render;

// Re-export main types for convenience
pub use commands::{Cli, Command, ServerAction, run};
pub use config::CliConfig;
