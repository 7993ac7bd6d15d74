//! Application settings shared by every front end.

pub mod config;

pub use config::{AppDataDir, Config, EmulatorConfig};
