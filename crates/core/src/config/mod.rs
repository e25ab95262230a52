//! Configuration loading and schema definitions
//!
//! One optional TOML file supplies defaults for the data source, search
//! tuning, display and export; command-line flags override it per run.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
