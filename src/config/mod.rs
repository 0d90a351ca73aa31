//! Configuration module
//!
//! Handles user configuration (`config.toml` under the platform config
//! directory, overridable via `BSW_*` environment variables).

mod settings;

pub use settings::*;
