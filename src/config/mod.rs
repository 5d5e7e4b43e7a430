//! Configuration module for entisql.
//!
//! Handles compiler settings loaded from `entisql.toml`.

mod settings;

pub use settings::{CompilerSettings, Settings, SettingsError};
