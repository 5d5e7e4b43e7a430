//! TOML-based configuration for entisql.
//!
//! Example configuration:
//! ```toml
//! [compiler]
//! dialect = "tsql"
//! max_string_length = 4000
//! max_ansi_string_length = 8000
//! page_alias_suffix = "_page"
//! indent = true
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::sql::Dialect;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Unsupported dialect: {0}")]
    UnsupportedDialect(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Statement compiler settings.
    pub compiler: CompilerSettings,
}

/// Statement compiler settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Target dialect name (`tsql`, `postgres`).
    pub dialect: String,

    /// Declared size for Unicode string parameters.
    pub max_string_length: usize,

    /// Declared size for ANSI string parameters.
    pub max_ansi_string_length: usize,

    /// Suffix appended to entity aliases inside a paging table expression.
    pub page_alias_suffix: String,

    /// Render statements across indented lines; `false` renders one line.
    pub indent: bool,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            dialect: "tsql".to_string(),
            max_string_length: 4000,
            max_ansi_string_length: 8000,
            page_alias_suffix: "_page".to_string(),
            indent: true,
        }
    }
}

impl CompilerSettings {
    /// Get the configured dialect.
    pub fn dialect(&self) -> Result<Dialect, SettingsError> {
        self.dialect
            .parse()
            .map_err(|_| SettingsError::UnsupportedDialect(self.dialect.clone()))
    }

    /// Settings for the given dialect with every other value defaulted.
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self {
            dialect: dialect.to_string(),
            ..Self::default()
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `ENTISQL_CONFIG`
    /// 2. `./entisql.toml`
    /// 3. `~/.config/entisql/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("ENTISQL_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("entisql.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("entisql").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }
}
