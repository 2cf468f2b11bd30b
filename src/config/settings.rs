//! TOML-based configuration for pathql.
//!
//! Every field has a default, so an empty file (or no file) is valid.
//!
//! Example configuration:
//! ```toml
//! [compiler]
//! root_alias = "obj"
//! id_attribute = "id"
//!
//! [locale]
//! marker_segment = "localeData"
//! column = "locale"
//! prefix_width = 10
//!
//! [execution]
//! max_matches = 1000
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::compiler::CompileOptions;

/// Attribute and alias names must be plain identifiers.
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Statement naming conventions.
    pub compiler: CompilerSettings,

    /// Localized-row conventions.
    pub locale: LocaleSettings,

    /// Execution limits.
    pub execution: ExecutionSettings,
}

/// Statement naming conventions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Alias bound to the root entity.
    pub root_alias: String,

    /// Identity attribute of the root entity.
    pub id_attribute: String,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            root_alias: "obj".to_string(),
            id_attribute: "id".to_string(),
        }
    }
}

/// Localized-row conventions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LocaleSettings {
    /// Relation segment identifying localized rows.
    pub marker_segment: String,

    /// Locale-code attribute on localized rows.
    pub column: String,

    /// Width of the sortable locale prefix.
    pub prefix_width: usize,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            marker_segment: "localeData".to_string(),
            column: "locale".to_string(),
            prefix_width: 10,
        }
    }
}

/// Execution limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExecutionSettings {
    /// Give up on queries matching more rows than this.
    pub max_matches: Option<u64>,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `path`, or from the default config file locations.
    ///
    /// Without an explicit path, searches in order:
    /// 1. Environment variable `PATHQL_CONFIG`
    /// 2. `./pathql.toml`
    /// 3. `~/.config/pathql/config.toml`
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        if let Ok(path) = env::var("PATHQL_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("pathql.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("pathql").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Settings::default())
    }

    /// Check that names are identifiers and the prefix width is usable.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let names = [
            ("compiler.root_alias", &self.compiler.root_alias),
            ("compiler.id_attribute", &self.compiler.id_attribute),
            ("locale.marker_segment", &self.locale.marker_segment),
            ("locale.column", &self.locale.column),
        ];
        for (key, value) in names {
            if !IDENTIFIER.is_match(value) {
                return Err(SettingsError::InvalidConfig(format!(
                    "{} must be an identifier, got '{}'",
                    key, value
                )));
            }
        }

        if self.locale.prefix_width == 0 {
            return Err(SettingsError::InvalidConfig(
                "locale.prefix_width must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Compiler options for these settings.
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions::default()
            .with_root_alias(&self.compiler.root_alias)
            .with_id_attribute(&self.compiler.id_attribute)
            .with_locale_marker(&self.locale.marker_segment)
            .with_locale_column(&self.locale.column)
            .with_locale_prefix_width(self.locale.prefix_width)
    }
}
