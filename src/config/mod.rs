//! Configuration module for pathql.
//!
//! Handles the TOML settings file and its mapping onto compiler options.

mod settings;

pub use settings::{
    CompilerSettings, ExecutionSettings, LocaleSettings, Settings, SettingsError,
};
