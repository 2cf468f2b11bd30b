//! Query locale and its fallback hierarchy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A locale identified by language, country and variant (`en_US_POSIX`).
///
/// The root locale has an empty language and matches only rows without an
/// explicit locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Locale {
    pub language: String,
    pub country: String,
    pub variant: String,
}

impl Locale {
    pub fn new(language: &str, country: &str) -> Self {
        Self {
            language: language.to_lowercase(),
            country: country.to_uppercase(),
            variant: String::new(),
        }
    }

    /// The root locale.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a tag such as `en`, `en_US`, `en-US` or `en_US_POSIX`.
    pub fn parse(tag: &str) -> Self {
        let mut parts = tag.trim().splitn(3, ['_', '-']);
        Self {
            language: parts.next().unwrap_or_default().to_lowercase(),
            country: parts.next().unwrap_or_default().to_uppercase(),
            variant: parts.next().unwrap_or_default().to_string(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.language.is_empty()
    }

    /// Locale codes from most to least specific, e.g. `["en_US", "en"]`.
    ///
    /// The root locale yields an empty hierarchy.
    pub fn fallback_hierarchy(&self) -> Vec<String> {
        if self.is_root() {
            return vec![];
        }

        let mut hierarchy = Vec::with_capacity(3);
        if !self.variant.is_empty() {
            hierarchy.push(self.to_string());
        }
        if !self.country.is_empty() {
            hierarchy.push(format!("{}_{}", self.language, self.country));
        }
        hierarchy.push(self.language.clone());
        hierarchy
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.language)?;
        if !self.country.is_empty() || !self.variant.is_empty() {
            write!(f, "_{}", self.country)?;
        }
        if !self.variant.is_empty() {
            write!(f, "_{}", self.variant)?;
        }
        Ok(())
    }
}

impl From<String> for Locale {
    fn from(tag: String) -> Self {
        Locale::parse(&tag)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_string()
    }
}
