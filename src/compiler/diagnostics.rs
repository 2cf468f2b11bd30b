//! Structured warnings produced while compiling.

use std::fmt;

/// A recoverable problem found while compiling a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A composite restriction had a null child, which was skipped.
    SkippedNullRestriction { location: String },

    /// A LOCALE column was left out of GROUP BY while a row-combining
    /// aggregate forced grouping.
    LocaleColumnNotGrouped { attribute_path: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::SkippedNullRestriction { location } => {
                write!(f, "Composite restriction has a null child at {}; skipped", location)
            }
            Diagnostic::LocaleColumnNotGrouped { attribute_path } => write!(
                f,
                "LOCALE column '{}' is not grouped; it resolves across each group",
                attribute_path
            ),
        }
    }
}

/// Collects diagnostics for one compile call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it as a warning.
    pub fn warn(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        self.items.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
