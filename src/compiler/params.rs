//! Parameter name allocation and binding for one compile call.

use crate::model::{ParamValue, ParameterMap};

/// Allocates unique parameter names and records their bound values.
///
/// The first binding of a base name uses it verbatim; later bindings of the
/// same base take `<base>_1`, `<base>_2`, ...
#[derive(Debug, Clone, Default)]
pub struct ParamAllocator {
    values: ParameterMap,
}

impl ParamAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` under a fresh name derived from `base`, returning the name.
    pub fn bind(&mut self, base: &str, value: ParamValue) -> String {
        let mut name = base.to_string();
        let mut suffix = 0;
        while self.values.contains_key(&name) {
            suffix += 1;
            name = format!("{}_{}", base, suffix);
        }
        self.values.insert(name.clone(), value);
        name
    }

    pub fn into_map(self) -> ParameterMap {
        self.values
    }
}

/// Parameter base name for a qualified identifier: the dots are removed.
pub fn base_name(qualified_identifier: &str) -> String {
    qualified_identifier.replace('.', "")
}
