//! Module name → global variable table.
//!
//! The host's externals rewrite uses this table to turn
//! `import Vue from "vue"` into a reference to `window.Vue` instead of
//! bundling `vue`. Whether the global really exists at runtime is between the
//! emitted `<script>` and the rewritten import.

use crate::config::ExternalModule;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// What an external import is rewritten to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GlobalBinding {
    /// Reference this global variable.
    Variable(String),
    /// No global declared; the import is stripped. Serialized as `null`.
    Strip,
}

impl GlobalBinding {
    pub fn variable(&self) -> Option<&str> {
        match self {
            GlobalBinding::Variable(name) => Some(name),
            GlobalBinding::Strip => None,
        }
    }
}

/// The globals contribution of one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleImport {
    pub name: String,
    pub binding: GlobalBinding,
}

/// Import name → binding. Later duplicates overwrite earlier ones in place.
pub type GlobalsMap = IndexMap<String, GlobalBinding>;

/// Fold module imports into a [`GlobalsMap`].
pub fn build<'a, I>(modules: I) -> GlobalsMap
where
    I: IntoIterator<Item = &'a ExternalModule>,
{
    modules
        .into_iter()
        .filter_map(ExternalModule::import)
        .map(|import| (import.name.clone(), import.binding.clone()))
        .collect()
}
