//! Externals configuration (`externals.toml` or `externals.json`).
//!
//! | Key         | Purpose                                           |
//! |-------------|---------------------------------------------------|
//! | `command`   | `"build"` or `true` (build and serve)             |
//! | `inject_to` | Default target for every module                   |
//! | `modules`   | External modules, in declaration order            |
//!
//! # Example
//!
//! ```toml
//! command = "build"
//! inject_to = "head-prepend"
//!
//! [[modules]]
//! name = "vue"
//! global = "Vue"
//! path = "https://unpkg.com/vue@3/dist/vue.global.prod.js"
//!
//! [[modules]]
//! path = "https://unpkg.com/element-plus/dist/index.css"
//! inject_to = "<!-- externals:css -->"
//! ```

pub mod defaults;
mod error;
mod module;

pub use error::{ConfigError, ConfigWarning};
pub use module::{ActivationCommand, ExternalModule, InjectTarget, Location, ModuleEntry, Validated};

use anyhow::Result;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Root configuration structure.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ExternalsConfig {
    /// Host commands that receive structural tags.
    #[serde(default)]
    pub command: ActivationCommand,

    /// Fallback target for modules that don't set their own.
    #[serde(default = "defaults::inject_to", alias = "injectTo")]
    #[educe(Default = defaults::inject_to())]
    pub inject_to: InjectTarget,

    /// External modules. Anything other than a list is ignored.
    #[serde(default, deserialize_with = "module::module_list")]
    pub modules: Vec<ModuleEntry>,
}

impl ExternalsConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: ExternalsConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Parse configuration from JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: ExternalsConfig = serde_json::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path, picking the format by extension.
    ///
    /// `.json` is parsed as JSON, `.toml` or no extension as TOML.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("toml") | None => Self::from_str(&content),
            Some(other) => Err(ConfigError::Validation(format!(
                "unsupported config format `.{other}`, expected `.toml` or `.json`"
            ))
            .into()),
        }
    }

    /// Config-level target, with an empty placeholder treated as unset.
    pub fn default_target(&self) -> InjectTarget {
        self.inject_to.clone().non_empty().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================
