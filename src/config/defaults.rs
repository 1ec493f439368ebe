//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

use super::InjectTarget;
use super::module::Location;

/// Config file looked up when `--config` isn't given.
pub fn config_file() -> &'static str {
    "externals.toml"
}

/// `inject_to` when neither the tag nor the module sets one.
pub fn inject_to() -> InjectTarget {
    InjectTarget::Structural(Location::HeadPrepend)
}
