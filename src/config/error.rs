//! Configuration error and warning types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a config file from loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("JSON config parsing error")]
    Json(#[from] serde_json::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Non-fatal problems with a single module entry.
///
/// These are logged and collected; the remaining modules still apply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigWarning {
    #[error("module #{index} has no name, path or tag and was skipped")]
    Empty { index: usize },

    #[error(
        "module #{index} (`{name}`) sets an inject target but has no path or tag, \
         only its global is kept"
    )]
    NoMarkup { index: usize, name: String },

    #[error("module #{index} sets both `path` and `tag`, `{path}` is ignored")]
    PathShadowed { index: usize, path: String },

    #[error("module #{index} could not be parsed and was skipped")]
    MalformedEntry { index: usize },

    #[error("`modules` is not a list and was ignored")]
    MalformedModuleList,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("externals.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("externals.toml"));

        let validation_err = ConfigError::Validation("unsupported format".to_string());
        assert!(format!("{validation_err}").contains("unsupported format"));
    }

    #[test]
    fn test_config_warning_display() {
        let warning = ConfigWarning::NoMarkup {
            index: 4,
            name: "vue".into(),
        };
        let display = warning.to_string();
        assert!(display.contains("#4"));
        assert!(display.contains("`vue`"));

        let warning = ConfigWarning::PathShadowed {
            index: 0,
            path: "https://cdn/a.js".into(),
        };
        assert!(warning.to_string().contains("https://cdn/a.js"));
    }
}
