use std::path::PathBuf;

use thiserror::Error;
use tokiforge_core::{ResolveError, TokenError};

/// Error returned when a [`ThemeConfig`](crate::ThemeConfig) is invalid or
/// cannot be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("theme configuration must contain at least one theme")]
    NoThemes,

    #[error("theme '{name}' is defined more than once")]
    DuplicateTheme { name: String },

    #[error("default theme '{name}' not found. Available themes: {}", .available.join(", "))]
    UnknownDefaultTheme { name: String, available: Vec<String> },

    #[error("invalid JSON theme configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML theme configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load theme tokens: {0}")]
    Tokens(#[from] TokenError),
}

/// A failure reported by the host document or storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("document operation failed: {message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error returned by [`ThemeRuntime`](crate::ThemeRuntime) operations.
///
/// A failed call leaves the runtime as it was and usable.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to resolve tokens of theme '{theme}': {source}")]
    Resolve {
        theme: String,
        #[source]
        source: ResolveError,
    },

    #[error("theme '{name}' not found. Available themes: {}", .available.join(", "))]
    ThemeNotFound { name: String, available: Vec<String> },

    #[error("theme runtime has been destroyed")]
    AlreadyDestroyed,

    #[error(transparent)]
    Host(#[from] HostError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_not_found_lists_available() {
        let err = RuntimeError::ThemeNotFound {
            name: "doesNotExist".into(),
            available: vec!["light".into(), "dark".into()],
        };
        assert_eq!(
            err.to_string(),
            "theme 'doesNotExist' not found. Available themes: light, dark"
        );
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: RuntimeError = ConfigError::NoThemes.into();
        assert_eq!(
            err.to_string(),
            "theme configuration must contain at least one theme"
        );
    }
}
