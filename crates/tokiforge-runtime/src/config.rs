//! Themes and theme configuration.
//!
//! A configuration lists named token trees and optionally names the default:
//!
//! ```yaml
//! themes:
//!   - name: light
//!     tokens:
//!       color:
//!         bg: { value: "#ffffff" }
//!   - name: dark
//!     tokens:
//!       color:
//!         bg: { value: "#0f172a" }
//! defaultTheme: dark
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokiforge_core::{load_tokens, ParseOptions, SourceFormat, TokenTree};

use crate::error::ConfigError;

/// A named token tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub tokens: TokenTree,
}

impl Theme {
    pub fn new(name: impl Into<String>, tokens: TokenTree) -> Self {
        Self {
            name: name.into(),
            tokens,
        }
    }

    /// Loads a theme's tokens from a JSON or YAML file.
    ///
    /// The theme name is the file name without its extension, so
    /// `themes/dark.yaml` becomes `dark`. Aliases are kept as written.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();
        let tokens = load_tokens(path, ParseOptions::raw())?;
        Ok(Self { name, tokens })
    }
}

/// The themes a runtime can switch between.
///
/// Always holds at least one theme, all names are distinct, and the default
/// theme, when set, is one of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    themes: Vec<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_theme: Option<String>,
}

impl ThemeConfig {
    /// Creates a configuration whose default is the first theme.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tokiforge_core::TokenTree;
    /// use tokiforge_runtime::{ConfigError, Theme, ThemeConfig};
    ///
    /// let config = ThemeConfig::new(vec![
    ///     Theme::new("light", TokenTree::new()),
    ///     Theme::new("dark", TokenTree::new()),
    /// ])
    /// .unwrap()
    /// .with_default("dark")
    /// .unwrap();
    /// assert_eq!(config.default_theme(), "dark");
    ///
    /// assert!(matches!(ThemeConfig::new(vec![]), Err(ConfigError::NoThemes)));
    /// ```
    pub fn new(themes: Vec<Theme>) -> Result<Self, ConfigError> {
        let config = Self {
            themes,
            default_theme: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the default theme, which must be one of the configured themes.
    pub fn with_default(mut self, name: impl Into<String>) -> Result<Self, ConfigError> {
        self.default_theme = Some(name.into());
        self.validate()?;
        Ok(self)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration, choosing JSON or YAML from the extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match SourceFormat::from_path(path) {
            SourceFormat::Json => Self::from_json(&text),
            SourceFormat::Yaml => Self::from_yaml(&text),
        }
    }

    /// Checks the invariants listed on the type.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.themes.is_empty() {
            return Err(ConfigError::NoThemes);
        }
        let mut seen = HashSet::new();
        for theme in &self.themes {
            if !seen.insert(theme.name.as_str()) {
                return Err(ConfigError::DuplicateTheme {
                    name: theme.name.clone(),
                });
            }
        }
        if let Some(name) = &self.default_theme {
            if !seen.contains(name.as_str()) {
                return Err(ConfigError::UnknownDefaultTheme {
                    name: name.clone(),
                    available: self.names().map(str::to_string).collect(),
                });
            }
        }
        Ok(())
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// Theme names in configuration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(|theme| theme.name.as_str())
    }

    pub fn theme(&self, name: &str) -> Option<&Theme> {
        self.themes.iter().find(|theme| theme.name == name)
    }

    /// The configured default, or the first theme.
    pub fn default_theme(&self) -> &str {
        match &self.default_theme {
            Some(name) => name,
            None => self
                .themes
                .first()
                .map(|theme| theme.name.as_str())
                .unwrap_or_default(),
        }
    }
}
