//! Format exporters.
//!
//! Every exporter is a pure function of its input: the same tokens and options
//! always give byte-identical text. Exporters expect a resolved tree. Aliases
//! that are still present are written as references in the target language
//! (`var(--…)` in CSS, `$…` in SCSS, the `{path}` string in JS/TS/JSON)
//! instead of being expanded.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use tokiforge_core::{export, ExportFormat, ExportOptions, TokenTree};
//!
//! let tree = TokenTree::from_value(json!({
//!     "colorPrimary": {"background": {"value": "#7C3AED"}}
//! })).unwrap();
//!
//! let css = export(&tree, &ExportOptions::new(ExportFormat::Css)).unwrap();
//! assert_eq!(css, ":root {\n  --hf-color-primary-background: #7C3AED;\n}");
//!
//! let scss = export(&tree, &ExportOptions::new(ExportFormat::Scss).prefix("ds")).unwrap();
//! assert_eq!(scss, "$ds-color-primary-background: #7C3AED;");
//! ```

mod css;
mod script;
mod scss;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ExportError;
use crate::flatten::flatten;
use crate::tree::TokenTree;

pub use css::export_css;
pub use script::{export_js, export_ts};
pub use scss::export_scss;

/// Selector used by the CSS exporter when none is given.
pub const DEFAULT_SELECTOR: &str = ":root";

/// Variable name prefix used when none is given.
pub const DEFAULT_PREFIX: &str = "hf";

/// Output format of [`export`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Css,
    Scss,
    Js,
    Ts,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Css,
        ExportFormat::Scss,
        ExportFormat::Js,
        ExportFormat::Ts,
        ExportFormat::Json,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Css => "css",
            ExportFormat::Scss => "scss",
            ExportFormat::Js => "js",
            ExportFormat::Ts => "ts",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    /// Parses a format name. Unknown names are an error, never a fallback.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| ExportError::UnsupportedFormat(s.to_string()))
    }
}

/// Options recognised by the exporters.
///
/// `selector` only affects CSS. `variables` only affects JS and TS, where it
/// replaces every leaf with a `var(--prefix-path)` reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub selector: String,
    pub prefix: String,
    pub variables: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            selector: DEFAULT_SELECTOR.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            variables: false,
        }
    }
}

impl ExportOptions {
    /// Options for `format` with the default selector and prefix.
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = selector.into();
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn variables(mut self, variables: bool) -> Self {
        self.variables = variables;
        self
    }
}

/// Exports `tree` in the format named by `options`.
pub fn export(tree: &TokenTree, options: &ExportOptions) -> Result<String, ExportError> {
    let output = match options.format {
        ExportFormat::Css => export_css(&flatten(tree), options),
        ExportFormat::Scss => export_scss(&flatten(tree), options),
        ExportFormat::Js => export_js(&flatten(tree), options)?,
        ExportFormat::Ts => export_ts(&flatten(tree), options)?,
        ExportFormat::Json => export_json(tree)?,
    };
    debug!(format = %options.format, bytes = output.len(), "exported tokens");
    Ok(output)
}

/// The tree itself, pretty-printed with two-space indentation.
pub fn export_json(tree: &TokenTree) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(tree)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_from_str() {
        for format in ExportFormat::ALL {
            assert_eq!(format.as_str().parse::<ExportFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let err = "xml".parse::<ExportFormat>().unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(ref name) if name == "xml"));
        assert!("CSS".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_options_defaults() {
        let options = ExportOptions::default();
        assert_eq!(options.format, ExportFormat::Css);
        assert_eq!(options.selector, ":root");
        assert_eq!(options.prefix, "hf");
        assert!(!options.variables);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ExportOptions = serde_json::from_value(json!({"format": "ts"})).unwrap();
        assert_eq!(options, ExportOptions::new(ExportFormat::Ts));
        assert!(serde_json::from_value::<ExportOptions>(json!({"format": "xml"})).is_err());
    }

    #[test]
    fn test_json_round_trips() {
        let source = json!({
            "color": {"primary": {"value": "#7C3AED", "type": "color"}},
            "space": {"sm": {"value": 4}}
        });
        let tree = TokenTree::from_value(source.clone()).unwrap();
        let text = export(&tree, &ExportOptions::new(ExportFormat::Json)).unwrap();
        assert_eq!(serde_json::from_str::<serde_json::Value>(&text).unwrap(), source);
        assert!(text.contains("\n  \"color\": {"));
    }

    #[test]
    fn test_export_is_deterministic() {
        let tree = TokenTree::from_value(json!({
            "b": {"value": "1"},
            "a": {"x": {"value": 2}}
        }))
        .unwrap();
        for format in ExportFormat::ALL {
            let options = ExportOptions::new(format);
            assert_eq!(export(&tree, &options).unwrap(), export(&tree, &options).unwrap());
        }
    }
}
