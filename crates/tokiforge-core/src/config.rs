//! Project configuration for batch exports.
//!
//! A project file names one token document and the files each format should
//! be written to:
//!
//! ```json
//! {
//!   "input": "./tokens.json",
//!   "output": {
//!     "css": "./dist/tokens.css",
//!     "ts": "./dist/tokens.ts"
//!   },
//!   "prefix": "hf",
//!   "selector": ":root"
//! }
//! ```
//!
//! The core only plans the work ([`ProjectConfig::export_plan`]); reading the
//! input and writing outputs is left to the caller.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ProjectConfigError;
use crate::export::{ExportFormat, ExportOptions, DEFAULT_PREFIX, DEFAULT_SELECTOR};
use crate::parse::SourceFormat;

/// File names looked up by [`ProjectConfig::discover`], in order.
pub const CONFIG_FILE_NAMES: [&str; 3] = [
    "tokiforge.config.json",
    "tokiforge.config.yaml",
    "tokiforge.config.yml",
];

/// Output file per format. Formats left unset are not exported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPaths {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub js: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scss: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<PathBuf>,
}

impl OutputPaths {
    /// Configured outputs in build order: css, js, ts, scss, json.
    pub fn iter(&self) -> impl Iterator<Item = (ExportFormat, &Path)> {
        [
            (ExportFormat::Css, &self.css),
            (ExportFormat::Js, &self.js),
            (ExportFormat::Ts, &self.ts),
            (ExportFormat::Scss, &self.scss),
            (ExportFormat::Json, &self.json),
        ]
        .into_iter()
        .filter_map(|(format, path)| path.as_deref().map(|p| (format, p)))
    }
}

/// One file to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub path: PathBuf,
    pub options: ExportOptions,
}

/// Contents of a `tokiforge.config.*` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Token document, relative to the project root.
    pub input: PathBuf,
    #[serde(default)]
    pub output: OutputPaths,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Emit `var(--…)` references in JS/TS. Defaults to on for those formats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<bool>,
}

impl ProjectConfig {
    pub fn from_json(text: &str) -> Result<Self, ProjectConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ProjectConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Loads a config file, choosing JSON or YAML from its extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ProjectConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ProjectConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match SourceFormat::from_path(path) {
            SourceFormat::Json => Self::from_json(&text),
            SourceFormat::Yaml => Self::from_yaml(&text),
        }
    }

    /// Finds and loads the first config file present in `root`.
    ///
    /// Returns `Ok(None)` when the directory has none.
    pub fn discover<P: AsRef<Path>>(root: P) -> Result<Option<Self>, ProjectConfigError> {
        let root = root.as_ref();
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| root.join(name))
            .find(|candidate| candidate.is_file())
            .map(Self::from_file)
            .transpose()
    }

    /// The token document path, resolved against `root`.
    pub fn input_path(&self, root: &Path) -> PathBuf {
        root.join(&self.input)
    }

    /// Export options for `format` under this config.
    ///
    /// An unset or empty prefix falls back to `hf`, and likewise the selector
    /// to `:root`.
    pub fn options_for(&self, format: ExportFormat) -> ExportOptions {
        let prefix = self
            .prefix
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PREFIX);
        let selector = self
            .selector
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SELECTOR);
        let variables = self
            .variables
            .unwrap_or(matches!(format, ExportFormat::Js | ExportFormat::Ts));
        ExportOptions::new(format)
            .prefix(prefix)
            .selector(selector)
            .variables(variables)
    }

    /// Every configured output with its resolved path and options.
    pub fn export_plan(&self, root: &Path) -> Vec<ExportTarget> {
        self.output
            .iter()
            .map(|(format, path)| ExportTarget {
                path: root.join(path),
                options: self.options_for(format),
            })
            .collect()
    }
}
