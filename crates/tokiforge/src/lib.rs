//! # TokiForge - Design Tokens for Rust
//!
//! TokiForge turns a tree of design tokens into code and live styling:
//!
//! - Token parsing from JSON and YAML, with structural validation
//! - Alias resolution with cycle detection
//! - Export to CSS custom properties, SCSS variables, JavaScript, TypeScript and JSON
//! - A theme runtime that switches between named token sets and follows the
//!   system light/dark preference
//!
//! The engine lives in `tokiforge-core` and the runtime in `tokiforge-runtime`;
//! this crate re-exports both.
//!
//! ## Core Concepts
//!
//! - [`TokenTree`]: nested groups whose leaves are literal or alias [`Token`]s
//! - [`resolve`]: replaces every alias with the value it points at
//! - [`export()`]: renders a tree in one [`ExportFormat`]
//! - [`ProjectConfig`]: the `tokiforge.config.json` file that maps formats to outputs
//! - [`ThemeRuntime`]: applies one of several [`Theme`]s to a document
//! - [`check()`]: validation summary for CI pipelines
//!
//! ## Quick Start
//!
//! ```rust
//! use tokiforge::prelude::*;
//!
//! let tokens = parse_tokens(
//!     r##"{"color": {"primary": {"value": "#7C3AED"}, "link": {"value": "{color.primary}"}}}"##,
//!     SourceFormat::Json,
//!     ParseOptions::default(),
//! )
//! .unwrap();
//!
//! let scss = export(&tokens, &ExportOptions::new(ExportFormat::Scss).prefix("ds")).unwrap();
//! assert_eq!(scss, "$ds-color-primary: #7C3AED;\n$ds-color-link: #7C3AED;");
//! ```
//!
//! ## Themes
//!
//! ```rust
//! use tokiforge::prelude::*;
//!
//! let config = ThemeConfig::from_yaml(
//!     "themes:\n  - name: light\n    tokens: { bg: { value: '#fff' } }\n  - name: dark\n    tokens: { bg: { value: '#000' } }\n",
//! )
//! .unwrap();
//!
//! let document = MemoryDocument::new();
//! let mut runtime = ThemeRuntime::builder(config)
//!     .document(document.clone())
//!     .build()
//!     .unwrap();
//! runtime.apply_theme("dark").unwrap();
//!
//! assert_eq!(document.style(DEFAULT_STYLE_ID).unwrap(), ":root {\n  --hf-bg: #000;\n}");
//! ```

pub mod prelude;

// Token model
pub use tokiforge_core::{
    AliasToken, LiteralToken, MalformedNode, ShapeProblem, Token, TokenMeta, TokenNode, TokenPath,
    TokenTree, TokenType, TokenValue,
};

// Parsing, validation and resolution
pub use tokiforge_core::{
    flatten, load_tokens, parse_tokens, resolve, resolve_value, unflatten, validate,
    validate_aliases, AliasIssue, AliasReport, FlatToken, ParseOptions, SourceFormat,
};

// Export
pub use tokiforge_core::{
    export, export_css, export_js, export_json, export_scss, export_ts, naming, ExportFormat,
    ExportOptions,
};

// Project configuration and CI checks
pub use tokiforge_core::{
    check, check_file, config, Check, CheckOptions, CheckReport, ExportTarget, OutputPaths,
    ProjectConfig,
};

// Core errors
pub use tokiforge_core::{
    ExportError, IssueKind, ParseError, ProjectConfigError, ResolveError, TokenError,
    ValidationErrors, ValidationIssue,
};

// Theme runtime
pub use tokiforge_runtime::{
    follow_system_theme, Lifecycle, StyleTarget, Subscription, Theme, ThemeChange, ThemeConfig,
    ThemeRuntime, ThemeRuntimeBuilder, DEFAULT_STYLE_ID, THEME_CHANGE_EVENT,
};

// Host capabilities
pub use tokiforge_runtime::{
    DocumentSink, MemoryDocument, MemoryStore, NoopDocument, ThemeStore, DEFAULT_STORAGE_KEY,
};
#[cfg(target_arch = "wasm32")]
pub use tokiforge_runtime::{DomDocument, LocalStorageStore};

// Colour mode
pub use tokiforge_runtime::{
    detect_system_theme, reset_theme_detector, set_theme_detector, ColorMode,
};

// Runtime errors
pub use tokiforge_runtime::{ConfigError, HostError, RuntimeError};
