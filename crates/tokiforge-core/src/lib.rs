//! TokiForge core - design token resolution and export.
//!
//! Design tokens are named values (colours, sizes, fonts) organised in a nested
//! tree. A token is either a literal or an alias to another token's path:
//!
//! ```json
//! {
//!   "color": {
//!     "base": { "value": "#7C3AED", "type": "color" },
//!     "accent": { "value": "{color.base}" }
//!   }
//! }
//! ```
//!
//! This crate provides the pipeline from such a document to generated code:
//!
//! - [`TokenTree`]: the tree model, ingested from JSON/YAML values
//! - [`validate`] and [`validate_aliases`]: structural checks that collect every problem
//! - [`resolve`]: transitive alias expansion with cycle detection
//! - [`flatten`] / [`unflatten`]: conversion to and from ordered `(path, token)` lists
//! - [`export()`]: CSS custom properties, SCSS variables, JS/TS modules and JSON
//! - [`check()`]: a CI-friendly report combining the validators
//!
//! # Quick Start
//!
//! ```rust
//! use tokiforge_core::{
//!     export, parse_tokens, ExportFormat, ExportOptions, ParseOptions, SourceFormat,
//! };
//!
//! let source = r##"{
//!     "color": {
//!         "primary": { "value": "#7C3AED", "type": "color" },
//!         "text": { "value": "{color.primary}" }
//!     }
//! }"##;
//!
//! let tree = parse_tokens(source, SourceFormat::Json, ParseOptions::default()).unwrap();
//! let css = export(&tree, &ExportOptions::new(ExportFormat::Css)).unwrap();
//!
//! assert_eq!(
//!     css,
//!     ":root {\n  --hf-color-primary: #7C3AED;\n  --hf-color-text: #7C3AED;\n}"
//! );
//! ```
//!
//! # Variable Naming
//!
//! CSS and SCSS names are `--{prefix}-{path}` and `${prefix}-{path}`, where each
//! path key is kebab-cased and keys are joined with `-`. With prefix `hf`,
//! `colorPrimary.background` becomes `--hf-color-primary-background`. See
//! [`naming`].

pub mod check;
pub mod config;
mod error;
pub mod export;
mod flatten;
pub mod naming;
mod parse;
mod resolve;
mod tree;
mod validate;

pub use check::{check, check_file, Check, CheckOptions, CheckReport};
pub use config::{ExportTarget, OutputPaths, ProjectConfig};
pub use error::{
    ExportError, IssueKind, ParseError, ProjectConfigError, ResolveError, TokenError,
    ValidationErrors, ValidationIssue,
};
pub use export::{
    export, export_css, export_js, export_json, export_scss, export_ts, ExportFormat,
    ExportOptions,
};
pub use flatten::{flatten, unflatten, FlatToken};
pub use parse::{load_tokens, parse_tokens, ParseOptions, SourceFormat};
pub use resolve::{resolve, resolve_value};
pub use tree::{
    AliasToken, LiteralToken, MalformedNode, ShapeProblem, Token, TokenMeta, TokenNode, TokenPath,
    TokenTree, TokenType, TokenValue,
};
pub use validate::{validate, validate_aliases, AliasIssue, AliasReport};
