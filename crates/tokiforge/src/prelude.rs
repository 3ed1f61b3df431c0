//! Commonly used types in one import.
//!
//! ```rust
//! use tokiforge::prelude::*;
//!
//! let tree = TokenTree::new().with("gap", Token::literal("8px"));
//! let css = export(&tree, &ExportOptions::default()).unwrap();
//! assert_eq!(css, ":root {\n  --hf-gap: 8px;\n}");
//! ```

pub use crate::{
    check, export, flatten, load_tokens, parse_tokens, resolve, validate, CheckOptions,
    ExportFormat, ExportOptions, ParseOptions, ProjectConfig, SourceFormat, Token, TokenError,
    TokenPath, TokenTree, TokenValue,
};

pub use crate::{
    follow_system_theme, ColorMode, DocumentSink, MemoryDocument, MemoryStore, NoopDocument,
    RuntimeError, StyleTarget, Subscription, Theme, ThemeConfig, ThemeRuntime, ThemeStore,
    DEFAULT_STYLE_ID,
};
