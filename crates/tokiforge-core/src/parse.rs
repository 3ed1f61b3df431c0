//! Reading token documents from JSON or YAML text and files.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{ParseError, TokenError};
use crate::resolve::resolve;
use crate::tree::TokenTree;
use crate::validate::validate;

/// Syntax of a token document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceFormat {
    #[default]
    Json,
    Yaml,
}

impl SourceFormat {
    /// Picks the format from a file extension: `.yaml` and `.yml` are YAML,
    /// anything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                SourceFormat::Yaml
            }
            _ => SourceFormat::Json,
        }
    }
}

/// What to do with a document after deserializing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Run [`validate`] before anything else.
    pub validate: bool,
    /// Replace aliases with their values.
    pub expand_references: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            validate: true,
            expand_references: true,
        }
    }
}

impl ParseOptions {
    /// Deserialize only: no validation, aliases kept.
    pub fn raw() -> Self {
        Self {
            validate: false,
            expand_references: false,
        }
    }
}

/// Parses a token document.
///
/// Syntax errors are [`ParseError`]s; a document that parses but has the wrong
/// shape fails with validation errors.
///
/// # Example
///
/// ```rust
/// use tokiforge_core::{parse_tokens, ParseOptions, SourceFormat, TokenPath};
///
/// let yaml = "
/// color:
///   base:
///     value: '#000'
///   text:
///     value: '{color.base}'
/// ";
/// let tree = parse_tokens(yaml, SourceFormat::Yaml, ParseOptions::default()).unwrap();
/// let text = tree.token(&TokenPath::parse("color.text").unwrap()).unwrap();
/// assert_eq!(text.value().unwrap().to_string(), "#000");
/// ```
pub fn parse_tokens(
    text: &str,
    format: SourceFormat,
    options: ParseOptions,
) -> Result<TokenTree, TokenError> {
    let value: Value = match format {
        SourceFormat::Json => serde_json::from_str(text).map_err(ParseError::from)?,
        SourceFormat::Yaml => serde_yaml::from_str(text).map_err(ParseError::from)?,
    };
    let tree = TokenTree::from_value(value)?;
    if options.validate {
        validate(&tree)?;
    }
    if options.expand_references {
        return Ok(resolve(&tree)?);
    }
    Ok(tree)
}

/// Reads and parses a token file, choosing the syntax from its extension.
pub fn load_tokens(path: impl AsRef<Path>, options: ParseOptions) -> Result<TokenTree, TokenError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loading token file");
    parse_tokens(&text, SourceFormat::from_path(path), options)
}
