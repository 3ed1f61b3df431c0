//! Terminal tokens: literal values and aliases to other tokens.

use std::fmt;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Number, Value};

use super::path::TokenPath;

/// The concrete value of a literal token.
///
/// Values are emitted verbatim into every export format, so no unit or
/// colour normalisation happens here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenValue {
    Number(Number),
    Str(String),
}

impl TokenValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TokenValue::Str(s) => Some(s),
            TokenValue::Number(_) => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, TokenValue::Number(_))
    }

    /// The value as a JSON scalar.
    pub fn to_json(&self) -> Value {
        match self {
            TokenValue::Str(s) => Value::String(s.clone()),
            TokenValue::Number(n) => Value::Number(n.clone()),
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Str(s) => f.write_str(s),
            TokenValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for TokenValue {
    fn from(s: &str) -> Self {
        TokenValue::Str(s.to_string())
    }
}

impl From<String> for TokenValue {
    fn from(s: String) -> Self {
        TokenValue::Str(s)
    }
}

impl From<i64> for TokenValue {
    fn from(n: i64) -> Self {
        TokenValue::Number(n.into())
    }
}

impl From<Number> for TokenValue {
    fn from(n: Number) -> Self {
        TokenValue::Number(n)
    }
}

/// Informational category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    Color,
    Dimension,
    FontFamily,
    FontWeight,
    Duration,
    Custom,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Color => "color",
            TokenType::Dimension => "dimension",
            TokenType::FontFamily => "fontFamily",
            TokenType::FontWeight => "fontWeight",
            TokenType::Duration => "duration",
            TokenType::Custom => "custom",
        }
    }

    /// Parses the camelCase spelling used in token files.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "color" => Some(TokenType::Color),
            "dimension" => Some(TokenType::Dimension),
            "fontFamily" => Some(TokenType::FontFamily),
            "fontWeight" => Some(TokenType::FontWeight),
            "duration" => Some(TokenType::Duration),
            "custom" => Some(TokenType::Custom),
            _ => None,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata carried by every token regardless of how its value is given.
///
/// Fields other than `type` and `description` (for example `deprecated` or
/// `$extensions`) are kept in `extra`, in source order, and survive both
/// resolution and JSON export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenMeta {
    pub token_type: Option<TokenType>,
    pub description: Option<String>,
    pub extra: IndexMap<String, Value>,
}

/// A token with a concrete value.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralToken {
    pub value: TokenValue,
    pub meta: TokenMeta,
}

/// A token whose value is taken from another token.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasToken {
    pub target: TokenPath,
    pub meta: TokenMeta,
}

/// A terminal node of a token tree.
///
/// The raw token shape (`value`, `$value`, `$alias`) is classified once,
/// when the tree is ingested; everything downstream matches on this enum.
///
/// # Example
///
/// ```rust
/// use tokiforge_core::{Token, TokenPath, TokenType};
///
/// let base = Token::literal("#7C3AED").with_type(TokenType::Color);
/// let accent = Token::alias(TokenPath::parse("color.base").unwrap())
///     .with_description("Accent follows the brand colour");
///
/// assert!(!base.is_alias());
/// assert_eq!(accent.alias_target().unwrap().to_string(), "color.base");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Literal(LiteralToken),
    Alias(AliasToken),
}

impl Token {
    /// Creates a literal token with no metadata.
    pub fn literal(value: impl Into<TokenValue>) -> Self {
        Token::Literal(LiteralToken {
            value: value.into(),
            meta: TokenMeta::default(),
        })
    }

    /// Creates an alias token with no metadata.
    pub fn alias(target: TokenPath) -> Self {
        Token::Alias(AliasToken {
            target,
            meta: TokenMeta::default(),
        })
    }

    /// Sets the token type, returning `self` for chaining.
    pub fn with_type(mut self, token_type: TokenType) -> Self {
        self.meta_mut().token_type = Some(token_type);
        self
    }

    /// Sets the description, returning `self` for chaining.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.meta_mut().description = Some(description.into());
        self
    }

    pub fn meta(&self) -> &TokenMeta {
        match self {
            Token::Literal(t) => &t.meta,
            Token::Alias(t) => &t.meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut TokenMeta {
        match self {
            Token::Literal(t) => &mut t.meta,
            Token::Alias(t) => &mut t.meta,
        }
    }

    /// The literal value, or `None` for an alias.
    pub fn value(&self) -> Option<&TokenValue> {
        match self {
            Token::Literal(t) => Some(&t.value),
            Token::Alias(_) => None,
        }
    }

    /// The alias target, or `None` for a literal.
    pub fn alias_target(&self) -> Option<&TokenPath> {
        match self {
            Token::Literal(_) => None,
            Token::Alias(t) => Some(&t.target),
        }
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, Token::Alias(_))
    }

    pub fn token_type(&self) -> Option<TokenType> {
        self.meta().token_type
    }

    pub fn description(&self) -> Option<&str> {
        self.meta().description.as_deref()
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let meta = self.meta();
        let mut map = serializer.serialize_map(None)?;
        match self {
            Token::Literal(t) => map.serialize_entry("value", &t.value)?,
            Token::Alias(t) => map.serialize_entry("$alias", &t.target.to_alias())?,
        }
        if let Some(token_type) = &meta.token_type {
            map.serialize_entry("type", token_type)?;
        }
        if let Some(description) = &meta.description {
            map.serialize_entry("description", description)?;
        }
        for (key, value) in &meta.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
