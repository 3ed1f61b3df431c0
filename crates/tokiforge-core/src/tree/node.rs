//! The recursive token tree and its ingestion from raw JSON/YAML values.

use std::fmt;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::path::{looks_like_alias, TokenPath};
use super::token::{AliasToken, LiteralToken, Token, TokenMeta, TokenType, TokenValue};
use crate::error::{IssueKind, ValidationErrors, ValidationIssue};

/// Why an object in the source could not be read as a token or a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeProblem {
    /// `{}`: neither a token nor a group.
    Empty,
    /// An object with only scalar fields and no `value`, `$value` or `$alias`.
    NoValue,
    /// A token whose `value` is null.
    MissingValue,
    /// A token whose value is not a string or number.
    InvalidValueType { found: &'static str },
    /// An alias that is not of the form `{token.path}`.
    InvalidAliasFormat { raw: String },
}

impl fmt::Display for ShapeProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeProblem::Empty => f.write_str("empty object is neither a token nor a group"),
            ShapeProblem::NoValue => {
                f.write_str("object has no value, no alias and no nested tokens")
            }
            ShapeProblem::MissingValue => f.write_str("token value is missing"),
            ShapeProblem::InvalidValueType { found } => {
                write!(f, "token value must be a string or number, found {}", found)
            }
            ShapeProblem::InvalidAliasFormat { raw } => {
                write!(f, "alias '{}' must be in the form {{token.path}}", raw)
            }
        }
    }
}

/// A node that was kept from the source but could not be classified.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedNode {
    pub problem: ShapeProblem,
    /// The source object, kept so the tree serializes back unchanged.
    pub raw: Value,
}

/// One entry of a [`TokenTree`].
#[derive(Debug, Clone, PartialEq)]
pub enum TokenNode {
    Token(Token),
    Group(TokenTree),
    /// Arrays and bare scalars. Kept, never traversed.
    Opaque(Value),
    Malformed(MalformedNode),
}

impl From<Token> for TokenNode {
    fn from(token: Token) -> Self {
        TokenNode::Token(token)
    }
}

impl From<TokenTree> for TokenNode {
    fn from(tree: TokenTree) -> Self {
        TokenNode::Group(tree)
    }
}

/// A nested mapping from keys to tokens or further groups.
///
/// Keys keep their insertion order. Equality compares entries as a map, so two
/// trees with the same entries in a different order are equal.
///
/// # Example
///
/// ```rust
/// use tokiforge_core::{Token, TokenPath, TokenTree};
///
/// let tree = TokenTree::new().with(
///     "color",
///     TokenTree::new()
///         .with("base", Token::literal("#000"))
///         .with("text", Token::alias(TokenPath::parse("color.base").unwrap())),
/// );
///
/// let text = tree.token(&TokenPath::parse("color.text").unwrap()).unwrap();
/// assert!(text.is_alias());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenTree {
    children: IndexMap<String, TokenNode>,
}

impl TokenTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, returning `self` for chaining. An existing key is replaced.
    pub fn with(mut self, key: impl Into<String>, node: impl Into<TokenNode>) -> Self {
        self.insert(key, node);
        self
    }

    /// Inserts an entry, returning the node previously stored under `key`.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        node: impl Into<TokenNode>,
    ) -> Option<TokenNode> {
        self.children.insert(key.into(), node.into())
    }

    /// Inserts a token at `path`, creating groups along the way.
    ///
    /// Any non-group node found where a group is needed is replaced.
    pub fn insert_token(&mut self, path: &TokenPath, token: Token) {
        let Some((last, parents)) = path.segments().split_last() else {
            return;
        };
        let mut current = self;
        for segment in parents {
            let node = current
                .children
                .entry(segment.clone())
                .or_insert_with(|| TokenNode::Group(TokenTree::new()));
            if !matches!(node, TokenNode::Group(_)) {
                *node = TokenNode::Group(TokenTree::new());
            }
            let TokenNode::Group(group) = node else {
                return;
            };
            current = group;
        }
        current.children.insert(last.clone(), TokenNode::Token(token));
    }

    pub fn child(&self, key: &str) -> Option<&TokenNode> {
        self.children.get(key)
    }

    /// Looks up the node at `path`, walking from this tree.
    pub fn get(&self, path: &TokenPath) -> Option<&TokenNode> {
        let (first, rest) = path.segments().split_first()?;
        let mut node = self.children.get(first)?;
        for segment in rest {
            match node {
                TokenNode::Group(group) => node = group.children.get(segment)?,
                _ => return None,
            }
        }
        Some(node)
    }

    /// Looks up the token at `path`. Groups and other nodes yield `None`.
    pub fn token(&self, path: &TokenPath) -> Option<&Token> {
        match self.get(path)? {
            TokenNode::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TokenNode)> {
        self.children.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Paths of every token in depth-first order.
    pub fn token_paths(&self) -> Vec<TokenPath> {
        crate::flatten::flatten(self)
            .into_iter()
            .map(|entry| entry.path)
            .collect()
    }

    /// True when no token is an alias and no node is malformed.
    pub fn is_resolved(&self) -> bool {
        self.children.values().all(|node| match node {
            TokenNode::Token(token) => !token.is_alias(),
            TokenNode::Group(group) => group.is_resolved(),
            TokenNode::Opaque(_) => true,
            TokenNode::Malformed(_) => false,
        })
    }

    /// Builds a tree from a deserialized JSON/YAML value.
    ///
    /// The root must be a mapping. Below the root nothing is rejected here:
    /// objects that cannot be read as tokens become [`TokenNode::Malformed`]
    /// and are reported by [`validate`](crate::validate()).
    pub fn from_value(value: Value) -> Result<Self, ValidationErrors> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(ValidationErrors::from(ValidationIssue::new(
                TokenPath::root(),
                IssueKind::RootNotMapping {
                    found: json_kind(&other),
                },
            ))),
        }
    }

    fn from_map(map: Map<String, Value>) -> Self {
        let children = map
            .into_iter()
            .map(|(key, value)| (key, ingest_node(value)))
            .collect();
        Self { children }
    }
}

fn ingest_node(value: Value) -> TokenNode {
    match value {
        Value::Object(map) => ingest_object(map),
        other => TokenNode::Opaque(other),
    }
}

fn is_token_shaped(map: &Map<String, Value>) -> bool {
    map.contains_key("value") || map.contains_key("$value") || map.contains_key("$alias")
}

fn ingest_object(map: Map<String, Value>) -> TokenNode {
    if map.is_empty() {
        return malformed(ShapeProblem::Empty, Value::Object(map));
    }
    if is_token_shaped(&map) {
        return ingest_token(map);
    }
    let has_nesting = map
        .values()
        .any(|v| matches!(v, Value::Object(_) | Value::Array(_)));
    if !has_nesting {
        return malformed(ShapeProblem::NoValue, Value::Object(map));
    }
    TokenNode::Group(TokenTree::from_map(map))
}

fn ingest_token(map: Map<String, Value>) -> TokenNode {
    let raw = Value::Object(map.clone());
    let mut alias = None;
    let mut dollar_value = None;
    let mut value = None;
    let mut meta = TokenMeta::default();

    for (key, field) in map {
        match key.as_str() {
            "$alias" => alias = Some(field),
            "$value" => dollar_value = Some(field),
            "value" => value = Some(field),
            "type" => match field.as_str().and_then(TokenType::parse) {
                Some(token_type) => meta.token_type = Some(token_type),
                None => {
                    meta.extra.insert(key, field);
                }
            },
            "description" => match field {
                Value::String(description) => meta.description = Some(description),
                other => {
                    meta.extra.insert(key, other);
                }
            },
            _ => {
                meta.extra.insert(key, field);
            }
        }
    }

    // `$alias` wins over any literal carried alongside it.
    if let Some(alias) = alias.filter(|a| !a.is_null()) {
        return match alias {
            Value::String(text) => match TokenPath::parse_alias(&text) {
                Some(target) => TokenNode::Token(Token::Alias(AliasToken { target, meta })),
                None => malformed(ShapeProblem::InvalidAliasFormat { raw: text }, raw),
            },
            other => malformed(
                ShapeProblem::InvalidAliasFormat {
                    raw: other.to_string(),
                },
                raw,
            ),
        };
    }

    let slot = [dollar_value, value]
        .into_iter()
        .flatten()
        .find(|v| !v.is_null());

    match slot {
        None => malformed(ShapeProblem::MissingValue, raw),
        Some(Value::String(text)) if looks_like_alias(&text) => {
            match TokenPath::parse_alias(&text) {
                Some(target) => TokenNode::Token(Token::Alias(AliasToken { target, meta })),
                None => malformed(ShapeProblem::InvalidAliasFormat { raw: text }, raw),
            }
        }
        Some(Value::String(text)) => TokenNode::Token(Token::Literal(LiteralToken {
            value: TokenValue::Str(text),
            meta,
        })),
        Some(Value::Number(n)) => TokenNode::Token(Token::Literal(LiteralToken {
            value: TokenValue::Number(n),
            meta,
        })),
        Some(other) => malformed(
            ShapeProblem::InvalidValueType {
                found: json_kind(&other),
            },
            raw,
        ),
    }
}

fn malformed(problem: ShapeProblem, raw: Value) -> TokenNode {
    TokenNode::Malformed(MalformedNode { problem, raw })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Serialize for TokenNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TokenNode::Token(token) => token.serialize(serializer),
            TokenNode::Group(group) => group.serialize(serializer),
            TokenNode::Opaque(value) => value.serialize(serializer),
            TokenNode::Malformed(node) => node.raw.serialize(serializer),
        }
    }
}

impl Serialize for TokenTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.children.len()))?;
        for (key, node) in &self.children {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TokenTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        TokenTree::from_value(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: Value) -> TokenTree {
        TokenTree::from_value(value).unwrap()
    }

    fn path(dotted: &str) -> TokenPath {
        TokenPath::parse(dotted).unwrap()
    }

    #[test]
    fn test_ingest_literal_with_meta() {
        let t = tree(json!({
            "color": {"primary": {"value": "#7C3AED", "type": "color", "description": "Brand"}}
        }));
        let token = t.token(&path("color.primary")).unwrap();
        assert_eq!(token.value(), Some(&TokenValue::from("#7C3AED")));
        assert_eq!(token.token_type(), Some(TokenType::Color));
        assert_eq!(token.description(), Some("Brand"));
    }

    #[test]
    fn test_ingest_dollar_value_and_number() {
        let t = tree(json!({"space": {"sm": {"$value": 4}}}));
        let token = t.token(&path("space.sm")).unwrap();
        assert_eq!(token.value(), Some(&TokenValue::from(4)));
    }

    #[test]
    fn test_alias_field_wins_over_value() {
        let t = tree(json!({
            "a": {"value": "#000"},
            "b": {"value": "#fff", "$alias": "{a}"}
        }));
        assert_eq!(t.token(&path("b")).unwrap().alias_target(), Some(&path("a")));
    }

    #[test]
    fn test_value_field_doubles_as_alias() {
        let t = tree(json!({"a": {"value": "#000"}, "b": {"value": "{a}"}}));
        assert!(t.token(&path("b")).unwrap().is_alias());
    }

    #[test]
    fn test_unknown_type_kept_in_extra() {
        let t = tree(json!({
            "shadow": {"value": "0 1px 2px", "type": "shadow", "deprecated": true}
        }));
        let token = t.token(&path("shadow")).unwrap();
        assert_eq!(token.token_type(), None);
        assert_eq!(token.meta().extra.get("type"), Some(&json!("shadow")));
        assert_eq!(token.meta().extra.get("deprecated"), Some(&json!(true)));
    }

    #[test]
    fn test_malformed_nodes_are_kept() {
        let t = tree(json!({
            "empty": {},
            "nothing": {"type": "color"},
            "null": {"value": null},
            "bool": {"value": true},
            "bad_alias": {"$alias": "color.base"},
            "bad_inline": {"value": "{a..b}"}
        }));
        let problem = |key: &str| match t.child(key).unwrap() {
            TokenNode::Malformed(node) => node.problem.clone(),
            other => panic!("expected malformed node at {}, got {:?}", key, other),
        };
        assert_eq!(problem("empty"), ShapeProblem::Empty);
        assert_eq!(problem("nothing"), ShapeProblem::NoValue);
        assert_eq!(problem("null"), ShapeProblem::MissingValue);
        assert_eq!(problem("bool"), ShapeProblem::InvalidValueType { found: "boolean" });
        assert_eq!(
            problem("bad_alias"),
            ShapeProblem::InvalidAliasFormat {
                raw: "color.base".into()
            }
        );
        assert!(matches!(
            problem("bad_inline"),
            ShapeProblem::InvalidAliasFormat { .. }
        ));
    }

    #[test]
    fn test_arrays_are_opaque() {
        let t = tree(json!({"font": {"stack": ["Inter", "sans-serif"]}, "version": "1.0"}));
        assert!(matches!(t.get(&path("font.stack")), Some(TokenNode::Opaque(_))));
        assert!(matches!(t.child("version"), Some(TokenNode::Opaque(_))));
    }

    #[test]
    fn test_root_must_be_mapping() {
        let err = TokenTree::from_value(json!(["a"])).unwrap_err();
        assert_eq!(err.issues().len(), 1);
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_key_order_preserved() {
        let t = tree(json!({"z": {"value": 1}, "a": {"value": 2}, "m": {"value": 3}}));
        assert_eq!(t.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_get_does_not_walk_into_tokens() {
        let t = tree(json!({"color": {"primary": {"value": "#000"}}}));
        assert!(t.get(&path("color.primary.value")).is_none());
        assert!(t.token(&path("color")).is_none());
        assert!(t.get(&TokenPath::root()).is_none());
    }

    #[test]
    fn test_insert_token_creates_groups() {
        let mut t = TokenTree::new();
        t.insert_token(&path("a.b.c"), Token::literal("1"));
        t.insert_token(&path("a.d"), Token::literal("2"));
        assert_eq!(t.token_paths(), vec![path("a.b.c"), path("a.d")]);
    }

    #[test]
    fn test_serialize_round_trip() {
        let source = json!({
            "color": {
                "base": {"value": "#000", "type": "color"},
                "text": {"$alias": "{color.base}", "description": "Body text"}
            },
            "font": {"stack": ["Inter"]},
            "broken": {}
        });
        let t = tree(source.clone());
        assert_eq!(serde_json::to_value(&t).unwrap(), source);
        let back: TokenTree = serde_json::from_value(serde_json::to_value(&t).unwrap()).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_is_resolved() {
        assert!(tree(json!({"a": {"value": 1}})).is_resolved());
        assert!(!tree(json!({"a": {"value": 1}, "b": {"value": "{a}"}})).is_resolved());
        assert!(!tree(json!({"a": {}})).is_resolved());
    }
}
