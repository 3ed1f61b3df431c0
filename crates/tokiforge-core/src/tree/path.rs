//! Dot-separated token paths and `{alias}` references.

use std::fmt;

/// Location of a node in a token tree, addressed from the root.
///
/// Paths are written with `.` between keys (`color.primary.base`). Keys may
/// contain any character except `.`, and no key may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenPath(Vec<String>);

impl TokenPath {
    /// The empty path, naming the root of a tree.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Builds a path from its keys.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Parses a dotted path such as `color.primary`.
    ///
    /// Returns `None` for the empty string or when any key is empty
    /// (`color..primary`, `.color`).
    pub fn parse(dotted: &str) -> Option<Self> {
        if dotted.is_empty() {
            return None;
        }
        let segments: Vec<String> = dotted.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }
        Some(Self(segments))
    }

    /// Parses an alias reference of the form `{color.primary}`.
    ///
    /// Returns `None` unless the text is wrapped in braces around a valid path.
    pub fn parse_alias(raw: &str) -> Option<Self> {
        let inner = raw.strip_prefix('{')?.strip_suffix('}')?;
        if inner.contains(['{', '}']) {
            return None;
        }
        Self::parse(inner)
    }

    /// Renders this path as an alias reference, `{a.b.c}`.
    pub fn to_alias(&self) -> String {
        format!("{{{}}}", self.dotted())
    }

    /// The keys of this path, root first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The last key, if any.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new path with `key` appended.
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.to_string());
        Self(segments)
    }

    /// The keys joined with `.`.
    pub fn dotted(&self) -> String {
        self.0.join(".")
    }
}

/// Returns true if `text` has the outer shape of an alias reference.
///
/// This only checks the braces; use [`TokenPath::parse_alias`] to validate
/// the path inside them.
pub(crate) fn looks_like_alias(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('{') && text.ends_with('}')
}

impl fmt::Display for TokenPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.dotted())
        }
    }
}

impl From<&[&str]> for TokenPath {
    fn from(segments: &[&str]) -> Self {
        Self::from_segments(segments.iter().copied())
    }
}
