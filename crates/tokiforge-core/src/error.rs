//! Error types for token parsing, validation, resolution and export.
//!
//! Each stage has its own error type carrying the offending paths, so callers
//! can branch on the kind of failure instead of matching message text.
//! [`TokenError`] wraps all of them for pipelines that run several stages.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::tree::{ShapeProblem, TokenPath};

/// A single structural problem found by validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: TokenPath,
    pub kind: IssueKind,
}

impl ValidationIssue {
    pub fn new(path: TokenPath, kind: IssueKind) -> Self {
        Self { path, kind }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at {}: {}", self.path, self.kind)
    }
}

/// What is wrong at a [`ValidationIssue`]'s path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// The document root is not a mapping.
    RootNotMapping { found: &'static str },
    /// A node is neither a valid token nor a group.
    Shape(ShapeProblem),
    /// An alias names a path that is not a token in the tree.
    OrphanedAlias { target: TokenPath },
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::RootNotMapping { found } => {
                write!(f, "token document must be a mapping, found {}", found)
            }
            IssueKind::Shape(problem) => write!(f, "{}", problem),
            IssueKind::OrphanedAlias { target } => {
                write!(f, "alias references non-existent token: {}", target)
            }
        }
    }
}

/// Every problem found by a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("token validation failed with {} problem(s): {}", .issues.len(), join_issues(.issues))]
pub struct ValidationErrors {
    issues: Vec<ValidationIssue>,
}

impl ValidationErrors {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }
}

impl From<ValidationIssue> for ValidationErrors {
    fn from(issue: ValidationIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error returned when alias resolution fails.
///
/// Resolution is all-or-nothing: any of these aborts the whole tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The alias target does not exist.
    #[error("token reference not found: {path} (referenced from {referenced_from})")]
    ReferenceNotFound {
        path: TokenPath,
        referenced_from: TokenPath,
    },

    /// An alias string is not wrapped in `{}` or has an empty key.
    #[error("invalid reference format at {at}: '{raw}' must be in the form {{token.path}}")]
    InvalidReferenceFormat { raw: String, at: TokenPath },

    /// Following aliases revisited a path already in the chain.
    #[error("cyclic token reference: {}", join_chain(.chain))]
    CyclicReference { chain: Vec<TokenPath> },

    /// The alias target is a group or an opaque value rather than a token.
    #[error("token reference {path} (referenced from {referenced_from}) is not a token")]
    TargetNotToken {
        path: TokenPath,
        referenced_from: TokenPath,
    },

    /// A node in the tree could not be read as a token.
    #[error("malformed token at {path}: {problem}")]
    Malformed { path: TokenPath, problem: ShapeProblem },
}

fn join_chain(chain: &[TokenPath]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Error returned by the exporters.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unsupported format: {0} (expected one of css, scss, js, ts, json)")]
    UnsupportedFormat(String),

    #[error("failed to serialize tokens: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Error returned when a token document cannot be read or deserialized.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON token document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML token document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error returned when a project configuration cannot be loaded.
#[derive(Debug, Error)]
pub enum ProjectConfigError {
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Any failure of the token pipeline.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ProjectConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(dotted: &str) -> TokenPath {
        TokenPath::parse(dotted).unwrap()
    }

    #[test]
    fn test_reference_not_found_display() {
        let err = ResolveError::ReferenceNotFound {
            path: path("color.missing"),
            referenced_from: path("color.text"),
        };
        let msg = err.to_string();
        assert!(msg.contains("color.missing"));
        assert!(msg.contains("color.text"));
    }

    #[test]
    fn test_cycle_display() {
        let err = ResolveError::CyclicReference {
            chain: vec![path("a"), path("b"), path("a")],
        };
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn test_invalid_format_display() {
        let err = ResolveError::InvalidReferenceFormat {
            raw: "color.base".into(),
            at: path("color.text"),
        };
        assert!(err.to_string().contains("{token.path}"));
    }

    #[test]
    fn test_validation_errors_lists_every_issue() {
        let err = ValidationErrors::new(vec![
            ValidationIssue::new(path("a"), IssueKind::Shape(ShapeProblem::Empty)),
            ValidationIssue::new(path("b"), IssueKind::Shape(ShapeProblem::MissingValue)),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("2 problem(s)"));
        assert!(msg.contains("at a:"));
        assert!(msg.contains("at b:"));
    }

    #[test]
    fn test_unsupported_format_names_request() {
        let err = ExportError::UnsupportedFormat("xml".into());
        assert!(err.to_string().contains("xml"));
    }

    #[test]
    fn test_token_error_from_resolve() {
        let err: TokenError = ResolveError::CyclicReference { chain: vec![] }.into();
        assert!(matches!(err, TokenError::Resolve(_)));
    }
}
