//! Structural and alias validation.
//!
//! Both passes walk the whole tree and collect every problem rather than
//! stopping at the first one.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::error::{IssueKind, ValidationErrors, ValidationIssue};
use crate::flatten::flatten;
use crate::tree::{TokenNode, TokenPath, TokenTree};

/// Checks that every node is a well-formed token or group.
///
/// Returns every malformed node, in depth-first order, in one error.
/// Opaque leaves (arrays, bare scalars) are accepted. Alias targets are not
/// checked here; see [`validate_aliases`].
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tokiforge_core::{validate, TokenTree};
///
/// let tree = TokenTree::from_value(json!({
///     "color": {"primary": {"value": "#7C3AED"}, "broken": {}},
///     "space": {"sm": {"value": null}}
/// })).unwrap();
///
/// let err = validate(&tree).unwrap_err();
/// assert_eq!(err.issues().len(), 2);
/// ```
pub fn validate(tree: &TokenTree) -> Result<(), ValidationErrors> {
    let mut issues = Vec::new();
    collect_shape_issues(tree, &TokenPath::root(), &mut issues);
    debug!(problems = issues.len(), "validated token tree structure");
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors::new(issues))
    }
}

fn collect_shape_issues(tree: &TokenTree, at: &TokenPath, issues: &mut Vec<ValidationIssue>) {
    for (key, node) in tree.iter() {
        match node {
            TokenNode::Group(group) => collect_shape_issues(group, &at.child(key), issues),
            TokenNode::Malformed(node) => issues.push(ValidationIssue::new(
                at.child(key),
                IssueKind::Shape(node.problem.clone()),
            )),
            TokenNode::Token(_) | TokenNode::Opaque(_) => {}
        }
    }
}

/// An alias whose target is not a token of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasIssue {
    /// Path of the token declaring the alias.
    pub at: TokenPath,
    /// The path it refers to.
    pub target: TokenPath,
}

impl fmt::Display for AliasIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} references non-existent token {}", self.at, self.target)
    }
}

/// Outcome of [`validate_aliases`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasReport {
    pub issues: Vec<AliasIssue>,
}

impl AliasReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Converts orphaned aliases into validation errors.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.issues.is_empty() {
            return Ok(());
        }
        Err(ValidationErrors::new(
            self.issues
                .into_iter()
                .map(|issue| {
                    let kind = IssueKind::OrphanedAlias {
                        target: issue.target,
                    };
                    ValidationIssue::new(issue.at, kind)
                })
                .collect(),
        ))
    }
}

/// Checks that every alias names a token present in the tree.
///
/// This runs on the unresolved tree and does not follow chains, so an alias
/// pointing at another alias is accepted here even if that chain later
/// cycles. A target that is a group is reported the same as a missing one.
pub fn validate_aliases(tree: &TokenTree) -> AliasReport {
    let flat = flatten(tree);
    let known: HashSet<&TokenPath> = flat.iter().map(|entry| &entry.path).collect();
    let issues: Vec<AliasIssue> = flat
        .iter()
        .filter_map(|entry| {
            let target = entry.token.alias_target()?;
            (!known.contains(target)).then(|| AliasIssue {
                at: entry.path.clone(),
                target: target.clone(),
            })
        })
        .collect();
    debug!(orphans = issues.len(), "validated aliases");
    AliasReport { issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ShapeProblem;
    use serde_json::{json, Value};

    fn tree(value: Value) -> TokenTree {
        TokenTree::from_value(value).unwrap()
    }

    fn path(dotted: &str) -> TokenPath {
        TokenPath::parse(dotted).unwrap()
    }

    #[test]
    fn test_valid_tree_passes() {
        let t = tree(json!({
            "color": {"base": {"value": "#000"}, "text": {"value": "{color.base}"}},
            "font": {"stack": ["Inter"]}
        }));
        assert!(validate(&t).is_ok());
        assert!(validate_aliases(&t).is_valid());
    }

    #[test]
    fn test_collects_every_shape_problem() {
        let t = tree(json!({
            "a": {},
            "group": {"b": {"value": true}, "ok": {"value": 1}},
            "c": {"type": "color"}
        }));
        let err = validate(&t).unwrap_err();
        let found: Vec<(String, IssueKind)> = err
            .issues()
            .iter()
            .map(|i| (i.path.to_string(), i.kind.clone()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("a".to_string(), IssueKind::Shape(ShapeProblem::Empty)),
                (
                    "group.b".to_string(),
                    IssueKind::Shape(ShapeProblem::InvalidValueType { found: "boolean" })
                ),
                ("c".to_string(), IssueKind::Shape(ShapeProblem::NoValue)),
            ]
        );
    }

    #[test]
    fn test_orphaned_aliases_all_reported() {
        let t = tree(json!({
            "a": {"value": "{missing.one}"},
            "b": {"$alias": "{missing.two}"},
            "c": {"value": "#000"}
        }));
        let report = validate_aliases(&t);
        assert_eq!(
            report.issues,
            vec![
                AliasIssue { at: path("a"), target: path("missing.one") },
                AliasIssue { at: path("b"), target: path("missing.two") },
            ]
        );
    }

    #[test]
    fn test_alias_to_group_is_orphaned() {
        let t = tree(json!({
            "color": {"base": {"value": "#000"}},
            "text": {"value": "{color}"}
        }));
        assert_eq!(validate_aliases(&t).issues.len(), 1);
    }

    #[test]
    fn test_alias_chain_is_not_followed() {
        let t = tree(json!({"a": {"value": "{b}"}, "b": {"value": "{a}"}}));
        assert!(validate_aliases(&t).is_valid());
    }

    #[test]
    fn test_into_result_maps_to_orphaned_alias() {
        let t = tree(json!({"a": {"value": "{gone}"}}));
        let err = validate_aliases(&t).into_result().unwrap_err();
        assert_eq!(
            err.issues()[0].kind,
            IssueKind::OrphanedAlias { target: path("gone") }
        );
        assert!(err.to_string().contains("non-existent token: gone"));
    }
}
