//! Conversion between nested token trees and ordered `(path, token)` lists.

use crate::tree::{Token, TokenNode, TokenPath, TokenTree};

/// A token together with its path from the tree root.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatToken<'a> {
    pub path: TokenPath,
    pub token: &'a Token,
}

/// Lists every token in `tree`, depth first, children in key order.
///
/// Opaque and malformed nodes are skipped. A token is always a leaf: its own
/// fields are never descended into.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tokiforge_core::{flatten, TokenTree};
///
/// let tree = TokenTree::from_value(json!({
///     "color": {"primary": {"value": "#7C3AED"}, "muted": {"value": "#888"}},
///     "space": {"sm": {"value": 4}}
/// })).unwrap();
///
/// let paths: Vec<String> = flatten(&tree).iter().map(|t| t.path.to_string()).collect();
/// assert_eq!(paths, ["color.primary", "color.muted", "space.sm"]);
/// ```
pub fn flatten(tree: &TokenTree) -> Vec<FlatToken<'_>> {
    let mut out = Vec::new();
    walk(tree, &TokenPath::root(), &mut out);
    out
}

fn walk<'a>(tree: &'a TokenTree, at: &TokenPath, out: &mut Vec<FlatToken<'a>>) {
    for (key, node) in tree.iter() {
        match node {
            TokenNode::Token(token) => out.push(FlatToken {
                path: at.child(key),
                token,
            }),
            TokenNode::Group(group) => walk(group, &at.child(key), out),
            TokenNode::Opaque(_) | TokenNode::Malformed(_) => {}
        }
    }
}

/// Rebuilds a nested tree from `(path, token)` pairs.
///
/// For a tree holding only groups and tokens, `unflatten(flatten(tree))` is
/// equal to the original. Later entries overwrite earlier ones at the same path.
pub fn unflatten<I>(entries: I) -> TokenTree
where
    I: IntoIterator<Item = (TokenPath, Token)>,
{
    let mut tree = TokenTree::new();
    for (path, token) in entries {
        tree.insert_token(&path, token);
    }
    tree
}

impl<'a> FlatToken<'a> {
    /// Owned `(path, token)` pair, as accepted by [`unflatten`].
    pub fn to_owned_pair(&self) -> (TokenPath, Token) {
        (self.path.clone(), self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_flatten_depth_first_in_key_order() {
        let tree = TokenTree::from_value(json!({
            "b": {"y": {"value": 1}, "x": {"nested": {"value": 2}}},
            "a": {"value": 3}
        }))
        .unwrap();

        let paths: Vec<String> = flatten(&tree).iter().map(|t| t.path.to_string()).collect();
        assert_eq!(paths, vec!["b.y", "b.x.nested", "a"]);
    }

    #[test]
    fn test_flatten_skips_opaque_and_malformed() {
        let tree = TokenTree::from_value(json!({
            "stack": ["a", "b"],
            "broken": {},
            "ok": {"value": "1"}
        }))
        .unwrap();
        let flat = flatten(&tree);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].path.to_string(), "ok");
    }

    #[test]
    fn test_token_is_never_recursed_into() {
        let tree = TokenTree::from_value(json!({
            "color": {"value": "#000", "dark": {"value": "#fff"}}
        }))
        .unwrap();
        let flat = flatten(&tree);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].path.to_string(), "color");
    }

    #[test]
    fn test_unflatten_rebuilds_groups() {
        let tree = unflatten([
            (TokenPath::parse("color.primary").unwrap(), Token::literal("#000")),
            (TokenPath::parse("color.muted").unwrap(), Token::literal("#888")),
        ]);
        assert_eq!(tree.len(), 1);
        assert!(matches!(tree.child("color"), Some(TokenNode::Group(g)) if g.len() == 2));
    }

    fn literal_tree() -> impl Strategy<Value = TokenTree> {
        let leaf = prop_oneof![
            "[#a-f0-9]{1,7}".prop_map(|s| TokenNode::Token(Token::literal(s))),
            any::<i32>().prop_map(|n| TokenNode::Token(Token::literal(i64::from(n)))),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop::collection::vec(("[a-zA-Z]{1,6}", inner), 1..4).prop_map(|entries| {
                let mut group = TokenTree::new();
                for (key, node) in entries {
                    group.insert(key, node);
                }
                TokenNode::Group(group)
            })
        })
        .prop_map(|node| match node {
            TokenNode::Group(group) => group,
            leaf => TokenTree::new().with("root", leaf),
        })
    }

    proptest! {
        /// Flattening then unflattening a literal tree gives the same tree.
        #[test]
        fn flatten_unflatten_round_trip(tree in literal_tree()) {
            let rebuilt = unflatten(flatten(&tree).iter().map(FlatToken::to_owned_pair));
            prop_assert_eq!(rebuilt, tree);
        }

        /// Every flattened path resolves back to the same token.
        #[test]
        fn flattened_paths_address_their_tokens(tree in literal_tree()) {
            for entry in flatten(&tree) {
                prop_assert_eq!(tree.token(&entry.path), Some(entry.token));
            }
        }
    }
}
