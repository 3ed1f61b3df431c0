//! Alias resolution.
//!
//! [`resolve`] rebuilds a tree with every alias replaced by the literal value
//! at the end of its chain. Targets are always looked up from the root of the
//! tree being resolved, and every chain is checked for cycles.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::ResolveError;
use crate::tree::{
    LiteralToken, MalformedNode, ShapeProblem, Token, TokenNode, TokenPath, TokenTree, TokenValue,
};

/// Returns a copy of `tree` in which every token is a literal.
///
/// Alias tokens keep their own metadata (type, description, extra fields) and
/// take the value of the literal their chain ends in. Opaque nodes are copied
/// unchanged. Any malformed node, missing target, non-token target or cycle
/// fails the whole call; no partially resolved tree is returned.
///
/// Resolving an already resolved tree returns an equal tree.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tokiforge_core::{resolve, ResolveError, TokenPath, TokenTree};
///
/// let tree = TokenTree::from_value(json!({
///     "a": {
///         "base": {"value": "#000"},
///         "mid": {"value": "{a.base}"},
///         "top": {"$alias": "{a.mid}"}
///     }
/// })).unwrap();
///
/// let resolved = resolve(&tree).unwrap();
/// let top = resolved.token(&TokenPath::parse("a.top").unwrap()).unwrap();
/// assert_eq!(top.value().unwrap().to_string(), "#000");
///
/// let cyclic = TokenTree::from_value(json!({
///     "a": {"value": "{b}"},
///     "b": {"value": "{a}"}
/// })).unwrap();
/// assert!(matches!(resolve(&cyclic), Err(ResolveError::CyclicReference { .. })));
/// ```
pub fn resolve(tree: &TokenTree) -> Result<TokenTree, ResolveError> {
    let mut resolver = Resolver::new(tree);
    let resolved = resolver.resolve_group(tree, &TokenPath::root())?;
    debug!(aliases = resolver.aliases_resolved, "resolved token tree");
    Ok(resolved)
}

/// Resolves the value of the single token at `path`.
///
/// Fails with [`ResolveError::ReferenceNotFound`] (referenced from the root)
/// when nothing exists at `path`.
pub fn resolve_value(tree: &TokenTree, path: &TokenPath) -> Result<TokenValue, ResolveError> {
    let mut resolver = Resolver::new(tree);
    match tree.get(path) {
        Some(TokenNode::Token(Token::Literal(token))) => Ok(token.value.clone()),
        Some(TokenNode::Token(Token::Alias(token))) => resolver.follow(path, &token.target),
        Some(TokenNode::Malformed(node)) => Err(malformed_error(path, node)),
        Some(_) => Err(ResolveError::TargetNotToken {
            path: path.clone(),
            referenced_from: TokenPath::root(),
        }),
        None => Err(ResolveError::ReferenceNotFound {
            path: path.clone(),
            referenced_from: TokenPath::root(),
        }),
    }
}

struct Resolver<'a> {
    root: &'a TokenTree,
    /// Final values of every path already seen in a completed chain.
    cache: HashMap<TokenPath, TokenValue>,
    aliases_resolved: usize,
}

impl<'a> Resolver<'a> {
    fn new(root: &'a TokenTree) -> Self {
        Self {
            root,
            cache: HashMap::new(),
            aliases_resolved: 0,
        }
    }

    fn resolve_group(
        &mut self,
        group: &TokenTree,
        at: &TokenPath,
    ) -> Result<TokenTree, ResolveError> {
        let mut out = TokenTree::new();
        for (key, node) in group.iter() {
            let path = at.child(key);
            let resolved = match node {
                TokenNode::Token(Token::Literal(token)) => {
                    TokenNode::Token(Token::Literal(token.clone()))
                }
                TokenNode::Token(Token::Alias(token)) => {
                    let value = self.follow(&path, &token.target)?;
                    self.aliases_resolved += 1;
                    TokenNode::Token(Token::Literal(LiteralToken {
                        value,
                        meta: token.meta.clone(),
                    }))
                }
                TokenNode::Group(child) => TokenNode::Group(self.resolve_group(child, &path)?),
                TokenNode::Opaque(value) => TokenNode::Opaque(value.clone()),
                TokenNode::Malformed(node) => return Err(malformed_error(&path, node)),
            };
            out.insert(key.clone(), resolved);
        }
        Ok(out)
    }

    /// Follows the alias at `origin` (pointing at `target`) to a literal value.
    fn follow(
        &mut self,
        origin: &TokenPath,
        target: &TokenPath,
    ) -> Result<TokenValue, ResolveError> {
        let mut chain = vec![origin.clone()];
        let mut referenced_from = origin.clone();
        let mut current = target.clone();

        let value = loop {
            trace!(from = %referenced_from, to = %current, "following alias");
            if let Some(value) = self.cache.get(&current) {
                break value.clone();
            }
            if chain.contains(&current) {
                chain.push(current);
                return Err(ResolveError::CyclicReference { chain });
            }
            let node = self
                .root
                .get(&current)
                .ok_or_else(|| ResolveError::ReferenceNotFound {
                    path: current.clone(),
                    referenced_from: referenced_from.clone(),
                })?;
            match node {
                TokenNode::Token(Token::Literal(token)) => break token.value.clone(),
                TokenNode::Token(Token::Alias(token)) => {
                    let next = token.target.clone();
                    chain.push(current.clone());
                    referenced_from = current;
                    current = next;
                }
                TokenNode::Malformed(node) => return Err(malformed_error(&current, node)),
                TokenNode::Group(_) | TokenNode::Opaque(_) => {
                    return Err(ResolveError::TargetNotToken {
                        path: current,
                        referenced_from,
                    })
                }
            }
        };

        for path in chain {
            self.cache.insert(path, value.clone());
        }
        Ok(value)
    }
}

fn malformed_error(path: &TokenPath, node: &MalformedNode) -> ResolveError {
    match &node.problem {
        ShapeProblem::InvalidAliasFormat { raw } => ResolveError::InvalidReferenceFormat {
            raw: raw.clone(),
            at: path.clone(),
        },
        problem => ResolveError::Malformed {
            path: path.clone(),
            problem: problem.clone(),
        },
    }
}
