//! The token tree model.
//!
//! A token document is a nested mapping whose leaves are tokens:
//!
//! ```yaml
//! color:
//!   base:
//!     value: "#7C3AED"
//!     type: color
//!   accent:
//!     $alias: "{color.base}"
//! ```
//!
//! The raw forms (`value`, `$value`, `$alias`, and string values shaped like
//! `{a.b}`) are classified once, at ingestion, into [`Token::Literal`] or
//! [`Token::Alias`]. Objects that cannot be classified are kept as
//! [`TokenNode::Malformed`] so validation can report them with their path.

mod node;
mod path;
mod token;

pub use node::{MalformedNode, ShapeProblem, TokenNode, TokenTree};
pub use path::TokenPath;
pub use token::{AliasToken, LiteralToken, Token, TokenMeta, TokenType, TokenValue};
