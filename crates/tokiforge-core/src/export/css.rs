use crate::flatten::FlatToken;
use crate::naming::{css_var_reference, css_variable};
use crate::tree::Token;

use super::ExportOptions;

/// One custom property per token inside a `selector { … }` rule.
///
/// An empty token list still gives a valid, empty rule.
pub fn export_css(tokens: &[FlatToken<'_>], options: &ExportOptions) -> String {
    let mut out = format!("{} {{\n", options.selector);
    for entry in tokens {
        let value = match entry.token {
            Token::Literal(token) => token.value.to_string(),
            Token::Alias(token) => css_var_reference(&options.prefix, &token.target),
        };
        out.push_str(&format!(
            "  {}: {};\n",
            css_variable(&options.prefix, &entry.path),
            value
        ));
    }
    out.push('}');
    out
}
