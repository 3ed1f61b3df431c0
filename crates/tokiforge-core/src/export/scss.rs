use crate::flatten::FlatToken;
use crate::naming::scss_variable;
use crate::tree::Token;

use super::ExportOptions;

/// One `$prefix-path: value;` line per token, with no wrapping rule.
pub fn export_scss(tokens: &[FlatToken<'_>], options: &ExportOptions) -> String {
    tokens
        .iter()
        .map(|entry| {
            let value = match entry.token {
                Token::Literal(token) => token.value.to_string(),
                Token::Alias(token) => scss_variable(&options.prefix, &token.target),
            };
            format!("{}: {};", scss_variable(&options.prefix, &entry.path), value)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::flatten;
    use crate::tree::TokenTree;
    use serde_json::json;

    #[test]
    fn test_lines() {
        let tree = TokenTree::from_value(json!({
            "fontFamily": {"body": {"value": "Inter, sans-serif"}},
            "base": {"value": "#000"},
            "text": {"$alias": "{base}"}
        }))
        .unwrap();
        assert_eq!(
            export_scss(&flatten(&tree), &ExportOptions::default()),
            "$hf-font-family-body: Inter, sans-serif;\n$hf-base: #000;\n$hf-text: $hf-base;"
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(export_scss(&[], &ExportOptions::default()), "");
    }
}
