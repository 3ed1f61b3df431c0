//! JavaScript and TypeScript module exporters.

use serde_json::{Map, Value};

use crate::error::ExportError;
use crate::flatten::FlatToken;
use crate::naming::css_var_reference;
use crate::tree::Token;

use super::ExportOptions;

/// An ES module whose default export mirrors the token tree.
///
/// ```text
/// export default {
///   "color": {
///     "primary": "#7C3AED"
///   }
/// };
/// ```
pub fn export_js(tokens: &[FlatToken<'_>], options: &ExportOptions) -> Result<String, ExportError> {
    let object = nested_object(tokens, options);
    Ok(format!(
        "export default {};",
        serde_json::to_string_pretty(&object)?
    ))
}

/// A TypeScript module with a `DesignTokens` type above the value export.
///
/// Leaves are typed from their value (`string` or `number`); with
/// `variables` set every leaf is a `var(…)` string.
pub fn export_ts(tokens: &[FlatToken<'_>], options: &ExportOptions) -> Result<String, ExportError> {
    let object = nested_object(tokens, options);
    let mut declaration = String::new();
    write_type(&object, 0, &mut declaration);
    Ok(format!(
        "export type DesignTokens = {};\n\nconst tokens: DesignTokens = {};\n\nexport default tokens;",
        declaration,
        serde_json::to_string_pretty(&object)?
    ))
}

fn nested_object(tokens: &[FlatToken<'_>], options: &ExportOptions) -> Map<String, Value> {
    let mut root = Map::new();
    'tokens: for entry in tokens {
        let Some((last, parents)) = entry.path.segments().split_last() else {
            continue;
        };
        let leaf = if options.variables {
            Value::String(css_var_reference(&options.prefix, &entry.path))
        } else {
            match entry.token {
                Token::Literal(token) => token.value.to_json(),
                Token::Alias(token) => Value::String(token.target.to_alias()),
            }
        };
        let mut current = &mut root;
        for segment in parents {
            let slot = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Value::Object(map) = slot else {
                continue 'tokens;
            };
            current = map;
        }
        current.insert(last.clone(), leaf);
    }
    root
}

fn write_type(object: &Map<String, Value>, depth: usize, out: &mut String) {
    if object.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    let indent = "  ".repeat(depth + 1);
    for (key, value) in object {
        out.push_str(&indent);
        out.push_str(&property_name(key));
        out.push_str(": ");
        match value {
            Value::Object(child) => write_type(child, depth + 1, out),
            Value::Number(_) => out.push_str("number"),
            _ => out.push_str("string"),
        }
        out.push_str(";\n");
    }
    out.push_str(&"  ".repeat(depth));
    out.push('}');
}

/// Bare identifiers stay as they are; anything else is quoted.
fn property_name(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        key.to_string()
    } else {
        Value::String(key.to_string()).to_string()
    }
}
