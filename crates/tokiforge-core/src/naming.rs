//! CSS and SCSS variable names derived from token paths.
//!
//! External stylesheets bind to these exact names, so the transform is fixed:
//! each key is kebab-cased (`colorPrimary` becomes `color-primary`), keys are
//! joined with `-`, and a non-empty prefix is put in front unchanged apart
//! from the same casing rule.

use crate::tree::TokenPath;

/// Lowercases `key`, putting a `-` before every ASCII uppercase letter.
///
/// Leading capitals also get a hyphen (`Primary` becomes `-primary`); no
/// hyphens are collapsed.
pub fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

/// The bare variable name: prefix and path keys, kebab-cased, joined by `-`.
pub fn variable_stem(prefix: &str, path: &TokenPath) -> String {
    let prefix = (!prefix.is_empty()).then_some(prefix);
    prefix
        .into_iter()
        .chain(path.segments().iter().map(String::as_str))
        .map(kebab_case)
        .collect::<Vec<_>>()
        .join("-")
}

/// `--hf-color-primary` for `color.primary` with prefix `hf`.
pub fn css_variable(prefix: &str, path: &TokenPath) -> String {
    format!("--{}", variable_stem(prefix, path))
}

/// `$hf-color-primary` for `color.primary` with prefix `hf`.
pub fn scss_variable(prefix: &str, path: &TokenPath) -> String {
    format!("${}", variable_stem(prefix, path))
}

/// `var(--hf-color-primary)`, the reference form used in JS/TS exports.
pub fn css_var_reference(prefix: &str, path: &TokenPath) -> String {
    format!("var({})", css_variable(prefix, path))
}
