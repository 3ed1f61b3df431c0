//! Pass/fail checks for continuous integration.
//!
//! [`check`] runs the validators over an unresolved tree and gathers the
//! results into a [`CheckReport`] that can be printed and turned into a
//! process exit code.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::TokenError;
use crate::parse::{load_tokens, ParseOptions};
use crate::resolve::resolve;
use crate::tree::TokenTree;
use crate::validate::{validate, validate_aliases};

pub const STRUCTURE_CHECK: &str = "Token Validation";
pub const ALIAS_CHECK: &str = "Alias Validation";
pub const REFERENCE_CHECK: &str = "Reference Resolution";
pub const FILE_CHECK: &str = "File Parsing";

/// Options for [`check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOptions {
    /// Treat orphaned aliases as errors instead of warnings.
    pub strict: bool,
    /// Also resolve the tree, catching cycles and aliases to groups.
    pub resolve_references: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            strict: false,
            resolve_references: true,
        }
    }
}

impl CheckOptions {
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }
}

/// The outcome of one named check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    pub name: &'static str,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Check {
    fn pass(name: &'static str) -> Self {
        Self {
            name,
            passed: true,
            message: None,
        }
    }

    fn fail(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            passed: false,
            message: Some(message.into()),
        }
    }
}

/// Results of every check run against a token document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// True when no check produced an error. Warnings do not fail the report.
    pub passed: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub checks: Vec<Check>,
}

impl CheckReport {
    /// `0` when the report passed, `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.passed {
            0
        } else {
            1
        }
    }

    /// A plain-text report for terminals and CI logs.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Token Check Report")?;
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(f, "Status: {}", if self.passed { "PASSED" } else { "FAILED" })?;

        if !self.checks.is_empty() {
            writeln!(f)?;
            writeln!(f, "Checks:")?;
            for check in &self.checks {
                let mark = if check.passed { '✓' } else { '✗' };
                match &check.message {
                    Some(message) => writeln!(f, "  {} {}: {}", mark, check.name, message)?,
                    None => writeln!(f, "  {} {}", mark, check.name)?,
                }
            }
        }
        if !self.errors.is_empty() {
            writeln!(f)?;
            writeln!(f, "Errors:")?;
            for error in &self.errors {
                writeln!(f, "  ✗ {}", error)?;
            }
        }
        if !self.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "  ⚠ {}", warning)?;
            }
        }
        Ok(())
    }
}

/// Runs structural, alias and (optionally) resolution checks on `tree`.
///
/// Resolution only runs when the earlier checks found nothing, so one
/// problem is not reported twice.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tokiforge_core::{check, CheckOptions, TokenTree};
///
/// let tree = TokenTree::from_value(json!({
///     "color": {"text": {"value": "{color.missing}"}}
/// })).unwrap();
///
/// let lenient = check(&tree, CheckOptions::default());
/// assert!(lenient.passed);
/// assert_eq!(lenient.warnings.len(), 1);
///
/// let strict = check(&tree, CheckOptions::strict());
/// assert!(!strict.passed);
/// assert_eq!(strict.exit_code(), 1);
/// ```
pub fn check(tree: &TokenTree, options: CheckOptions) -> CheckReport {
    let mut report = CheckReport::default();

    let structure_ok = match validate(tree) {
        Ok(()) => {
            report.checks.push(Check::pass(STRUCTURE_CHECK));
            true
        }
        Err(err) => {
            report
                .errors
                .extend(err.issues().iter().map(ToString::to_string));
            report.checks.push(Check::fail(STRUCTURE_CHECK, err.to_string()));
            false
        }
    };

    let aliases = validate_aliases(tree);
    let aliases_ok = aliases.is_valid();
    if aliases_ok {
        report.checks.push(Check::pass(ALIAS_CHECK));
    } else {
        let messages = aliases.issues.iter().map(ToString::to_string);
        if options.strict {
            report.errors.extend(messages);
        } else {
            report.warnings.extend(messages);
        }
        report.checks.push(Check::fail(
            ALIAS_CHECK,
            format!("{} alias error(s) found", aliases.issues.len()),
        ));
    }

    if options.resolve_references && structure_ok && aliases_ok {
        match resolve(tree) {
            Ok(_) => report.checks.push(Check::pass(REFERENCE_CHECK)),
            Err(err) => {
                report.errors.push(err.to_string());
                report.checks.push(Check::fail(REFERENCE_CHECK, err.to_string()));
            }
        }
    }

    report.passed = report.errors.is_empty();
    debug!(
        passed = report.passed,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "token check finished"
    );
    report
}

/// Loads a token file and checks it.
///
/// A file that cannot be read or parsed gives a failed report with a single
/// failed [`FILE_CHECK`] rather than an error.
pub fn check_file(path: impl AsRef<Path>, options: CheckOptions) -> CheckReport {
    match load_tokens(path, ParseOptions::raw()) {
        Ok(tree) => check(&tree, options),
        Err(err) => file_failure(&err),
    }
}

fn file_failure(err: &TokenError) -> CheckReport {
    CheckReport {
        passed: false,
        errors: vec![err.to_string()],
        warnings: Vec::new(),
        checks: vec![Check::fail(FILE_CHECK, "failed to read or parse file")],
    }
}
