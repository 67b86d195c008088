//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! // prisma-lint: allow(find-naming-convention) reason="legacy export job"
//! /* prisma-lint: allow(all) */
//! ```
//!
//! A directive applies to its own line and the line below it.

use std::collections::HashSet;

use crate::context::FileContext;
use crate::rule::Rule;
use crate::types::{Severity, Suggestion, Violation};

const DIRECTIVE_PREFIX: &str = "prisma-lint:";

/// Result of checking for allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
pub struct AllowDirective {
    /// Rule names that are allowed.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

/// Checks source code for an allowance directive covering `line`.
///
/// # Arguments
///
/// * `content` - Source code content
/// * `line` - Line number to check (1-indexed)
/// * `rule_name` - Name of the rule to check for
#[must_use]
pub fn check_allow_with_reason(content: &str, line: usize, rule_name: &str) -> AllowCheck {
    let lines: Vec<&str> = content.lines().collect();

    for check_line in [line.saturating_sub(1), line] {
        if check_line == 0 || check_line > lines.len() {
            continue;
        }

        if let Some(directive) = parse_allow_directive(lines[check_line - 1]) {
            if directive.rules.contains(rule_name) || directive.rules.contains("all") {
                return AllowCheck::Allowed {
                    reason: directive.reason,
                };
            }
        }
    }

    AllowCheck::Denied
}

/// Drops violations covered by allow directives.
///
/// When the rule requires a reason and the directive has none, the violation
/// is replaced by a warning about the missing reason.
#[must_use]
pub fn apply_allow_directives(
    ctx: &FileContext,
    rule: &dyn Rule,
    violations: Vec<Violation>,
) -> Vec<Violation> {
    violations
        .into_iter()
        .filter_map(|violation| {
            let check = check_allow_with_reason(ctx.content, violation.location.line, rule.name());
            if !check.is_allowed() {
                return Some(violation);
            }
            if rule.requires_allow_reason() && check.reason().is_none() {
                let name = rule.name();
                return Some(
                    Violation::new(
                        rule.code(),
                        name,
                        Severity::Warning,
                        violation.location,
                        format!("Allow directive for '{name}' is missing required reason"),
                    )
                    .with_suggestion(Suggestion::new(
                        "Add reason=\"...\" to explain why this exception is necessary",
                    )),
                );
            }
            None
        })
        .collect()
}

/// Parses an allowance directive from a comment line.
///
/// The directive may follow code on the same line.
/// Whether `before` ends with a comment opener followed only by whitespace.
fn opens_comment(before: &str) -> bool {
    let before = before.trim_end();
    before.ends_with("//") || before.ends_with("/*")
}

fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    let directive = line
        .match_indices(DIRECTIVE_PREFIX)
        .find(|(at, _)| opens_comment(&line[..*at]))
        .map(|(at, _)| line[at + DIRECTIVE_PREFIX.len()..].trim_end().trim_end_matches("*/"))?
        .trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest
        .strip_prefix("reason=")
        .map(str::trim)
        .and_then(|r| r.strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()))
        .filter(|r| !r.trim().is_empty());

    Some(AllowDirective { rules, reason })
}
