//! Helpers for running a rule over TypeScript snippets.

use prisma_lint_core::{FileContext, Rule, SourceParser, Violation};
use prisma_lint_ts::TypeScriptParser;
use std::path::Path;

/// Parses `code` as if it lived at `path` and runs `rule` over it.
pub fn check_source(rule: &dyn Rule, path: &str, code: &str) -> Vec<Violation> {
    let path = Path::new(path);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let program = TypeScriptParser::new()
        .parse(code, &extension)
        .expect("fixture should parse");
    let ctx = FileContext::new(path, code, Path::new(""));
    rule.check(&ctx, &program)
}

/// Message ids of `violations`, in order.
pub fn ids(violations: &[Violation]) -> Vec<&str> {
    violations
        .iter()
        .filter_map(|v| v.message_id.as_deref())
        .collect()
}
