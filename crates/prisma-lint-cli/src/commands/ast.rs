//! Ast command implementation.

use anyhow::{anyhow, Context, Result};
use prisma_lint_core::SourceParser;
use prisma_lint_ts::TypeScriptParser;
use std::path::Path;

/// Runs the ast command: parses `file` and prints the lowered tree as JSON.
///
/// Syntax errors are tolerated so broken files can still be inspected.
pub fn run(file: &Path) -> Result<()> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    println!("{}", dump(file, &source)?);
    Ok(())
}

fn dump(file: &Path, source: &str) -> Result<String> {
    let parser = TypeScriptParser::new().lenient(true);
    let extension = file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    if !parser.handles(&extension) {
        return Err(anyhow!("Unsupported file type: {}", file.display()));
    }

    let program = parser
        .parse(source, &extension)
        .map_err(|e| anyhow!("{}: {e}", file.display()))?;
    Ok(serde_json::to_string_pretty(&program)?)
}
