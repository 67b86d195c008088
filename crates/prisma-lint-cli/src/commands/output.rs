//! Shared output formatting for lint results.

use anyhow::Result;
use miette::GraphicalReportHandler;
use prisma_lint_core::{LintResult, Severity, ViolationDiagnostic};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` is the analyzed directory; `pretty` reads sources relative to it.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(result, std::io::stdout().is_terminal())),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Compact => print!("{}", render_compact(result)),
        OutputFormat::Pretty => print!("{}", render_pretty(result, root)),
    }
    Ok(())
}

fn paint(text: &str, ansi: &str, color: bool) -> String {
    if color {
        format!("\x1b[{ansi}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "31",
        Severity::Warning => "33",
        Severity::Info => "34",
    }
}

pub(crate) fn render_text(result: &LintResult, color: bool) -> String {
    let mut out = String::new();

    for violation in &result.violations {
        let severity = violation.severity.to_string();
        let _ = writeln!(
            out,
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        let _ = writeln!(
            out,
            "  {}: {}",
            paint(&severity, severity_color(violation.severity), color),
            violation.message
        );
        for label in &violation.labels {
            let _ = writeln!(
                out,
                "  = note: {} ({}:{})",
                label.message, label.location.line, label.location.column
            );
        }
        if let Some(suggestion) = &violation.suggestion {
            let _ = writeln!(out, "  = help: {}", suggestion.message);
        }
        out.push('\n');
    }

    for skipped in &result.files_skipped {
        let _ = writeln!(out, "skipped (parse error): {}", skipped.display());
    }

    let (errors, warnings, _) = result.count_by_severity();
    let summary_color = if errors > 0 {
        "31"
    } else if warnings > 0 {
        "33"
    } else {
        "32"
    };
    let _ = writeln!(out, "{}", paint(&result.summary(), summary_color, color));
    out
}

pub(crate) fn render_compact(result: &LintResult) -> String {
    let mut out = String::new();
    for violation in &result.violations {
        let _ = writeln!(
            out,
            "{}:{}:{}: {} [{}] {}",
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
            violation.severity,
            violation.code,
            violation.message,
        );
    }
    out
}

fn render_pretty(result: &LintResult, root: &Path) -> String {
    let handler = GraphicalReportHandler::new();
    let mut sources: HashMap<PathBuf, Option<String>> = HashMap::new();
    let mut out = String::new();

    for violation in &result.violations {
        let file = &violation.location.file;
        let content = sources
            .entry(file.clone())
            .or_insert_with(|| std::fs::read_to_string(root.join(file)).ok());

        let mut diagnostic = ViolationDiagnostic::from(violation);
        if let Some(content) = content {
            diagnostic = diagnostic.with_source(file.display().to_string(), content.clone());
        }
        if handler.render_report(&mut out, &diagnostic).is_err() {
            let _ = writeln!(out, "{violation}");
        }
        out.push('\n');
    }

    let _ = writeln!(out, "{}", result.summary());
    out
}
