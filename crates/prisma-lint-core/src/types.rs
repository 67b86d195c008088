//! Core types for lint violations and results.

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::ast::Span;

/// Named template parameters attached to a violation.
pub type MessageData = BTreeMap<String, String>;

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a location covering a syntax tree span.
    #[must_use]
    pub fn from_span(file: PathBuf, span: Span) -> Self {
        Self {
            file,
            line: span.line,
            column: span.column,
            offset: span.start,
            length: span.len(),
        }
    }

    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }
}

/// A labeled span for additional context in violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Location of the label.
    pub location: Location,
    /// Message for this label.
    pub message: String,
}

impl Label {
    /// Creates a new label.
    #[must_use]
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

/// A suggested fix for a violation, shown as help text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A lint violation found during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "PL001").
    pub code: String,
    /// Rule name (e.g., "create-no-deleted-at").
    pub rule: String,
    /// Message template id (e.g., "createShouldNotHaveDeletedAt").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Named parameters the message was rendered from.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: MessageData,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    pub suggestion: Option<Suggestion>,
    /// Additional labels for context.
    pub labels: Vec<Label>,
    /// Reference to rule documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_ref: Option<String>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            message_id: None,
            data: MessageData::new(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
            labels: Vec::new(),
            doc_ref: None,
        }
    }

    /// Records the message template id and parameters this violation was
    /// rendered from.
    #[must_use]
    pub fn with_message_id(mut self, message_id: impl Into<String>, data: MessageData) -> Self {
        self.message_id = Some(message_id.into());
        self.data = data;
        self
    }

    /// Adds a documentation reference to this violation.
    #[must_use]
    pub fn with_doc_ref(mut self, doc_ref: impl Into<String>) -> Self {
        self.doc_ref = Some(doc_ref.into());
        self
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Adds a label to this violation.
    #[must_use]
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Returns true if this violation was rendered from the given template.
    #[must_use]
    pub fn is(&self, message_id: &str) -> bool {
        self.message_id.as_deref() == Some(message_id)
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.message);
        }
        if let Some(doc_ref) = &self.doc_ref {
            let _ = writeln!(output, "  = see: {doc_ref}");
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )?;
        if let Some(id) = &self.message_id {
            write!(f, " ({id})")?;
        }
        Ok(())
    }
}

/// A violation paired with its source text, for rich rendering with miette.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
    #[label(collection)]
    related: Vec<LabeledSpan>,
    #[source_code]
    source_code: Option<NamedSource<String>>,
}

impl ViolationDiagnostic {
    /// Attaches the file contents the violation points into.
    #[must_use]
    pub fn with_source(mut self, name: impl AsRef<str>, source: String) -> Self {
        self.source_code = Some(NamedSource::new(name, source));
        self
    }
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            message: format!("[{}] {}", v.code, v.message),
            help: v.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((v.location.offset, v.location.length)),
            label_message: v
                .message_id
                .clone()
                .unwrap_or_else(|| v.rule.clone()),
            related: v
                .labels
                .iter()
                .map(|l| {
                    LabeledSpan::new(
                        Some(l.message.clone()),
                        l.location.offset,
                        l.location.length,
                    )
                })
                .collect(),
            source_code: None,
        }
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of files checked.
    pub files_checked: usize,
    /// Files skipped because they failed to parse.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files_skipped: Vec<PathBuf>,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Counts violations by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        self.violations
            .iter()
            .fold((0, 0, 0), |(e, w, i), v| match v.severity {
                Severity::Error => (e + 1, w, i),
                Severity::Warning => (e, w + 1, i),
                Severity::Info => (e, w, i + 1),
            })
    }

    /// Orders violations by file, then line, then column.
    pub fn sort(&mut self) {
        self.violations.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });
    }

    /// One-line summary of the counts.
    #[must_use]
    pub fn summary(&self) -> String {
        let (errors, warnings, infos) = self.count_by_severity();
        format!(
            "Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} file(s)",
            self.files_checked
        )
    }

    /// Adds violations from another result.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.files_checked += other.files_checked;
        self.files_skipped.extend(other.files_skipped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "PL001",
            "create-no-deleted-at",
            severity,
            Location::new(PathBuf::from("src/users/user.repository.ts"), 12, 5),
            "Do not set `deletedAt` when calling `user.create()`",
        )
    }

    #[test]
    fn from_span_carries_offset_and_length() {
        let location = Location::from_span(PathBuf::from("a.ts"), Span::new(10, 16, 2, 3));
        assert_eq!(location.line, 2);
        assert_eq!(location.column, 3);
        assert_eq!(location.offset, 10);
        assert_eq!(location.length, 6);
    }

    #[test]
    fn severity_parses_aliases() {
        assert_eq!("warn".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("ERROR".parse::<Severity>(), Ok(Severity::Error));
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn message_id_round_trips_through_builder() {
        let mut data = MessageData::new();
        data.insert("field".into(), "deletedAt".into());
        let v = make_violation(Severity::Error)
            .with_message_id("createShouldNotHaveDeletedAt", data);
        assert!(v.is("createShouldNotHaveDeletedAt"));
        assert_eq!(v.data.get("field").map(String::as_str), Some("deletedAt"));
    }

    #[test]
    fn display_is_compact_single_line() {
        let v = make_violation(Severity::Error)
            .with_message_id("createShouldNotHaveDeletedAt", MessageData::new());
        insta::assert_snapshot!(
            v.to_string(),
            @"src/users/user.repository.ts:12:5: error [PL001] Do not set `deletedAt` when calling `user.create()` (createShouldNotHaveDeletedAt)"
        );
    }

    #[test]
    fn format_includes_help_and_doc_ref() {
        let v = make_violation(Severity::Error)
            .with_suggestion(Suggestion::new("Drop the field from the payload"))
            .with_doc_ref("docs/rules/create-no-deleted-at.md");
        let formatted = v.format();
        assert!(formatted.contains("= help: Drop the field from the payload"));
        assert!(formatted.contains("= see: docs/rules/create-no-deleted-at.md"));
    }

    #[test]
    fn message_data_is_omitted_from_json_when_empty() {
        let json = serde_json::to_string(&make_violation(Severity::Warning)).unwrap();
        assert!(!json.contains("message_id"));
        assert!(!json.contains("\"data\""));
    }

    #[test]
    fn counts_by_severity() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Error));
        result.violations.push(make_violation(Severity::Warning));
        result.violations.push(make_violation(Severity::Warning));
        assert_eq!(result.count_by_severity(), (1, 2, 0));
        assert!(result.has_errors());
    }

    #[test]
    fn has_violations_at_threshold() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Warning));
        assert!(!result.has_violations_at(Severity::Error));
        assert!(result.has_violations_at(Severity::Warning));
    }

    #[test]
    fn sort_orders_by_file_then_position() {
        let mut result = LintResult::new();
        let mut late = make_violation(Severity::Error);
        late.location.line = 40;
        let mut other_file = make_violation(Severity::Error);
        other_file.location.file = PathBuf::from("src/a.ts");
        result.violations = vec![late, make_violation(Severity::Error), other_file];

        result.sort();

        let order: Vec<(String, usize)> = result
            .violations
            .iter()
            .map(|v| (v.location.file.display().to_string(), v.location.line))
            .collect();
        assert_eq!(
            order,
            vec![
                ("src/a.ts".to_string(), 12),
                ("src/users/user.repository.ts".to_string(), 12),
                ("src/users/user.repository.ts".to_string(), 40),
            ]
        );
    }

    #[test]
    fn diagnostic_carries_secondary_labels() {
        use miette::Diagnostic as _;

        let field = Location::from_span(PathBuf::from("a.ts"), Span::new(30, 39, 3, 7));
        let violation = make_violation(Severity::Error)
            .with_label(Label::new(field, "`deletedAt` set here"));
        let diagnostic = ViolationDiagnostic::from(&violation);

        let labels: Vec<_> = diagnostic.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 2);
        let extra = labels
            .iter()
            .find(|l| l.label() == Some("`deletedAt` set here"))
            .unwrap();
        assert_eq!((extra.offset(), extra.len()), (30, 9));
    }

    #[test]
    fn summary_line() {
        let mut result = LintResult::new();
        result.files_checked = 3;
        result.violations.push(make_violation(Severity::Error));
        insta::assert_snapshot!(
            result.summary(),
            @"Found 1 error(s), 0 warning(s), 0 info(s) in 3 file(s)"
        );
    }
}
