//! Context types for rule execution.

use std::path::{Path, PathBuf};

use crate::ast::Span;
use crate::types::Location;

/// File name suffixes that mark a JavaScript/TypeScript test file.
const TEST_SUFFIXES: &[&str] = &[".spec", ".test", ".e2e-spec", ".e2e"];

/// Directory names that only hold tests.
const TEST_DIRS: &[&str] = &["__tests__", "__mocks__", "test", "tests", "e2e"];

/// Context provided to per-file rules.
///
/// Contains metadata about the file being analyzed that rules can use
/// to make context-aware decisions (e.g., skip checks in test files).
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Whether this file is detected as a test file.
    pub is_test: bool,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);
        let is_test = Self::detect_test_file(&relative_path);

        Self {
            path,
            content,
            is_test,
            relative_path,
        }
    }

    /// Detects test files by directory and `*.spec.ts` / `*.test.ts` naming.
    fn detect_test_file(path: &Path) -> bool {
        let in_test_dir = path.parent().is_some_and(|parent| {
            parent.components().any(|component| {
                matches!(component, std::path::Component::Normal(s)
                    if TEST_DIRS.iter().any(|dir| s.to_string_lossy() == *dir))
            })
        });
        if in_test_dir {
            return true;
        }

        path.file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| TEST_SUFFIXES.iter().any(|suffix| stem.ends_with(suffix)))
    }

    /// Relative path with `/` separators, for glob matching and reports.
    #[must_use]
    pub fn relative_path_str(&self) -> String {
        self.relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Builds a report location for a node span in this file.
    #[must_use]
    pub fn location(&self, span: Span) -> Location {
        Location::from_span(self.relative_path.clone(), span)
    }

    /// Returns the source text covered by a span, or `""` if out of range.
    #[must_use]
    pub fn text(&self, span: Span) -> &'a str {
        self.content.get(span.start..span.end).unwrap_or("")
    }
}
