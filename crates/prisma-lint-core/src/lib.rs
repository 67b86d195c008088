//! # prisma-lint-core
//!
//! Core framework for linting Prisma data-access conventions in
//! TypeScript and JavaScript sources.
//!
//! This crate provides the foundational traits and types for building
//! the linter. It includes:
//!
//! - [`ast`]: a language-neutral syntax tree with a [`ast::visit::Visit`] walker
//! - [`SourceParser`] trait implemented by language front ends
//! - [`Rule`] trait for per-file rules with ESLint-style message templates
//! - [`Analyzer`] for orchestrating lint execution
//! - [`Violation`] for representing lint findings
//! - [`utils`] for recognising Prisma calls and inspecting their payloads
//!
//! ## Example
//!
//! ```ignore
//! use prisma_lint_core::Analyzer;
//! use prisma_lint_ts::TypeScriptParser;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .parser(TypeScriptParser::new())
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! println!("{}", result.summary());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod ast;

mod analyzer;
mod config;
mod context;
mod parser;
mod rule;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, Conventions, RuleConfig};
pub use context::FileContext;
pub use parser::{ParseError, ParserBox, SourceParser};
pub use rule::{message_data, MessageTemplate, OptionKind, Rule, RuleBox, RuleOption, RuleType};
pub use types::{
    Label, LintResult, Location, MessageData, Severity, Suggestion, Violation,
    ViolationDiagnostic,
};
pub use utils::allowance::AllowCheck;
