//! # prisma-lint-ts
//!
//! Tree-sitter based TypeScript/JavaScript front end for prisma-lint.
//!
//! [`TypeScriptParser`] implements `prisma_lint_core::SourceParser` and
//! lowers `.ts`, `.tsx`, `.mts`, `.cts`, `.js`, `.jsx`, `.mjs` and `.cjs`
//! sources into the core syntax tree. Anonymous functions assigned to a
//! binding, object key or class field take that name, the way JavaScript
//! infers `Function.prototype.name`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod typescript;

pub use typescript::TypeScriptParser;
