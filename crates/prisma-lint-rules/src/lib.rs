//! # prisma-lint-rules
//!
//! Built-in lint rules for Prisma data-access conventions.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | PL001 | `create-no-deleted-at` | Forbids the soft-delete field in create payloads |
//! | PL002 | `update-naming-convention` | Matches update function names to the payload shape |
//! | PL003 | `delete-naming-convention` | Requires `hardDelete*` names around physical deletes |
//! | PL004 | `find-naming-convention` | Requires read prefixes around `find*` calls |
//! | PL005 | `repository-access-restriction` | Keeps Prisma calls inside the repository layer |
//!
//! ## Usage
//!
//! ```ignore
//! use prisma_lint_core::Analyzer;
//! use prisma_lint_rules::{CreateNoDeletedAt, UpdateNamingConvention};
//! use prisma_lint_ts::TypeScriptParser;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .parser(TypeScriptParser::new())
//!     .rule(CreateNoDeletedAt::new())
//!     .rule(UpdateNamingConvention::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod create_no_deleted_at;
mod delete_naming_convention;
mod find_naming_convention;
mod presets;
mod repository_access_restriction;
mod update_naming_convention;

#[cfg(test)]
mod test_support;

pub use create_no_deleted_at::CreateNoDeletedAt;
pub use delete_naming_convention::DeleteNamingConvention;
pub use find_naming_convention::FindNamingConvention;
pub use presets::{
    all_rules, minimal_rules, recommended_rules, rules_from_config, strict_rules, Preset,
};
pub use repository_access_restriction::RepositoryAccessRestriction;
pub use update_naming_convention::{Shape, UpdateNamingConvention};

/// Re-export core types for convenience.
pub use prisma_lint_core::{Rule, Severity, Violation};
