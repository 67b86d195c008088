//! Rule to require an explicit hard-delete name for physical deletes.
//!
//! # Rationale
//!
//! Records are soft-deleted through `update`. A Prisma `delete` or
//! `deleteMany` removes rows for good, so the enclosing function has to say
//! so (`hardDeleteUser`). A plain `deleteUser` that physically removes rows
//! is almost always a soft delete written the wrong way.
//!
//! # Configuration
//!
//! - `prefixes`: accepted hard-delete prefixes (default: `["hardDelete"]`)

use prisma_lint_core::ast::Program;
use prisma_lint_core::utils::{collect_prisma_calls, has_any_prefix, OperationKind};
use prisma_lint_core::{
    message_data, Config, FileContext, MessageTemplate, OptionKind, Rule, RuleOption, Severity,
    Suggestion, Violation,
};

/// Rule code for delete-naming-convention.
pub const CODE: &str = "PL003";

/// Rule name for delete-naming-convention.
pub const NAME: &str = "delete-naming-convention";

const MESSAGES: &[MessageTemplate] = &[MessageTemplate::new(
    "hardDeleteNamingMismatch",
    "`{{functionName}}` physically deletes rows with `{{model}}.{{operation}}()`; its name should start with `{{expectedPrefix}}`",
)];

const OPTIONS: &[RuleOption] = &[RuleOption {
    name: "prefixes",
    kind: OptionKind::StringArray,
    default: "[\"hardDelete\"]",
    description: "Function name prefixes allowed to call delete/deleteMany",
}];

/// Requires `delete`/`deleteMany` calls to live in hard-delete functions.
#[derive(Debug, Clone)]
pub struct DeleteNamingConvention {
    /// Receiver names treated as Prisma clients.
    pub clients: Vec<String>,
    /// Accepted hard-delete prefixes.
    pub prefixes: Vec<String>,
    /// Soft-delete field named in the suggestion.
    pub soft_delete_field: String,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for DeleteNamingConvention {
    fn default() -> Self {
        Self::new()
    }
}

impl DeleteNamingConvention {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    /// Creates the rule from project conventions and `[rules.delete-naming-convention]`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let prefixes = config
            .rule(NAME)
            .and_then(|rule| rule.get_str_array("prefixes"))
            .unwrap_or_else(|| vec!["hardDelete".to_string()]);

        Self {
            clients: config.conventions.clients.clone(),
            prefixes,
            soft_delete_field: config.conventions.soft_delete_field.clone(),
            severity: Severity::Error,
        }
    }

    /// Sets the accepted hard-delete prefixes.
    #[must_use]
    pub fn prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for DeleteNamingConvention {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires physical delete calls to live in hardDelete* functions"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn messages(&self) -> &'static [MessageTemplate] {
        MESSAGES
    }

    fn options(&self) -> &'static [RuleOption] {
        OPTIONS
    }

    fn check(&self, ctx: &FileContext, program: &Program) -> Vec<Violation> {
        let expected = self.prefixes.first().map_or("hardDelete", String::as_str);

        collect_prisma_calls(program, &self.clients)
            .into_iter()
            .filter(|site| site.call.operation.kind() == OperationKind::Delete)
            .filter_map(|site| {
                let function = site.function?;
                if has_any_prefix(function, &self.prefixes).is_some() {
                    return None;
                }

                let call = site.call;
                let data = message_data([
                    ("functionName", function),
                    ("expectedPrefix", expected),
                    ("model", call.model_name()),
                    ("operation", call.operation.as_str()),
                ]);
                Some(
                    self.report(ctx, call.span(), "hardDeleteNamingMismatch", data)
                        .with_suggestion(Suggestion::new(format!(
                            "Rename to `{expected}...`, or soft-delete with `{}.update({{ data: {{ {}: new Date() }} }})`",
                            call.model_name(),
                            self.soft_delete_field
                        ))),
                )
            })
            .collect()
    }
}
