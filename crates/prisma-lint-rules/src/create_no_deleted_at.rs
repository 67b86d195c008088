//! Rule to forbid writing the soft-delete field when creating records.
//!
//! # Rationale
//!
//! A record is soft-deleted by setting `deletedAt` through an update. A
//! record that is created already deleted (or with an explicit
//! `deletedAt: null`) hides that lifecycle step and usually means a DTO was
//! spread into the payload without filtering.
//!
//! # Checked calls
//!
//! - `create`, `createMany`, `createManyAndReturn`: the `data` payload,
//!   including every object of a bulk array
//! - `upsert`: the `create` payload
//!
//! One violation is reported per call, no matter how many bulk rows set the
//! field.
//!
//! # Configuration
//!
//! - `field`: overrides `[conventions] soft_delete_field` for this rule

use prisma_lint_core::ast::Program;
use prisma_lint_core::utils::{collect_prisma_calls, write_payload, OperationKind};
use prisma_lint_core::{
    message_data, Config, FileContext, MessageTemplate, OptionKind, Rule, RuleOption, Severity,
    Suggestion, Violation,
};

/// Rule code for create-no-deleted-at.
pub const CODE: &str = "PL001";

/// Rule name for create-no-deleted-at.
pub const NAME: &str = "create-no-deleted-at";

const MESSAGES: &[MessageTemplate] = &[MessageTemplate::new(
    "createShouldNotHaveDeletedAt",
    "Do not set `{{field}}` when calling `{{model}}.{{operation}}()`",
)];

const OPTIONS: &[RuleOption] = &[RuleOption {
    name: "field",
    kind: OptionKind::String,
    default: "\"deletedAt\"",
    description: "Soft-delete field that must not appear in create payloads",
}];

/// Forbids the soft-delete field in create and upsert-create payloads.
#[derive(Debug, Clone)]
pub struct CreateNoDeletedAt {
    /// Receiver names treated as Prisma clients.
    pub clients: Vec<String>,
    /// Soft-delete field name.
    pub field: String,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for CreateNoDeletedAt {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateNoDeletedAt {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    /// Creates the rule from project conventions and `[rules.create-no-deleted-at]`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let field = config
            .rule(NAME)
            .and_then(|rule| rule.get_str("field"))
            .map_or_else(|| config.conventions.soft_delete_field.clone(), String::from);

        Self {
            clients: config.conventions.clients.clone(),
            field,
            severity: Severity::Error,
        }
    }

    /// Sets the soft-delete field name.
    #[must_use]
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for CreateNoDeletedAt {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids setting the soft-delete field in create payloads"
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
        collect_prisma_calls(program, &self.clients)
            .into_iter()
            .filter_map(|site| {
                let call = site.call;
                let key = match call.operation.kind() {
                    OperationKind::Create => "data",
                    OperationKind::Upsert => "create",
                    _ => return None,
                };
                let span = write_payload(call.call, key)?.field_span(&self.field)?;

                let data = message_data([
                    ("model", call.model_name()),
                    ("operation", call.operation.as_str()),
                    ("field", self.field.as_str()),
                ]);
                Some(
                    self.report(ctx, span, "createShouldNotHaveDeletedAt", data)
                        .with_suggestion(Suggestion::new(format!(
                            "Remove `{}` from the payload; records are created active",
                            self.field
                        ))),
                )
            })
            .collect()
    }
}
