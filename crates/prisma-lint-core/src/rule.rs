//! Rule trait and the metadata a rule registers with the host.

use serde::Serialize;

use crate::ast::{Program, Span};
use crate::context::FileContext;
use crate::types::{MessageData, Severity, Violation};

/// What kind of problem a rule reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    /// Code that is wrong or will behave unexpectedly.
    Problem,
    /// Code that works but breaks a project convention.
    Suggestion,
    /// Formatting and layout.
    Layout,
}

impl std::fmt::Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Problem => write!(f, "problem"),
            Self::Suggestion => write!(f, "suggestion"),
            Self::Layout => write!(f, "layout"),
        }
    }
}

/// A diagnostic message template with `{{name}}` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MessageTemplate {
    /// Stable message id (e.g., `createShouldNotHaveDeletedAt`).
    pub id: &'static str,
    /// Template text.
    pub text: &'static str,
}

impl MessageTemplate {
    /// Creates a new template.
    #[must_use]
    pub const fn new(id: &'static str, text: &'static str) -> Self {
        Self { id, text }
    }

    /// Substitutes `{{ name }}` placeholders from `data`.
    ///
    /// Unknown placeholders are kept verbatim.
    #[must_use]
    pub fn render(&self, data: &MessageData) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text;

        while let Some(open) = rest.find("{{") {
            out.push_str(&rest[..open]);
            let after_open = &rest[open + 2..];
            let Some(close) = after_open.find("}}") else {
                out.push_str(&rest[open..]);
                return out;
            };
            let key = after_open[..close].trim();
            match data.get(key) {
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[open..open + 2 + close + 2]),
            }
            rest = &after_open[close + 2..];
        }

        out.push_str(rest);
        out
    }
}

/// Value type of a rule option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionKind {
    /// `true` / `false`
    Bool,
    /// A single string.
    String,
    /// An array of strings.
    StringArray,
}

/// One entry of a rule's configuration schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleOption {
    /// Option key under `[rules.<name>]`.
    pub name: &'static str,
    /// Value type.
    pub kind: OptionKind,
    /// Default value, rendered as TOML.
    pub default: &'static str,
    /// What the option controls.
    pub description: &'static str,
}

/// A per-file lint rule over the lowered syntax tree.
///
/// Rules are stateless: `check` must return the same violations every time
/// it is called with the same context and tree.
///
/// # Example
///
/// ```ignore
/// use prisma_lint_core::ast::{visit::Visit, Program};
/// use prisma_lint_core::{FileContext, MessageTemplate, Rule, Violation};
///
/// pub struct NoRawQueries;
///
/// impl Rule for NoRawQueries {
///     fn name(&self) -> &'static str { "no-raw-queries" }
///     fn code(&self) -> &'static str { "PL100" }
///     fn messages(&self) -> &'static [MessageTemplate] {
///         &[MessageTemplate::new("noRaw", "`{{operation}}` bypasses the query builder")]
///     }
///
///     fn check(&self, ctx: &FileContext, program: &Program) -> Vec<Violation> {
///         let mut visitor = RawVisitor::new(self, ctx);
///         visitor.visit_program(program);
///         visitor.violations
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "create-no-deleted-at").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "PL001").
    fn code(&self) -> &'static str;

    /// Returns what kind of problem this rule reports.
    fn rule_type(&self) -> RuleType {
        RuleType::Problem
    }

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns a documentation reference for this rule.
    fn docs(&self) -> Option<String> {
        Some(format!("docs/rules/{}.md", self.name()))
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this rule requires a reason when using allow directives.
    ///
    /// By default, rules with `Severity::Error` require a reason.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Returns the diagnostic message templates this rule can emit.
    fn messages(&self) -> &'static [MessageTemplate];

    /// Returns the configuration schema for `[rules.<name>]`.
    fn options(&self) -> &'static [RuleOption] {
        &[]
    }

    /// Looks up a message template by id.
    fn message(&self, id: &str) -> Option<&'static MessageTemplate> {
        self.messages().iter().find(|m| m.id == id)
    }

    /// Builds a violation from one of this rule's message templates.
    ///
    /// An unknown id is reported verbatim as the message text.
    fn report(
        &self,
        ctx: &FileContext,
        span: Span,
        message_id: &str,
        data: MessageData,
    ) -> Violation {
        let message = self
            .message(message_id)
            .map_or_else(|| message_id.to_string(), |m| m.render(&data));

        let violation = Violation::new(
            self.code(),
            self.name(),
            self.default_severity(),
            ctx.location(span),
            message,
        )
        .with_message_id(message_id, data);

        match self.docs() {
            Some(doc) => violation.with_doc_ref(doc),
            None => violation,
        }
    }

    /// Checks a single file and returns any violations found.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Context about the file being checked
    /// * `program` - The lowered syntax tree of the file
    fn check(&self, ctx: &FileContext, program: &Program) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Builds [`MessageData`] from `(name, value)` pairs.
#[must_use]
pub fn message_data<const N: usize>(pairs: [(&str, &str); N]) -> MessageData {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
