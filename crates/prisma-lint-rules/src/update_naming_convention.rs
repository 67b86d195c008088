//! Rule matching update function names to the shape of their payload.
//!
//! # Rationale
//!
//! Soft delete, restore and suspend are all `update` calls at the Prisma
//! level. Naming the surrounding function after what the payload actually
//! does (`deleteUser`, `restoreUser`, `suspendUser`, `updateUser`) keeps
//! lifecycle transitions greppable and stops plain updates from quietly
//! toggling lifecycle fields.
//!
//! # Payload shapes
//!
//! | Payload                      | Shape         | Expected prefix |
//! |------------------------------|---------------|-----------------|
//! | `deletedAt: <value>`         | `soft-delete` | `delete`        |
//! | `deletedAt: null`            | `restore`     | `restore`       |
//! | `suspendedAt: <value>`       | `suspend`     | `suspend`       |
//! | anything else                | `field`       | `update`        |
//!
//! The function's own category is the first of the four prefixes its name
//! has. A mismatch is reported first, then the companion check for the
//! function's category (e.g. a `restore*` function must write
//! `deletedAt: null`).
//!
//! Calls outside a named function and payloads that are not object or array
//! literals are skipped.
//!
//! # Configuration
//!
//! - `delete_prefix`, `restore_prefix`, `suspend_prefix`, `update_prefix`

use prisma_lint_core::ast::{Program, Span};
use prisma_lint_core::utils::{
    collect_prisma_calls, has_prefix, write_payload, FieldState, OperationKind, Payload,
    PrismaCallSite,
};
use prisma_lint_core::{
    message_data, Config, FileContext, Label, MessageTemplate, OptionKind, Rule, RuleOption,
    Severity, Violation,
};

/// Rule code for update-naming-convention.
pub const CODE: &str = "PL002";

/// Rule name for update-naming-convention.
pub const NAME: &str = "update-naming-convention";

const MESSAGES: &[MessageTemplate] = &[
    MessageTemplate::new(
        "namingMismatch",
        "`{{functionName}}` performs a {{shape}} update on `{{model}}.{{operation}}()`; its name should start with `{{expectedPrefix}}`",
    ),
    MessageTemplate::new(
        "updateShouldNotHaveDeletedAt",
        "Update function `{{functionName}}` must not write `{{field}}`; soft delete and restore have their own functions",
    ),
    MessageTemplate::new(
        "updateShouldNotHaveSuspendedAt",
        "Update function `{{functionName}}` must not set `{{field}}`; suspension has its own function",
    ),
    MessageTemplate::new(
        "deleteShouldHaveDeletedAt",
        "Delete function `{{functionName}}` must set `{{field}}` in `{{model}}.{{operation}}()`",
    ),
    MessageTemplate::new(
        "restoreShouldHaveDeletedAtNull",
        "Restore function `{{functionName}}` must set `{{field}}: null` in `{{model}}.{{operation}}()`",
    ),
    MessageTemplate::new(
        "suspendShouldHaveSuspendedAt",
        "Suspend function `{{functionName}}` must set `{{field}}` in `{{model}}.{{operation}}()`",
    ),
];

const OPTIONS: &[RuleOption] = &[
    RuleOption {
        name: "delete_prefix",
        kind: OptionKind::String,
        default: "\"delete\"",
        description: "Prefix of functions that soft-delete records",
    },
    RuleOption {
        name: "restore_prefix",
        kind: OptionKind::String,
        default: "\"restore\"",
        description: "Prefix of functions that restore soft-deleted records",
    },
    RuleOption {
        name: "suspend_prefix",
        kind: OptionKind::String,
        default: "\"suspend\"",
        description: "Prefix of functions that suspend records",
    },
    RuleOption {
        name: "update_prefix",
        kind: OptionKind::String,
        default: "\"update\"",
        description: "Prefix of functions that update ordinary fields",
    },
];

/// What an update payload does to the record lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Sets the soft-delete field.
    SoftDelete,
    /// Clears the soft-delete field to `null`.
    Restore,
    /// Sets the suspend field.
    Suspend,
    /// Touches neither lifecycle field.
    Field,
}

impl Shape {
    /// Classifies a payload by its soft-delete and suspend field states.
    #[must_use]
    pub fn classify(deleted: FieldState, suspended: FieldState) -> Self {
        match (deleted, suspended) {
            (FieldState::Set, _) => Self::SoftDelete,
            (FieldState::Null, _) => Self::Restore,
            (FieldState::Absent, FieldState::Set) => Self::Suspend,
            (FieldState::Absent, _) => Self::Field,
        }
    }

    /// Name used in diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SoftDelete => "soft-delete",
            Self::Restore => "restore",
            Self::Suspend => "suspend",
            Self::Field => "field",
        }
    }

    fn category(self) -> Category {
        match self {
            Self::SoftDelete => Category::Delete,
            Self::Restore => Category::Restore,
            Self::Suspend => Category::Suspend,
            Self::Field => Category::Update,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Delete,
    Restore,
    Suspend,
    Update,
}

const CATEGORIES: [Category; 4] = [
    Category::Delete,
    Category::Restore,
    Category::Suspend,
    Category::Update,
];

/// Checks that update functions are named after their payload shape.
#[derive(Debug, Clone)]
pub struct UpdateNamingConvention {
    /// Receiver names treated as Prisma clients.
    pub clients: Vec<String>,
    /// Soft-delete field name.
    pub soft_delete_field: String,
    /// Suspend field name.
    pub suspend_field: String,
    /// Prefix of soft-delete functions.
    pub delete_prefix: String,
    /// Prefix of restore functions.
    pub restore_prefix: String,
    /// Prefix of suspend functions.
    pub suspend_prefix: String,
    /// Prefix of plain update functions.
    pub update_prefix: String,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for UpdateNamingConvention {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateNamingConvention {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    /// Creates the rule from project conventions and `[rules.update-naming-convention]`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let rule = config.rule(NAME);
        let prefix = |key: &str, default: &str| {
            rule.and_then(|r| r.get_str(key))
                .unwrap_or(default)
                .to_string()
        };

        Self {
            clients: config.conventions.clients.clone(),
            soft_delete_field: config.conventions.soft_delete_field.clone(),
            suspend_field: config.conventions.suspend_field.clone(),
            delete_prefix: prefix("delete_prefix", "delete"),
            restore_prefix: prefix("restore_prefix", "restore"),
            suspend_prefix: prefix("suspend_prefix", "suspend"),
            update_prefix: prefix("update_prefix", "update"),
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn prefix(&self, category: Category) -> &str {
        match category {
            Category::Delete => &self.delete_prefix,
            Category::Restore => &self.restore_prefix,
            Category::Suspend => &self.suspend_prefix,
            Category::Update => &self.update_prefix,
        }
    }

    fn category_of(&self, function: &str) -> Option<Category> {
        CATEGORIES
            .into_iter()
            .find(|category| has_prefix(function, self.prefix(*category)))
    }

    fn check_site(
        &self,
        ctx: &FileContext,
        site: &PrismaCallSite<'_>,
        violations: &mut Vec<Violation>,
    ) {
        let call = site.call;
        if call.operation.kind() != OperationKind::Update {
            return;
        }
        let Some(function) = site.function else {
            return;
        };
        let Some(payload) = write_payload(call.call, "data") else {
            return;
        };

        let deleted = payload.field_state(&self.soft_delete_field);
        let suspended = payload.field_state(&self.suspend_field);
        let shape = Shape::classify(deleted, suspended);
        let expected = shape.category();
        let actual = self.category_of(function);

        let model = call.model_name();
        let operation = call.operation.as_str();

        if actual != Some(expected) {
            let data = message_data([
                ("functionName", function),
                ("expectedPrefix", self.prefix(expected)),
                ("shape", shape.as_str()),
                ("model", model),
                ("operation", operation),
            ]);
            let mut violation = self.report(ctx, call.span(), "namingMismatch", data);
            let deciding_field = match shape {
                Shape::SoftDelete | Shape::Restore => Some(&self.soft_delete_field),
                Shape::Suspend => Some(&self.suspend_field),
                Shape::Field => None,
            };
            if let Some(field) = deciding_field {
                if let Some(span) = payload.field_span(field) {
                    violation = violation.with_label(Label::new(
                        ctx.location(span),
                        format!("`{field}` makes this a {} update", shape.as_str()),
                    ));
                }
            }
            violations.push(violation);
        }

        let Some(actual) = actual else {
            return;
        };

        let mut companions = Vec::with_capacity(2);
        match actual {
            Category::Delete if deleted != FieldState::Set => {
                companions.push(("deleteShouldHaveDeletedAt", &self.soft_delete_field));
            }
            Category::Restore if deleted != FieldState::Null => {
                companions.push(("restoreShouldHaveDeletedAtNull", &self.soft_delete_field));
            }
            Category::Suspend if suspended != FieldState::Set => {
                companions.push(("suspendShouldHaveSuspendedAt", &self.suspend_field));
            }
            Category::Update => {
                if deleted.is_present() {
                    companions.push(("updateShouldNotHaveDeletedAt", &self.soft_delete_field));
                }
                if suspended == FieldState::Set {
                    companions.push(("updateShouldNotHaveSuspendedAt", &self.suspend_field));
                }
            }
            _ => {}
        }

        for (message_id, field) in companions {
            let data = message_data([
                ("functionName", function),
                ("field", field.as_str()),
                ("model", model),
                ("operation", operation),
            ]);
            let span = companion_span(&payload, field);
            violations.push(self.report(ctx, span, message_id, data));
        }
    }
}

/// The offending property when there is one, else the whole payload.
fn companion_span(payload: &Payload<'_>, field: &str) -> Span {
    payload.field_span(field).unwrap_or_else(|| payload.span())
}

impl Rule for UpdateNamingConvention {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires update function names to match the payload shape (delete/restore/suspend/update)"
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
        let mut violations = Vec::new();
        for site in collect_prisma_calls(program, &self.clients) {
            self.check_site(ctx, &site, &mut violations);
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{check_source, ids};

    fn check_code(code: &str) -> Vec<Violation> {
        check_source(&UpdateNamingConvention::new(), "src/users/user.repository.ts", code)
    }

    fn in_method(name: &str, data: &str) -> String {
        format!(
            "class UserRepository {{\n  async {name}(id: string) {{\n    return this.prisma.user.update({{ where: {{ id }}, data: {data} }});\n  }}\n}}\n"
        )
    }

    #[test]
    fn test_classifies_shapes() {
        use FieldState::{Absent, Null, Set};
        assert_eq!(Shape::classify(Set, Set), Shape::SoftDelete);
        assert_eq!(Shape::classify(Null, Set), Shape::Restore);
        assert_eq!(Shape::classify(Absent, Set), Shape::Suspend);
        assert_eq!(Shape::classify(Absent, Null), Shape::Field);
        assert_eq!(Shape::classify(Absent, Absent), Shape::Field);
    }

    #[test]
    fn test_matching_names_are_silent() {
        for (name, data) in [
            ("deleteUser", "{ deletedAt: new Date() }"),
            ("restoreUser", "{ deletedAt: null }"),
            ("suspendUser", "{ suspendedAt: new Date() }"),
            ("updateUser", "{ name: 'x', suspendedAt: null }"),
            ("_updateProfile", "{ email }"),
        ] {
            let violations = check_code(&in_method(name, data));
            assert!(violations.is_empty(), "{name}: {violations:?}");
        }
    }

    #[test]
    fn test_update_setting_deleted_at() {
        let violations = check_code(&in_method("updateUser", "{ deletedAt: new Date() }"));
        assert_eq!(
            ids(&violations),
            vec!["namingMismatch", "updateShouldNotHaveDeletedAt"]
        );
        assert_eq!(
            violations[0].data.get("expectedPrefix").map(String::as_str),
            Some("delete")
        );
        assert_eq!(
            violations[0].message,
            "`updateUser` performs a soft-delete update on `user.update()`; its name should start with `delete`"
        );
        assert_eq!(violations[0].labels.len(), 1);
        assert_eq!(
            violations[0].labels[0].message,
            "`deletedAt` makes this a soft-delete update"
        );
        assert_eq!(violations[0].labels[0].location.line, 3);
    }

    #[test]
    fn test_update_touching_both_lifecycle_fields() {
        let violations = check_code(&in_method(
            "updateUser",
            "{ deletedAt: null, suspendedAt: new Date() }",
        ));
        assert_eq!(
            ids(&violations),
            vec![
                "namingMismatch",
                "updateShouldNotHaveDeletedAt",
                "updateShouldNotHaveSuspendedAt"
            ]
        );
        assert_eq!(violations[1].location.line, 3);
        assert_eq!(
            violations[2].data.get("field").map(String::as_str),
            Some("suspendedAt")
        );
    }

    #[test]
    fn test_update_clearing_deleted_at() {
        let violations = check_code(&in_method("updateUser", "{ deletedAt: null }"));
        assert_eq!(
            ids(&violations),
            vec!["namingMismatch", "updateShouldNotHaveDeletedAt"]
        );
        assert_eq!(
            violations[0].data.get("expectedPrefix").map(String::as_str),
            Some("restore")
        );
    }

    #[test]
    fn test_update_setting_suspended_at() {
        let violations = check_code(&in_method("updateUser", "{ suspendedAt: new Date() }"));
        assert_eq!(
            ids(&violations),
            vec!["namingMismatch", "updateShouldNotHaveSuspendedAt"]
        );
    }

    #[test]
    fn test_suspend_without_suspended_at() {
        let violations = check_code(&in_method("suspendUser", "{ status: 'SUSPENDED' }"));
        assert_eq!(
            ids(&violations),
            vec!["namingMismatch", "suspendShouldHaveSuspendedAt"]
        );
        assert_eq!(
            violations[0].data.get("expectedPrefix").map(String::as_str),
            Some("update")
        );
        assert_eq!(violations[0].data.get("shape").map(String::as_str), Some("field"));
    }

    #[test]
    fn test_restore_user_with_plain_status() {
        let violations = check_code(&in_method("restoreUser", "{ status: 'active' }"));
        assert_eq!(
            ids(&violations),
            vec!["namingMismatch", "restoreShouldHaveDeletedAtNull"]
        );
        assert_eq!(
            violations[0].data.get("expectedPrefix").map(String::as_str),
            Some("update")
        );
        assert_eq!(
            violations[1].data.get("functionName").map(String::as_str),
            Some("restoreUser")
        );
    }

    #[test]
    fn test_delete_function_restoring() {
        let violations = check_code(&in_method("deleteUser", "{ deletedAt: null }"));
        assert_eq!(
            ids(&violations),
            vec!["namingMismatch", "deleteShouldHaveDeletedAt"]
        );
    }

    #[test]
    fn test_unprefixed_function_only_mismatches() {
        let violations = check_code(&in_method("markInactive", "{ status: 'inactive' }"));
        assert_eq!(ids(&violations), vec!["namingMismatch"]);
    }

    #[test]
    fn test_bulk_and_update_many() {
        let violations = check_code(
            "async function updateUsers() {\n  await tx.user.updateMany({ where: {}, data: { deletedAt: new Date() } });\n}\n",
        );
        assert_eq!(
            ids(&violations),
            vec!["namingMismatch", "updateShouldNotHaveDeletedAt"]
        );
        assert_eq!(
            violations[0].data.get("operation").map(String::as_str),
            Some("updateMany")
        );
    }

    #[test]
    fn test_skips_opaque_payloads_and_anonymous_scopes() {
        let violations = check_code(
            r"
async function updateUser(id: string, dto: UpdateUserDto) {
  await prisma.user.update({ where: { id }, data: dto });
}
prisma.user.update({ where: { id: 1 }, data: { deletedAt: new Date() } });
items.forEach(async (id) => prisma.user.update({ where: { id }, data: { deletedAt: null } }));
",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_arrow_bound_to_const_is_named() {
        let violations = check_code(
            "export const updateUser = async (id: string) =>\n  prisma.user.update({ where: { id }, data: { deletedAt: new Date() } });\n",
        );
        assert_eq!(violations.len(), 2);
        assert_eq!(
            violations[0].data.get("functionName").map(String::as_str),
            Some("updateUser")
        );
    }

    #[test]
    fn test_custom_prefixes() {
        let config = Config::parse("[rules.update-naming-convention]\ndelete_prefix = \"softDelete\"\n").unwrap();
        let rule = UpdateNamingConvention::from_config(&config);
        let code = in_method("softDeleteUser", "{ deletedAt: new Date() }");
        assert!(check_source(&rule, "a.ts", &code).is_empty());

        let code = in_method("deleteUser", "{ deletedAt: new Date() }");
        assert_eq!(ids(&check_source(&rule, "a.ts", &code)), vec!["namingMismatch"]);
    }

    #[test]
    fn test_idempotent() {
        let rule = UpdateNamingConvention::new();
        let code = in_method("restoreUser", "{ status: 'active' }");
        let first = check_source(&rule, "a.ts", &code);
        let second = check_source(&rule, "a.ts", &code);
        assert_eq!(first, second);
    }
}
