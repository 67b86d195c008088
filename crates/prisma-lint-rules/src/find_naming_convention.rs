//! Rule requiring read prefixes on functions that query with `find*`.
//!
//! # Configuration
//!
//! - `prefixes`: accepted read prefixes
//!   (default: `["find", "get", "list", "count", "exists", "search"]`)
//! - `allow_in_write_functions`: let write functions (`create*`, `update*`,
//!   `upsert*`, `delete*`, `hardDelete*`, `restore*`, `suspend*`) read
//!   (default: true)

use prisma_lint_core::ast::Program;
use prisma_lint_core::utils::{collect_prisma_calls, has_any_prefix, OperationKind};
use prisma_lint_core::{
    message_data, Config, FileContext, MessageTemplate, OptionKind, Rule, RuleOption, RuleType,
    Severity, Violation,
};

/// Rule code for find-naming-convention.
pub const CODE: &str = "PL004";

/// Rule name for find-naming-convention.
pub const NAME: &str = "find-naming-convention";

const DEFAULT_PREFIXES: &[&str] = &["find", "get", "list", "count", "exists", "search"];

const WRITE_PREFIXES: &[&str] = &[
    "create",
    "update",
    "upsert",
    "delete",
    "hardDelete",
    "restore",
    "suspend",
];

const MESSAGES: &[MessageTemplate] = &[MessageTemplate::new(
    "findNamingMismatch",
    "`{{functionName}}` reads with `{{model}}.{{operation}}()`; its name should start with `{{expectedPrefix}}` (allowed: {{allowedPrefixes}})",
)];

const OPTIONS: &[RuleOption] = &[
    RuleOption {
        name: "prefixes",
        kind: OptionKind::StringArray,
        default: "[\"find\", \"get\", \"list\", \"count\", \"exists\", \"search\"]",
        description: "Function name prefixes allowed to call find operations",
    },
    RuleOption {
        name: "allow_in_write_functions",
        kind: OptionKind::Bool,
        default: "true",
        description: "Allow reads inside create/update/delete/restore/suspend functions",
    },
];

/// Requires `findUnique*`, `findFirst*` and `findMany` in read-named functions.
#[derive(Debug, Clone)]
pub struct FindNamingConvention {
    /// Receiver names treated as Prisma clients.
    pub clients: Vec<String>,
    /// Accepted read prefixes.
    pub prefixes: Vec<String>,
    /// Allow reads inside write functions.
    pub allow_in_write_functions: bool,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for FindNamingConvention {
    fn default() -> Self {
        Self::new()
    }
}

impl FindNamingConvention {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    /// Creates the rule from project conventions and `[rules.find-naming-convention]`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let rule = config.rule(NAME);
        let prefixes = rule
            .and_then(|r| r.get_str_array("prefixes"))
            .unwrap_or_else(|| DEFAULT_PREFIXES.iter().map(|p| (*p).to_string()).collect());
        let allow_in_write_functions =
            rule.map_or(true, |r| r.get_bool("allow_in_write_functions", true));

        Self {
            clients: config.conventions.clients.clone(),
            prefixes,
            allow_in_write_functions,
            severity: Severity::Warning,
        }
    }

    /// Sets whether write functions may read.
    #[must_use]
    pub fn allow_in_write_functions(mut self, allow: bool) -> Self {
        self.allow_in_write_functions = allow;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn is_allowed(&self, function: &str) -> bool {
        has_any_prefix(function, &self.prefixes).is_some()
            || (self.allow_in_write_functions && has_any_prefix(function, WRITE_PREFIXES).is_some())
    }
}

impl Rule for FindNamingConvention {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn rule_type(&self) -> RuleType {
        RuleType::Suggestion
    }

    fn description(&self) -> &'static str {
        "Requires functions calling find* operations to use a read prefix"
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
        let expected = self.prefixes.first().map_or("find", String::as_str);
        let allowed = self.prefixes.join(", ");

        collect_prisma_calls(program, &self.clients)
            .into_iter()
            .filter(|site| site.call.operation.kind() == OperationKind::Find)
            .filter_map(|site| {
                let function = site.function?;
                if self.is_allowed(function) {
                    return None;
                }

                let call = site.call;
                let data = message_data([
                    ("functionName", function),
                    ("expectedPrefix", expected),
                    ("allowedPrefixes", allowed.as_str()),
                    ("model", call.model_name()),
                    ("operation", call.operation.as_str()),
                ]);
                Some(self.report(ctx, call.span(), "findNamingMismatch", data))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{check_source, ids};

    fn check_code(code: &str) -> Vec<Violation> {
        check_source(&FindNamingConvention::new(), "src/users/user.query.service.ts", code)
    }

    #[test]
    fn test_detects_unprefixed_reader() {
        let violations = check_code(
            r"
export class UserQueryService {
  async userById(id: string) {
    return this.prisma.user.findUnique({ where: { id } });
  }
}
",
        );
        assert_eq!(ids(&violations), vec!["findNamingMismatch"]);
        assert_eq!(violations[0].severity, Severity::Warning);
        assert_eq!(
            violations[0].message,
            "`userById` reads with `user.findUnique()`; its name should start with `find` (allowed: find, get, list, count, exists, search)"
        );
    }

    #[test]
    fn test_read_prefixes_are_allowed() {
        let violations = check_code(
            r"
async function findUser(id: string) { return prisma.user.findUniqueOrThrow({ where: { id } }); }
async function getUser(id: string) { return prisma.user.findFirst({ where: { id } }); }
async function listUsers() { return prisma.user.findMany(); }
async function existsUser(email: string) { return !!(await prisma.user.findFirstOrThrow({ where: { email } })); }
async function searchUsers(q: string) { return prisma.user.findMany({ where: { name: { contains: q } } }); }
",
        );
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_write_functions_may_read_unless_disabled() {
        let code = r"
async function updateEmail(id: string, email: string) {
  const user = await prisma.user.findUniqueOrThrow({ where: { id } });
  return prisma.user.update({ where: { id: user.id }, data: { email } });
}
";
        assert!(check_code(code).is_empty());

        let strict = FindNamingConvention::new().allow_in_write_functions(false);
        let violations = check_source(&strict, "a.ts", code);
        assert_eq!(ids(&violations), vec!["findNamingMismatch"]);
    }

    #[test]
    fn test_only_find_operations_are_checked() {
        let violations = check_code(
            r"
async function userStats() {
  await prisma.user.count();
  await prisma.user.aggregate({ _count: true });
  await prisma.user.groupBy({ by: ['status'] });
}
",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_configured_prefixes() {
        let config = Config::parse(
            "[rules.find-naming-convention]\nprefixes = [\"fetch\"]\nallow_in_write_functions = false\n",
        )
        .unwrap();
        let rule = FindNamingConvention::from_config(&config);
        assert!(!rule.allow_in_write_functions);

        let code = "async function fetchUser() { return prisma.user.findFirst(); }\nasync function findUser() { return prisma.user.findFirst(); }";
        let violations = check_source(&rule, "a.ts", code);
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].data.get("functionName").map(String::as_str),
            Some("findUser")
        );
    }
}
