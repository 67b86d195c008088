//! Rule restricting Prisma client access to the repository layer.
//!
//! # Rationale
//!
//! Controllers, facades and domain services go through repositories and
//! query/command services. Direct `prisma.<model>.<op>()` calls elsewhere
//! bypass the soft-delete and naming conventions the other rules enforce.
//!
//! # Configuration
//!
//! - `allowed_files`: globs of files that may use the client
//! - `allowed_classes`: class name suffixes that may use the client
//!   (default: `["Repository", "QueryService", "CommandService"]`)
//! - `allow_in_tests`: skip test files (default: true)

use glob::Pattern;
use prisma_lint_core::ast::Program;
use prisma_lint_core::utils::collect_prisma_calls;
use prisma_lint_core::{
    message_data, Config, FileContext, MessageTemplate, OptionKind, Rule, RuleOption, RuleType,
    Severity, Suggestion, Violation,
};
use tracing::warn;

/// Rule code for repository-access-restriction.
pub const CODE: &str = "PL005";

/// Rule name for repository-access-restriction.
pub const NAME: &str = "repository-access-restriction";

const DEFAULT_ALLOWED_FILES: &[&str] = &[
    "**/*.repository.ts",
    "**/*.repository.js",
    "**/repositories/**",
    "**/*.query.service.ts",
    "**/*.command.service.ts",
    "**/prisma/**",
];

const DEFAULT_ALLOWED_CLASSES: &[&str] = &["Repository", "QueryService", "CommandService"];

const MESSAGES: &[MessageTemplate] = &[MessageTemplate::new(
    "repositoryAccessRestricted",
    "Direct Prisma access `{{target}}()` outside the repository layer",
)];

const OPTIONS: &[RuleOption] = &[
    RuleOption {
        name: "allowed_files",
        kind: OptionKind::StringArray,
        default: "[\"**/*.repository.ts\", \"**/*.repository.js\", \"**/repositories/**\", \"**/*.query.service.ts\", \"**/*.command.service.ts\", \"**/prisma/**\"]",
        description: "Globs of files allowed to call the Prisma client",
    },
    RuleOption {
        name: "allowed_classes",
        kind: OptionKind::StringArray,
        default: "[\"Repository\", \"QueryService\", \"CommandService\"]",
        description: "Class name suffixes allowed to call the Prisma client",
    },
    RuleOption {
        name: "allow_in_tests",
        kind: OptionKind::Bool,
        default: "true",
        description: "Skip test files",
    },
];

/// Forbids Prisma client calls outside repositories and query/command services.
#[derive(Debug, Clone)]
pub struct RepositoryAccessRestriction {
    /// Receiver names treated as Prisma clients.
    pub clients: Vec<String>,
    /// Globs of files that may use the client.
    pub allowed_files: Vec<Pattern>,
    /// Class name suffixes that may use the client.
    pub allowed_classes: Vec<String>,
    /// Skip test files.
    pub allow_in_tests: bool,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for RepositoryAccessRestriction {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryAccessRestriction {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    /// Creates the rule from project conventions and `[rules.repository-access-restriction]`.
    ///
    /// Invalid globs are logged and ignored.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let rule = config.rule(NAME);
        let allowed_files = rule
            .and_then(|r| r.get_str_array("allowed_files"))
            .unwrap_or_else(|| to_strings(DEFAULT_ALLOWED_FILES));
        let allowed_classes = rule
            .and_then(|r| r.get_str_array("allowed_classes"))
            .unwrap_or_else(|| to_strings(DEFAULT_ALLOWED_CLASSES));
        let allow_in_tests = rule.map_or(true, |r| r.get_bool("allow_in_tests", true));

        Self {
            clients: config.conventions.clients.clone(),
            allowed_files: compile_patterns(&allowed_files),
            allowed_classes,
            allow_in_tests,
            severity: Severity::Warning,
        }
    }

    /// Replaces the allowed file globs.
    #[must_use]
    pub fn allowed_files<I, S>(mut self, globs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let globs: Vec<String> = globs.into_iter().map(|g| g.as_ref().to_string()).collect();
        self.allowed_files = compile_patterns(&globs);
        self
    }

    /// Sets whether to skip test files.
    #[must_use]
    pub fn allow_in_tests(mut self, allow: bool) -> Self {
        self.allow_in_tests = allow;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn is_allowed_file(&self, relative: &str) -> bool {
        self.allowed_files.iter().any(|pattern| {
            pattern.matches(relative)
                || pattern
                    .as_str()
                    .strip_prefix("**/")
                    .and_then(|rest| Pattern::new(rest).ok())
                    .is_some_and(|root_pattern| root_pattern.matches(relative))
        })
    }

    fn is_allowed_class(&self, class: &str) -> bool {
        self.allowed_classes
            .iter()
            .any(|suffix| class.ends_with(suffix.as_str()))
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn compile_patterns(globs: &[String]) -> Vec<Pattern> {
    globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("Ignoring invalid allowed_files glob {glob:?}: {e}");
                None
            }
        })
        .collect()
}

impl Rule for RepositoryAccessRestriction {
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
        "Restricts Prisma client calls to repositories and query/command services"
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
        if self.allow_in_tests && ctx.is_test {
            return Vec::new();
        }
        if self.is_allowed_file(&ctx.relative_path_str()) {
            return Vec::new();
        }

        collect_prisma_calls(program, &self.clients)
            .into_iter()
            .filter(|site| !site.class.is_some_and(|class| self.is_allowed_class(class)))
            .map(|site| {
                let call = site.call;
                let target = call.target();
                let data = message_data([
                    ("target", target.as_str()),
                    ("model", call.model_name()),
                    ("operation", call.operation.as_str()),
                ]);
                self.report(ctx, call.span(), "repositoryAccessRestricted", data)
                    .with_suggestion(Suggestion::new(
                        "Move this query into a *Repository, *QueryService or *CommandService",
                    ))
            })
            .collect()
    }
}
