//! List rules command implementation.

use anyhow::Result;
use prisma_lint_core::{Config, MessageTemplate, Rule, RuleOption, RuleType, Severity};
use prisma_lint_rules::all_rules;
use serde::Serialize;

use crate::ListFormat;

/// Rule metadata as printed by `list-rules --format json`.
#[derive(Debug, Serialize)]
struct RuleInfo {
    code: &'static str,
    name: &'static str,
    #[serde(rename = "type")]
    rule_type: RuleType,
    severity: Severity,
    enabled: bool,
    description: &'static str,
    messages: &'static [MessageTemplate],
    options: &'static [RuleOption],
    #[serde(skip_serializing_if = "Option::is_none")]
    docs: Option<String>,
}

impl RuleInfo {
    fn new(rule: &dyn Rule, config: &Config) -> Self {
        Self {
            code: rule.code(),
            name: rule.name(),
            rule_type: rule.rule_type(),
            severity: config
                .rule_severity(rule.name())
                .unwrap_or_else(|| rule.default_severity()),
            enabled: config.is_rule_enabled(rule.name()),
            description: rule.description(),
            messages: rule.messages(),
            options: rule.options(),
            docs: rule.docs(),
        }
    }
}

fn collect(config: &Config) -> Vec<RuleInfo> {
    all_rules(config)
        .iter()
        .map(|rule| RuleInfo::new(rule.as_ref(), config))
        .collect()
}

/// Runs the list-rules command.
pub fn run(format: ListFormat, config: &Config) -> Result<()> {
    let rules = collect(config);

    match format {
        ListFormat::Json => println!("{}", serde_json::to_string_pretty(&rules)?),
        ListFormat::Text => print_table(&rules),
    }
    Ok(())
}

fn print_table(rules: &[RuleInfo]) {
    println!("Available rules:\n");
    println!(
        "{:<7} {:<30} {:<8} {:<11} Description",
        "Code", "Name", "Severity", "Type"
    );
    println!("{}", "-".repeat(100));

    for rule in rules {
        let name = if rule.enabled {
            rule.name.to_string()
        } else {
            format!("{} (off)", rule.name)
        };
        println!(
            "{:<7} {:<30} {:<8} {:<11} {}",
            rule.code,
            name,
            rule.severity.to_string(),
            rule.rule_type.to_string(),
            rule.description
        );
    }

    println!("\nPresets:");
    println!("  recommended  - PL001-PL005 at default severities (default)");
    println!("  strict       - PL001-PL005 as errors, test files included");
    println!("  minimal      - PL001, PL002 (for gradual adoption)");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  prisma-lint check --rules create-no-deleted-at,update-naming-convention");
    println!("  prisma-lint check --rules PL001,PL003");
}
