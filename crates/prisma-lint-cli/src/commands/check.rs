//! Check command implementation.

use anyhow::{Context, Result};
use prisma_lint_core::{Analyzer, Config, RuleBox};
use prisma_lint_rules::{all_rules, rules_from_config};
use prisma_lint_ts::TypeScriptParser;
use std::path::Path;

use crate::OutputFormat;

/// Command-line options for `check`.
#[derive(Debug, Default)]
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes.
    pub rules: Option<String>,
    /// Preset overriding the configured one.
    pub preset: Option<String>,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
}

/// Runs the check command.
///
/// Returns `true` when violations at or above the configured `fail_on`
/// severity remain.
pub fn run(path: &Path, options: &CheckOptions, mut config: Config) -> Result<bool> {
    if let Some(preset) = &options.preset {
        config.preset = Some(preset.clone());
    }
    let fail_on = config.fail_threshold();

    let rules = match &options.rules {
        Some(filter) => {
            let names: Vec<&str> = filter.split(',').map(str::trim).collect();
            filter_rules(&config, &names)
        }
        None => rules_from_config(&config),
    };

    let mut builder = Analyzer::builder()
        .root(path)
        .parser(TypeScriptParser::new())
        .config(config);

    for pattern in &options.exclude {
        builder = builder.exclude(pattern.clone());
    }

    for rule in rules {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, options.format, analyzer.root())?;

    Ok(result.has_violations_at(fail_on))
}

/// Selects rules by name or code, keeping the order given on the command line.
fn filter_rules(config: &Config, names: &[&str]) -> Vec<RuleBox> {
    let mut available = all_rules(config);
    let mut selected = Vec::new();

    for name in names.iter().filter(|n| !n.is_empty()) {
        match available
            .iter()
            .position(|r| r.name() == *name || r.code().eq_ignore_ascii_case(name))
        {
            Some(index) => selected.push(available.remove(index)),
            None => tracing::warn!("Unknown rule: {}", name),
        }
    }

    selected
}
