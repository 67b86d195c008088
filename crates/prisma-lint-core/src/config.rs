//! Configuration types for prisma-lint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::Severity;

/// Top-level configuration for prisma-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use (e.g., "recommended", "strict", "minimal").
    #[serde(default)]
    pub preset: Option<String>,

    /// Severity threshold for a failing exit status (default: "error").
    #[serde(default)]
    pub fail_on: Option<Severity>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Project naming conventions shared by all rules.
    #[serde(default)]
    pub conventions: Conventions,

    /// Per-rule configurations.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }

    /// Gets the configuration block for a rule, if any.
    #[must_use]
    pub fn rule(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_name)
    }

    /// Severity at which the run counts as failed.
    #[must_use]
    pub fn fail_threshold(&self) -> Severity {
        self.fail_on.unwrap_or(Severity::Error)
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default = "default_excludes")]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: default_excludes(),
            respect_gitignore: true,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_excludes() -> Vec<String> {
    [
        "**/node_modules/**",
        "**/dist/**",
        "**/build/**",
        "**/coverage/**",
        "**/.next/**",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_true() -> bool {
    true
}

/// Field and client names the project's Prisma conventions are built on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conventions {
    /// Names (or name prefixes) of Prisma client receivers.
    #[serde(default = "default_clients")]
    pub clients: Vec<String>,

    /// Soft-delete timestamp field.
    #[serde(default = "default_soft_delete_field")]
    pub soft_delete_field: String,

    /// Suspension timestamp field.
    #[serde(default = "default_suspend_field")]
    pub suspend_field: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            clients: default_clients(),
            soft_delete_field: default_soft_delete_field(),
            suspend_field: default_suspend_field(),
        }
    }
}

fn default_clients() -> Vec<String> {
    vec!["prisma".into(), "tx".into(), "transaction".into()]
}

fn default_soft_delete_field() -> String {
    "deletedAt".into()
}

fn default_suspend_field() -> String {
    "suspendedAt".into()
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets a boolean option with a default value.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.options
            .get(key)
            .and_then(toml::Value::as_bool)
            .unwrap_or(default)
    }

    /// Gets a string option.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(toml::Value::as_str)
    }

    /// Gets a string array option. A single string is treated as a
    /// one-element array.
    #[must_use]
    pub fn get_str_array(&self, key: &str) -> Option<Vec<String>> {
        match self.options.get(key)? {
            toml::Value::String(s) => Some(vec![s.clone()]),
            toml::Value::Array(arr) => Some(
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect(),
            ),
            _ => None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analyzer.respect_gitignore);
        assert!(config.rules.is_empty());
        assert_eq!(config.conventions.soft_delete_field, "deletedAt");
        assert_eq!(config.fail_threshold(), Severity::Error);
        assert!(config
            .analyzer
            .exclude
            .contains(&"**/node_modules/**".to_string()));
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
preset = "strict"
fail_on = "warning"

[analyzer]
root = "./apps/api"
exclude = ["**/generated/**"]

[conventions]
clients = ["prisma", "db"]
suspend_field = "bannedAt"

[rules.find-naming-convention]
enabled = true
severity = "error"
prefixes = ["find", "get"]
allow_in_write_functions = false

[rules.repository-access-restriction]
enabled = false
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.preset.as_deref(), Some("strict"));
        assert_eq!(config.fail_threshold(), Severity::Warning);
        assert_eq!(config.analyzer.root, PathBuf::from("./apps/api"));
        assert_eq!(config.analyzer.exclude, vec!["**/generated/**".to_string()]);
        assert_eq!(config.conventions.clients, vec!["prisma", "db"]);
        assert_eq!(config.conventions.soft_delete_field, "deletedAt");
        assert_eq!(config.conventions.suspend_field, "bannedAt");

        assert!(config.is_rule_enabled("find-naming-convention"));
        assert!(!config.is_rule_enabled("repository-access-restriction"));
        assert!(config.is_rule_enabled("create-no-deleted-at"));
        assert_eq!(
            config.rule_severity("find-naming-convention"),
            Some(Severity::Error)
        );

        let rule_config = config.rule("find-naming-convention").unwrap();
        assert_eq!(
            rule_config.get_str_array("prefixes"),
            Some(vec!["find".to_string(), "get".to_string()])
        );
        assert!(!rule_config.get_bool("allow_in_write_functions", true));
    }

    #[test]
    fn single_string_option_is_array_of_one() {
        let config = Config::parse(
            r#"
[rules.delete-naming-convention]
prefixes = "purge"
"#,
        )
        .unwrap();
        let rule = config.rule("delete-naming-convention").unwrap();
        assert_eq!(rule.get_str_array("prefixes"), Some(vec!["purge".into()]));
        assert_eq!(rule.get_str("prefixes"), Some("purge"));
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let err = Config::parse("preset = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
