//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# prisma-lint configuration

# recommended (default), strict or minimal
preset = "recommended"

# Exit with status 1 when a violation at this severity or above remains
# fail_on = "error"

[analyzer]
# Glob patterns to exclude from analysis (replaces the defaults)
exclude = [
    "**/node_modules/**",
    "**/dist/**",
    "**/build/**",
    "**/coverage/**",
    "**/.next/**",
]

# Respect .gitignore files
respect_gitignore = true

[conventions]
# Receivers treated as Prisma clients (`this.prisma.user.create(...)`)
clients = ["prisma", "tx", "transaction"]
soft_delete_field = "deletedAt"
suspend_field = "suspendedAt"

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.create-no-deleted-at]
enabled = true

[rules.update-naming-convention]
enabled = true
# delete_prefix = "delete"
# restore_prefix = "restore"
# suspend_prefix = "suspend"
# update_prefix = "update"

[rules.delete-naming-convention]
enabled = true
# prefixes = ["hardDelete"]

[rules.find-naming-convention]
# severity = "error"
# prefixes = ["find", "get", "list", "count", "exists", "search"]
# allow_in_write_functions = true

[rules.repository-access-restriction]
# allowed_files = ["**/*.repository.ts", "**/repositories/**", "**/prisma/**"]
# allowed_classes = ["Repository", "QueryService", "CommandService"]
allow_in_tests = true
"#;

/// Config file written by `init`.
const CONFIG_FILE: &str = "prisma-lint.toml";

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_FILE), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: prisma-lint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prisma_lint_core::{Config, Severity};
    use tempfile::TempDir;

    #[test]
    fn template_parses_to_defaults() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.preset.as_deref(), Some("recommended"));
        assert_eq!(config.fail_threshold(), Severity::Error);
        assert_eq!(config.conventions.soft_delete_field, "deletedAt");
        assert!(config.is_rule_enabled("find-naming-convention"));
        assert!(config
            .rule("repository-access-restriction")
            .is_some_and(|r| r.get_bool("allow_in_tests", false)));
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        std::fs::write(&path, "preset = \"strict\"\n").unwrap();

        let err = write_config(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "preset = \"strict\"\n");

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
