//! Locating and loading `prisma-lint.toml`.
//!
//! Lookup order: `--config`, then `prisma-lint.toml` or `.prisma-lint.toml`
//! in the checked directory, then `config.toml` in the user config directory
//! (`$PRISMA_LINT_CONFIG_DIR`, else `~/.prisma-lint`). Defaults apply when
//! none exists.

use anyhow::{Context, Result};
use prisma_lint_core::Config;
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["prisma-lint.toml", ".prisma-lint.toml"];
const USER_FILE: &str = "config.toml";
const USER_DIR_ENV: &str = "PRISMA_LINT_CONFIG_DIR";

/// Where the effective configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// `--config PATH`.
    Explicit,
    /// A config file in the checked directory.
    Project,
    /// The per-user config directory.
    User,
    /// No file; built-in defaults.
    Defaults,
}

/// A loaded configuration and the file it was read from.
#[derive(Debug)]
pub struct ResolvedConfig {
    /// Parsed configuration.
    pub config: Config,
    /// Where it came from.
    pub origin: ConfigOrigin,
    /// The file, unless defaults apply.
    pub path: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Returns what `check` should lint.
    ///
    /// An explicit command-line path wins. Otherwise `[analyzer] root` is
    /// used, relative to the project or `--config` file that set it.
    #[must_use]
    pub fn target(&self, cli_path: Option<&Path>) -> PathBuf {
        if let Some(path) = cli_path {
            return path.to_path_buf();
        }
        let root = &self.config.analyzer.root;
        match (&self.path, self.origin) {
            (Some(file), ConfigOrigin::Explicit | ConfigOrigin::Project) if root.is_relative() => {
                file.parent().map_or_else(|| root.clone(), |dir| dir.join(root))
            }
            _ => root.clone(),
        }
    }
}

/// Finds and parses the configuration for a run rooted at `start`.
///
/// `start` may be a file; its directory is searched then.
///
/// # Errors
///
/// Returns an error if the selected file cannot be read or parsed.
pub fn load(start: &Path, explicit: Option<&Path>) -> Result<ResolvedConfig> {
    load_with(start, explicit, user_config_dir().as_deref())
}

fn load_with(start: &Path, explicit: Option<&Path>, user_dir: Option<&Path>) -> Result<ResolvedConfig> {
    let Some((origin, path)) = locate(start, explicit, user_dir) else {
        tracing::debug!("No config file found, using defaults");
        return Ok(ResolvedConfig {
            config: Config::default(),
            origin: ConfigOrigin::Defaults,
            path: None,
        });
    };

    match origin {
        ConfigOrigin::User => tracing::info!("Using user config: {}", path.display()),
        _ => tracing::debug!("Using config: {}", path.display()),
    }
    let config = Config::from_file(&path)
        .with_context(|| format!("Failed to load config: {}", path.display()))?;

    Ok(ResolvedConfig {
        config,
        origin,
        path: Some(path),
    })
}

fn locate(start: &Path, explicit: Option<&Path>, user_dir: Option<&Path>) -> Option<(ConfigOrigin, PathBuf)> {
    if let Some(path) = explicit {
        return Some((ConfigOrigin::Explicit, path.to_path_buf()));
    }

    let dir = if start.is_file() {
        start.parent().unwrap_or(start)
    } else {
        start
    };
    let project = PROJECT_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file());
    if let Some(path) = project {
        return Some((ConfigOrigin::Project, path));
    }

    user_dir
        .map(|d| d.join(USER_FILE))
        .filter(|candidate| candidate.is_file())
        .map(|path| (ConfigOrigin::User, path))
}

fn user_config_dir() -> Option<PathBuf> {
    std::env::var_os(USER_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|home| home.join(".prisma-lint")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prisma_lint_core::Severity;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn project_file_next_to_single_file_target() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".prisma-lint.toml"), "preset = \"strict\"\n").unwrap();
        let file = tmp.path().join("user.repository.ts");
        fs::write(&file, "").unwrap();

        let resolved = load_with(&file, None, None).unwrap();
        assert_eq!(resolved.origin, ConfigOrigin::Project);
        assert_eq!(resolved.config.preset.as_deref(), Some("strict"));
    }

    #[test]
    fn plain_name_wins_over_dotfile_and_user_config() {
        let project = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        fs::write(project.path().join("prisma-lint.toml"), "fail_on = \"warning\"\n").unwrap();
        fs::write(project.path().join(".prisma-lint.toml"), "preset = \"minimal\"\n").unwrap();
        fs::write(user.path().join("config.toml"), "preset = \"strict\"\n").unwrap();

        let resolved = load_with(project.path(), None, Some(user.path())).unwrap();
        assert_eq!(resolved.path, Some(project.path().join("prisma-lint.toml")));
        assert_eq!(resolved.config.fail_threshold(), Severity::Warning);
        assert!(resolved.config.preset.is_none());
    }

    #[test]
    fn user_config_then_defaults() {
        let project = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();

        let resolved = load_with(project.path(), None, Some(user.path())).unwrap();
        assert_eq!(resolved.origin, ConfigOrigin::Defaults);
        assert!(resolved.path.is_none());

        fs::write(user.path().join("config.toml"), "preset = \"minimal\"\n").unwrap();
        let resolved = load_with(project.path(), None, Some(user.path())).unwrap();
        assert_eq!(resolved.origin, ConfigOrigin::User);
        assert_eq!(resolved.config.preset.as_deref(), Some("minimal"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_with(Path::new("."), Some(Path::new("/nonexistent/prisma-lint.toml")), None)
            .unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }

    #[test]
    fn analyzer_root_is_relative_to_the_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_file = tmp.path().join("prisma-lint.toml");
        fs::write(&config_file, "[analyzer]\nroot = \"apps/api/src\"\n").unwrap();

        let resolved = load_with(tmp.path(), None, None).unwrap();
        assert_eq!(resolved.target(None), tmp.path().join("apps/api/src"));
        assert_eq!(
            resolved.target(Some(Path::new("libs"))),
            PathBuf::from("libs")
        );

        let explicit = load_with(Path::new("."), Some(&config_file), None).unwrap();
        assert_eq!(explicit.target(None), tmp.path().join("apps/api/src"));
    }

    #[test]
    fn defaults_lint_the_current_directory() {
        let tmp = TempDir::new().unwrap();
        let resolved = load_with(tmp.path(), None, None).unwrap();
        assert_eq!(resolved.target(None), PathBuf::from("."));
    }
}
