//! Rule presets for common configurations.

use crate::{
    CreateNoDeletedAt, DeleteNamingConvention, FindNamingConvention, RepositoryAccessRestriction,
    UpdateNamingConvention,
};
use prisma_lint_core::{Config, RuleBox, Severity};

/// Preset configurations for prisma-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// All rules with their default severities.
    Recommended,
    /// All rules as errors, including in tests.
    Strict,
    /// Payload rules only, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Looks up a preset by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::Recommended),
            "strict" => Some(Self::Strict),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// Returns the rules for this preset, built from `config`.
    #[must_use]
    pub fn rules(self, config: &Config) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(config),
            Self::Strict => strict_rules(config),
            Self::Minimal => minimal_rules(config),
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes every rule at its default severity:
/// - `create-no-deleted-at` (PL001), `update-naming-convention` (PL002),
///   `delete-naming-convention` (PL003) as errors
/// - `find-naming-convention` (PL004), `repository-access-restriction` (PL005)
///   as warnings
#[must_use]
pub fn recommended_rules(config: &Config) -> Vec<RuleBox> {
    all_rules(config)
}

/// Returns the strict set of rules.
///
/// Same rules as recommended, with the naming and layering warnings raised
/// to errors and test files no longer exempt from
/// `repository-access-restriction`.
#[must_use]
pub fn strict_rules(config: &Config) -> Vec<RuleBox> {
    vec![
        Box::new(CreateNoDeletedAt::from_config(config)),
        Box::new(UpdateNamingConvention::from_config(config)),
        Box::new(DeleteNamingConvention::from_config(config)),
        Box::new(FindNamingConvention::from_config(config).severity(Severity::Error)),
        Box::new(
            RepositoryAccessRestriction::from_config(config)
                .allow_in_tests(false)
                .severity(Severity::Error),
        ),
    ]
}

/// Returns the minimal set of rules.
///
/// For gradual adoption, only the payload checks:
/// - `create-no-deleted-at`
/// - `update-naming-convention`
#[must_use]
pub fn minimal_rules(config: &Config) -> Vec<RuleBox> {
    vec![
        Box::new(CreateNoDeletedAt::from_config(config)),
        Box::new(UpdateNamingConvention::from_config(config)),
    ]
}

/// Returns all available rules.
#[must_use]
pub fn all_rules(config: &Config) -> Vec<RuleBox> {
    vec![
        Box::new(CreateNoDeletedAt::from_config(config)),
        Box::new(UpdateNamingConvention::from_config(config)),
        Box::new(DeleteNamingConvention::from_config(config)),
        Box::new(FindNamingConvention::from_config(config)),
        Box::new(RepositoryAccessRestriction::from_config(config)),
    ]
}

/// Returns the rules selected by `config.preset` (recommended when unset).
///
/// Unknown preset names fall back to recommended.
#[must_use]
pub fn rules_from_config(config: &Config) -> Vec<RuleBox> {
    let preset = match config.preset.as_deref() {
        None => Preset::Recommended,
        Some(name) => Preset::from_name(name).unwrap_or_else(|| {
            tracing::warn!("Unknown preset '{name}', using 'recommended'");
            Preset::Recommended
        }),
    };
    preset.rules(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn test_preset_rules() {
        let config = Config::default();
        assert_eq!(Preset::Recommended.rules(&config).len(), 5);
        assert_eq!(Preset::Strict.rules(&config).len(), 5);
        assert_eq!(
            names(&Preset::Minimal.rules(&config)),
            vec!["create-no-deleted-at", "update-naming-convention"]
        );
    }

    #[test]
    fn test_strict_raises_warnings() {
        let rules = strict_rules(&Config::default());
        assert!(rules.iter().all(|r| r.default_severity() == Severity::Error));
    }

    #[test]
    fn test_codes_are_unique_and_ordered() {
        let codes: Vec<_> = all_rules(&Config::default())
            .iter()
            .map(|r| r.code())
            .collect();
        assert_eq!(codes, vec!["PL001", "PL002", "PL003", "PL004", "PL005"]);
    }

    #[test]
    fn test_rules_from_config_preset() {
        let config = Config::parse("preset = \"minimal\"").unwrap();
        assert_eq!(rules_from_config(&config).len(), 2);

        let config = Config::parse("preset = \"nonsense\"").unwrap();
        assert_eq!(rules_from_config(&config).len(), 5);
    }
}
