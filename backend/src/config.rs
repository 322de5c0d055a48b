//! Run options.
//!
//! Values come from, in increasing priority: built-in defaults, the
//! environment (a `.env` file is loaded by the CLI), and command-line flags.
//!
//! | Variable                   | Field              |
//! |----------------------------|--------------------|
//! | `ONBOARD_NAMESPACE`        | `namespace`        |
//! | `ONBOARD_EQUIPMENT_POLICY` | `equipment_policy` |
//! | `ONBOARD_TEMPLATE_DIR`     | `template_dir`     |
//! | `ONBOARD_VOCABULARY`       | `vocabulary`       |

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::models::Domain;
use crate::validation::{EquipmentPolicy, EquipmentValidator, EquipmentVocabulary};

pub const ENV_NAMESPACE: &str = "ONBOARD_NAMESPACE";
pub const ENV_EQUIPMENT_POLICY: &str = "ONBOARD_EQUIPMENT_POLICY";
pub const ENV_TEMPLATE_DIR: &str = "ONBOARD_TEMPLATE_DIR";
pub const ENV_VOCABULARY: &str = "ONBOARD_VOCABULARY";

/// Directory holding the bundled platform templates, resolved at build time.
pub const DEFAULT_TEMPLATE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/templates");

/// Options for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardOptions {
    /// Stamped into `namespace*` on every new record
    pub namespace: String,

    /// Sheet to read instead of the domain's default
    pub sheet: Option<String>,

    /// Template file to merge onto instead of the one in `template_dir`
    pub template: Option<PathBuf>,

    /// Directory searched for `<domain>_template.csv`
    pub template_dir: PathBuf,

    /// What out-of-vocabulary equipment values do to the run
    pub equipment_policy: EquipmentPolicy,

    /// Vocabulary file replacing the bundled one
    pub vocabulary: Option<PathBuf>,
}

impl Default for OnboardOptions {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            sheet: None,
            template: None,
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            equipment_policy: EquipmentPolicy::default(),
            vocabulary: None,
        }
    }
}

impl OnboardOptions {
    /// Defaults overridden by `ONBOARD_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut options = Self::default();

        if let Some(namespace) = get(ENV_NAMESPACE) {
            options.namespace = namespace;
        }
        if let Some(policy) = get(ENV_EQUIPMENT_POLICY) {
            options.equipment_policy = policy.parse()?;
        }
        if let Some(dir) = get(ENV_TEMPLATE_DIR) {
            options.template_dir = PathBuf::from(dir);
        }
        if let Some(path) = get(ENV_VOCABULARY) {
            options.vocabulary = Some(PathBuf::from(path));
        }

        Ok(options)
    }

    /// Sheet to read for `domain`.
    pub fn sheet_for(&self, domain: Domain) -> &str {
        self.sheet.as_deref().unwrap_or(domain.default_sheet())
    }

    /// Template to merge `domain` records onto.
    pub fn template_path(&self, domain: Domain) -> PathBuf {
        self.template
            .clone()
            .unwrap_or_else(|| self.template_dir.join(domain.template_file()))
    }

    /// Configured vocabulary, or the bundled one.
    pub fn load_vocabulary(&self) -> Result<EquipmentVocabulary, ConfigError> {
        match &self.vocabulary {
            Some(path) => EquipmentVocabulary::from_file(path),
            None => Ok(EquipmentVocabulary::bundled()),
        }
    }

    pub fn equipment_validator(&self) -> Result<EquipmentValidator, ConfigError> {
        Ok(EquipmentValidator::new(
            self.load_vocabulary()?,
            self.equipment_policy,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let options = OnboardOptions::default();
        assert_eq!(options.equipment_policy, EquipmentPolicy::Warn);
        assert_eq!(options.sheet_for(Domain::Facility), "Building (Facility)");
        assert_eq!(options.sheet_for(Domain::Space), "Asset,location");
        assert_eq!(
            options.template_path(Domain::Location),
            Path::new(DEFAULT_TEMPLATE_DIR).join("location_template.csv")
        );
    }

    #[test]
    fn test_bundled_templates_found_from_any_directory() {
        let options = OnboardOptions::default();
        assert!(options.template_path(Domain::Facility).is_absolute());
        for domain in Domain::ALL {
            assert!(options.template_path(domain).is_file(), "{} template", domain);
        }
    }

    #[test]
    fn test_env_overrides() {
        let options = OnboardOptions::from_lookup(lookup(&[
            (ENV_NAMESPACE, "acme"),
            (ENV_EQUIPMENT_POLICY, "block"),
            (ENV_TEMPLATE_DIR, "/srv/templates"),
            (ENV_VOCABULARY, ""),
        ]))
        .unwrap();

        assert_eq!(options.namespace, "acme");
        assert_eq!(options.equipment_policy, EquipmentPolicy::Block);
        assert_eq!(
            options.template_path(Domain::Equipment),
            Path::new("/srv/templates/equipment_template.csv")
        );
        assert!(options.vocabulary.is_none());
    }

    #[test]
    fn test_bad_policy_rejected() {
        let err = OnboardOptions::from_lookup(lookup(&[(ENV_EQUIPMENT_POLICY, "panic")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPolicy(_)));
    }

    #[test]
    fn test_explicit_template_and_sheet_win() {
        let options = OnboardOptions {
            sheet: Some("Sheet1".into()),
            template: Some(PathBuf::from("my.csv")),
            ..Default::default()
        };
        assert_eq!(options.sheet_for(Domain::Facility), "Sheet1");
        assert_eq!(options.template_path(Domain::Facility), PathBuf::from("my.csv"));
    }

    #[test]
    fn test_missing_vocabulary_file() {
        let options = OnboardOptions {
            vocabulary: Some(PathBuf::from("/nonexistent/vocab.json")),
            ..Default::default()
        };
        assert!(matches!(options.load_vocabulary(), Err(ConfigError::Io(_))));
    }
}
