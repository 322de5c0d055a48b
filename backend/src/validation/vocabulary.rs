//! Controlled vocabularies for equipment classes and types.
//!
//! The bundled vocabulary is embedded from `vocabularies/equipment.json`.
//! A replacement file with the same shape can be loaded at runtime:
//!
//! ```json
//! { "classes": ["HVAC", "Electrical"], "types": ["Chiller", "Pump"] }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::ConfigError;

const BUNDLED: &str = include_str!("../../vocabularies/equipment.json");

/// On-disk shape of a vocabulary file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularyFile {
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
}

/// Recognised equipment classes ("Asset System") and types
/// ("Asset / Equipment"), compared trimmed and case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentVocabulary {
    classes: BTreeSet<String>,
    types: BTreeSet<String>,
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn normalized_set<I>(items: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| normalize(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect()
}

impl EquipmentVocabulary {
    pub fn new<C, T>(classes: C, types: T) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        Self {
            classes: normalized_set(classes),
            types: normalized_set(types),
        }
    }

    /// The vocabulary shipped with the crate.
    pub fn bundled() -> Self {
        Self::from_json(BUNDLED).expect("Invalid embedded vocabulary")
    }

    /// Parse a vocabulary file's contents.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let file: VocabularyFile = serde_json::from_str(content)?;
        let vocabulary = Self::new(&file.classes, &file.types);
        if vocabulary.classes.is_empty() {
            return Err(ConfigError::EmptyVocabulary("classes"));
        }
        if vocabulary.types.is_empty() {
            return Err(ConfigError::EmptyVocabulary("types"));
        }
        Ok(vocabulary)
    }

    /// Load a vocabulary file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn is_known_class(&self, value: &str) -> bool {
        self.classes.contains(&normalize(value))
    }

    pub fn is_known_type(&self, value: &str) -> bool {
        self.types.contains(&normalize(value))
    }

    /// Normalized entries, for display.
    pub fn to_file(&self) -> VocabularyFile {
        VocabularyFile {
            classes: self.classes.iter().cloned().collect(),
            types: self.types.iter().cloned().collect(),
        }
    }
}

impl Default for EquipmentVocabulary {
    fn default() -> Self {
        Self::bundled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_vocabulary_loads() {
        let vocab = EquipmentVocabulary::bundled();
        assert!(vocab.is_known_class("HVAC"));
        assert!(vocab.is_known_type("Chiller"));
        assert!(!vocab.is_known_class("Chiller-X"));
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let vocab = EquipmentVocabulary::new(["  Fire Protection "], ["Fire Pump"]);
        assert!(vocab.is_known_class("fire protection"));
        assert!(vocab.is_known_class("FIRE PROTECTION  "));
        assert!(vocab.is_known_type(" fire pump"));
        assert!(!vocab.is_known_type("fire"));
    }

    #[test]
    fn test_from_json_rejects_empty_lists() {
        let err = EquipmentVocabulary::from_json(r#"{"classes": ["HVAC"], "types": []}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyVocabulary("types")));

        let err = EquipmentVocabulary::from_json("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");
        std::fs::write(&path, r#"{"classes": ["Lifts"], "types": ["Elevator"]}"#).unwrap();

        let vocab = EquipmentVocabulary::from_file(&path).unwrap();
        assert!(vocab.is_known_class("lifts"));
        assert_eq!(vocab.to_file().types, vec!["elevator".to_string()]);
    }
}
