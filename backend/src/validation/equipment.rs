//! Equipment class/type checks against the controlled vocabulary.
//!
//! "Asset System" values are checked against the classes and
//! "Asset / Equipment" values against the types. Missing values and the
//! "Mandatory" marker are skipped. What happens to findings is decided by
//! [`EquipmentPolicy`]:
//!
//! | Policy  | Severity | Result table |
//! |---------|----------|--------------|
//! | `warn`  | advisory | produced     |
//! | `block` | blocking | withheld     |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::vocabulary::EquipmentVocabulary;
use crate::error::ConfigError;
use crate::models::{cell_text, is_usable, Finding, Severity};

/// Source column checked against equipment classes.
pub const ASSET_SYSTEM: &str = "Asset System";
/// Source column checked against equipment types.
pub const ASSET_EQUIPMENT: &str = "Asset / Equipment";

const REPORT_NOTE: &str =
    "Note: Row numbers include header row. Actual Excel row numbers may be different.";

/// What to do with out-of-vocabulary equipment values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentPolicy {
    /// Report findings and still produce the table.
    #[default]
    Warn,
    /// Report findings and produce no table.
    Block,
}

impl EquipmentPolicy {
    pub fn severity(&self) -> Severity {
        match self {
            EquipmentPolicy::Warn => Severity::Advisory,
            EquipmentPolicy::Block => Severity::Blocking,
        }
    }
}

impl FromStr for EquipmentPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warn" | "warning" | "advisory" => Ok(EquipmentPolicy::Warn),
            "block" | "error" | "blocking" => Ok(EquipmentPolicy::Block),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for EquipmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EquipmentPolicy::Warn => "warn",
            EquipmentPolicy::Block => "block",
        })
    }
}

/// One filtered equipment row under check.
#[derive(Debug, Clone, Copy)]
pub struct EquipmentEntry<'a> {
    /// 0-based index of the source row.
    pub index: usize,
    pub asset_system: &'a Value,
    pub asset_equipment: &'a Value,
}

/// Vocabulary plus policy.
#[derive(Debug, Clone, Default)]
pub struct EquipmentValidator {
    vocabulary: EquipmentVocabulary,
    policy: EquipmentPolicy,
}

impl EquipmentValidator {
    pub fn new(vocabulary: EquipmentVocabulary, policy: EquipmentPolicy) -> Self {
        Self { vocabulary, policy }
    }

    pub fn policy(&self) -> EquipmentPolicy {
        self.policy
    }

    pub fn vocabulary(&self) -> &EquipmentVocabulary {
        &self.vocabulary
    }

    /// Check classes for every entry, then types for every entry.
    pub fn check(&self, entries: &[EquipmentEntry<'_>]) -> Vec<Finding> {
        let severity = self.policy.severity();
        let mut findings = Vec::new();

        for entry in entries {
            if let Some(value) = checked_text(entry.asset_system) {
                if !self.vocabulary.is_known_class(&value) {
                    findings.push(Finding {
                        row: Finding::display_row(entry.index),
                        field: ASSET_SYSTEM.to_string(),
                        message: format!(
                            "Invalid equipment class '{}' in Asset System column",
                            value
                        ),
                        value,
                        severity,
                    });
                }
            }
        }

        for entry in entries {
            if let Some(value) = checked_text(entry.asset_equipment) {
                if !self.vocabulary.is_known_type(&value) {
                    findings.push(Finding {
                        row: Finding::display_row(entry.index),
                        field: ASSET_EQUIPMENT.to_string(),
                        message: format!(
                            "Invalid equipment type '{}' in Asset/Equipment column",
                            value
                        ),
                        value,
                        severity,
                    });
                }
            }
        }

        findings
    }
}

fn checked_text(value: &Value) -> Option<String> {
    if is_usable(value) {
        cell_text(value)
    } else {
        None
    }
}

/// Plain-text diagnostic block: one line per finding, then the distinct
/// offending values per column in alphabetical order.
pub fn render_report(findings: &[Finding], policy: EquipmentPolicy) -> String {
    let title = match policy {
        EquipmentPolicy::Warn => "Equipment Validation Warnings:",
        EquipmentPolicy::Block => "Equipment Validation Errors:",
    };

    let mut lines = vec![title.to_string(), "========================".to_string()];
    lines.extend(findings.iter().map(Finding::to_string));

    let mut summary = Vec::new();
    for field in [ASSET_SYSTEM, ASSET_EQUIPMENT] {
        let values: BTreeSet<&str> = findings
            .iter()
            .filter(|f| f.field == field)
            .map(|f| f.value.as_str())
            .collect();
        if !values.is_empty() {
            let values: Vec<&str> = values.into_iter().collect();
            summary.push(format!("  {}: {}", field, values.join(", ")));
        }
    }

    if !summary.is_empty() {
        lines.push(String::new());
        lines.push("Unrecognised values by column:".to_string());
        lines.extend(summary);
    }

    lines.push(String::new());
    lines.push(REPORT_NOTE.to_string());
    lines.join("\n")
}
