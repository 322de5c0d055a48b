//! Run reports: a JSON summary of one invocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use crate::error::OutputResult;
use crate::logs::LogEntry;
use crate::models::Finding;
use crate::transform::pipeline::Outcome;

/// Overall result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Table produced, nothing to review
    Ready,
    /// Table produced with advisory findings
    Warning,
    /// No table produced
    Error,
}

impl From<&Outcome> for RunStatus {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Success { .. } => RunStatus::Ready,
            Outcome::ValidationFindings { table: Some(_), .. } => RunStatus::Warning,
            _ => RunStatus::Error,
        }
    }
}

/// Summary written next to a result table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Unique run identifier
    pub run_id: String,

    pub generated_at: DateTime<Utc>,

    /// Operation name (e.g. "facility", "asset-ids")
    pub operation: String,

    /// Status: "ready", "warning", "error"
    pub status: RunStatus,

    /// Rows in the result table
    pub rows: usize,

    /// Columns of the result table
    pub columns: Vec<String>,

    /// Row-level findings
    pub findings: Vec<Finding>,

    /// Message for failed runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Every diagnostic event emitted during the run
    pub diagnostics: Vec<LogEntry>,
}

impl RunReport {
    pub fn new(operation: impl Into<String>, outcome: &Outcome, diagnostics: Vec<LogEntry>) -> Self {
        let table = outcome.table();
        Self {
            run_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            operation: operation.into(),
            status: RunStatus::from(outcome),
            rows: table.map(|t| t.len()).unwrap_or(0),
            columns: table.map(|t| t.headers.clone()).unwrap_or_default(),
            findings: outcome.findings().to_vec(),
            error: outcome.error_message().map(str::to_string),
            diagnostics,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> OutputResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::LogEntry;
    use crate::models::{Severity, Table};
    use serde_json::{json, Value};

    fn finding() -> Finding {
        Finding {
            row: 5,
            field: "Asset System".into(),
            value: "Chiller-X".into(),
            severity: Severity::Advisory,
            message: "Invalid equipment class 'Chiller-X' in Asset System column".into(),
        }
    }

    #[test]
    fn test_status_from_outcome() {
        let table = Table::from_cells(&["name*"], vec![vec![json!("A")]]);
        assert_eq!(
            RunStatus::from(&Outcome::Success { table: table.clone() }),
            RunStatus::Ready
        );
        assert_eq!(
            RunStatus::from(&Outcome::ValidationFindings {
                findings: vec![finding()],
                report: String::new(),
                table: Some(table),
            }),
            RunStatus::Warning
        );
        assert_eq!(
            RunStatus::from(&Outcome::ValidationFindings {
                findings: vec![finding()],
                report: String::new(),
                table: None,
            }),
            RunStatus::Error
        );
    }

    #[test]
    fn test_report_json_shape() {
        let table = Table::from_cells(&["name*", "class"], vec![vec![json!("Pump"), json!("Chiller-X")]]);
        let outcome = Outcome::ValidationFindings {
            findings: vec![finding()],
            report: "Equipment Validation Warnings:".into(),
            table: Some(table),
        };
        let report = RunReport::new(
            "equipment",
            &outcome,
            vec![LogEntry::warning("equipment", "1 equipment value(s) not in the vocabulary")],
        );

        let value: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["operation"], "equipment");
        assert_eq!(value["status"], "warning");
        assert_eq!(value["rows"], 1);
        assert_eq!(value["findings"][0]["row"], 5);
        assert_eq!(value["diagnostics"][0]["level"], "warning");
        assert!(value.get("error").is_none());
        assert!(Uuid::parse_str(value["runId"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_failed_run_carries_message() {
        let outcome = Outcome::StructuralError {
            message: "Namespace is required".into(),
        };
        let report = RunReport::new("facility", &outcome, vec![]);
        assert_eq!(report.status, RunStatus::Error);
        assert_eq!(report.error.as_deref(), Some("Namespace is required"));
        assert_eq!(report.rows, 0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        report.write(&path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"status\": \"error\""));
    }
}
