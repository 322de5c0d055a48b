//! Equipment records from the "Asset,location" sheet.
//!
//! Rows are checked against the equipment vocabulary before any record is
//! built. Under [`EquipmentPolicy::Block`] any finding aborts the run; under
//! [`EquipmentPolicy::Warn`] the findings and their report travel with the
//! merged table.

use super::{finish, record, require_columns, require_namespace, Extraction, TemplateSource};
use crate::error::{ExtractError, ExtractResult};
use crate::logs::{DiagnosticSink, Diagnostics};
use crate::models::{is_mandatory_marker, is_missing, Domain, Row, Table, UniqueRow};
use crate::validation::equipment::{EquipmentEntry, ASSET_EQUIPMENT, ASSET_SYSTEM};
use crate::validation::{render_report, EquipmentPolicy, EquipmentValidator};

const OPERATION: &str = "equipment";

pub const SOURCE_COLUMNS: [&str; 5] = [
    "Barcode",
    ASSET_SYSTEM,
    ASSET_EQUIPMENT,
    "Asset Criticality",
    "Sublocation",
];

pub const FIELDS: [&str; 8] = [
    "barcode",
    "name*",
    "type",
    "class",
    "criticality",
    "space name",
    "namespace*",
    "isActive*",
];

const BARCODE: usize = 0;
const SYSTEM: usize = 1;
const EQUIPMENT: usize = 2;
const CRITICALITY: usize = 3;
const SUBLOCATION: usize = 4;

/// At least one asset column filled, and neither holding the marker.
fn keep(row: &UniqueRow) -> bool {
    let system = row.get(SYSTEM);
    let equipment = row.get(EQUIPMENT);
    (!is_missing(system) || !is_missing(equipment))
        && !is_mandatory_marker(system)
        && !is_mandatory_marker(equipment)
}

fn to_record(row: &UniqueRow, namespace: &str) -> Row {
    let system = row.get(SYSTEM);
    let equipment = row.get(EQUIPMENT);
    let name = if is_missing(equipment) { system } else { equipment };

    record(
        &FIELDS,
        vec![
            row.get(BARCODE).clone(),
            name.clone(),
            equipment.clone(),
            system.clone(),
            row.get(CRITICALITY).clone(),
            row.get(SUBLOCATION).clone(),
        ],
        namespace,
    )
}

/// One record per distinct equipment row, after vocabulary checks.
pub fn extract_equipment(
    source: &Table,
    template: impl Into<TemplateSource>,
    namespace: &str,
    validator: &EquipmentValidator,
    sink: &dyn DiagnosticSink,
) -> ExtractResult<Extraction> {
    let log = Diagnostics::new(sink, OPERATION);
    log.info("Starting equipment data processing");

    let namespace = require_namespace(namespace, &log)?;
    require_columns(source, &SOURCE_COLUMNS, OPERATION, &log)?;

    let rows: Vec<UniqueRow> = source
        .unique_rows(&SOURCE_COLUMNS)
        .into_iter()
        .filter(keep)
        .collect();

    let entries: Vec<EquipmentEntry<'_>> = rows
        .iter()
        .map(|r| EquipmentEntry {
            index: r.index,
            asset_system: r.get(SYSTEM),
            asset_equipment: r.get(EQUIPMENT),
        })
        .collect();

    let policy = validator.policy();
    let findings = validator.check(&entries);
    let report = if findings.is_empty() {
        None
    } else {
        Some(render_report(&findings, policy))
    };

    if let Some(report) = &report {
        match policy {
            EquipmentPolicy::Block => {
                let err = ExtractError::ValidationBlocked {
                    findings,
                    report: report.clone(),
                };
                log.error(err.to_string());
                return Err(err);
            }
            EquipmentPolicy::Warn => {
                log.warning(format!(
                    "{} equipment value(s) not in the vocabulary",
                    findings.len()
                ));
            }
        }
    }

    let records: Vec<Row> = rows.iter().map(|r| to_record(r, &namespace)).collect();
    let mut extraction = finish(Domain::Equipment, &FIELDS, records, template.into(), &log)?;
    extraction.findings = findings;
    extraction.report = report;
    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;
    use crate::logs::{LogLevel, MemorySink, NullSink};
    use crate::models::Severity;
    use crate::validation::EquipmentVocabulary;
    use serde_json::Value;

    fn validator(policy: EquipmentPolicy) -> EquipmentValidator {
        EquipmentValidator::new(
            EquipmentVocabulary::new(["HVAC", "Plumbing"], ["Chiller", "Pump"]),
            policy,
        )
    }

    fn template() -> Table {
        fixtures::template(&FIELDS, 1, &[])
    }

    fn source(rows: &[&[&str]]) -> Table {
        fixtures::source(&SOURCE_COLUMNS, rows)
    }

    #[test]
    fn test_filter_and_name_fallback() {
        let src = source(&[
            &["B1", "HVAC", "Chiller", "High", "Plant Room"],
            &["B1", "HVAC", "Chiller", "High", "Plant Room"],
            &["B2", "Plumbing", "", "Low", "Basement"],
            &["B3", "", "", "Low", "Basement"],
            &["B4", "Mandatory", "Pump", "Low", "Basement"],
        ]);
        let out = extract_equipment(&src, template(), "acme", &validator(EquipmentPolicy::Warn), &NullSink)
            .unwrap();

        assert_eq!(out.new_records, 2);
        assert!(out.findings.is_empty());
        assert!(out.report.is_none());

        let first = &out.table.rows[0];
        assert_eq!(first["barcode"], "B1");
        assert_eq!(first["name*"], "Chiller");
        assert_eq!(first["type"], "Chiller");
        assert_eq!(first["class"], "HVAC");
        assert_eq!(first["criticality"], "High");
        assert_eq!(first["space name"], "Plant Room");

        let second = &out.table.rows[1];
        assert_eq!(second["name*"], "Plumbing");
        assert_eq!(second["type"], Value::Null);
    }

    #[test]
    fn test_unknown_class_warns_and_keeps_table() {
        let src = source(&[
            &["B1", "HVAC", "Chiller", "High", "Plant Room"],
            &["B2", "Chiller-X", "Pump", "Low", "Basement"],
        ]);
        let sink = MemorySink::new();
        let out = extract_equipment(&src, template(), "acme", &validator(EquipmentPolicy::Warn), &sink)
            .unwrap();

        assert_eq!(out.new_records, 2);
        assert_eq!(out.findings.len(), 1);
        assert_eq!(out.findings[0].row, 3);
        assert_eq!(out.findings[0].value, "Chiller-X");
        assert_eq!(out.findings[0].severity, Severity::Advisory);

        let report = out.report.unwrap();
        assert!(report.starts_with("Equipment Validation Warnings:"));
        assert!(report.contains("Row 3: Invalid equipment class 'Chiller-X' in Asset System column"));
        assert_eq!(sink.count(LogLevel::Warning), 1);
    }

    #[test]
    fn test_block_policy_withholds_table() {
        let src = source(&[&["B1", "HVAC", "Pump Z", "High", "Plant Room"]]);
        let err = extract_equipment(&src, template(), "acme", &validator(EquipmentPolicy::Block), &NullSink)
            .unwrap_err();

        match err {
            ExtractError::ValidationBlocked { findings, report } => {
                assert_eq!(findings.len(), 1);
                assert_eq!(findings[0].field, ASSET_EQUIPMENT);
                assert_eq!(findings[0].severity, Severity::Blocking);
                assert!(report.starts_with("Equipment Validation Errors:"));
                assert!(report.contains("  Asset / Equipment: Pump Z"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_finding_rows_use_source_position() {
        let src = source(&[
            &["", "Mandatory", "Mandatory", "", ""],
            &["B1", "HVAC", "Chiller", "High", "Plant Room"],
            &["B1", "HVAC", "Chiller", "High", "Plant Room"],
            &["B9", "Lifts", "", "", ""],
        ]);
        let out = extract_equipment(&src, template(), "acme", &validator(EquipmentPolicy::Warn), &NullSink)
            .unwrap();
        assert_eq!(out.findings.len(), 1);
        assert_eq!(out.findings[0].row, 5);
    }

    #[test]
    fn test_missing_columns() {
        let src = fixtures::source(&["Barcode", ASSET_SYSTEM], &[]);
        let err = extract_equipment(&src, template(), "acme", &validator(EquipmentPolicy::Warn), &NullSink)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Asset / Equipment"));
        assert!(message.contains("Asset Criticality"));
        assert!(message.contains("Sublocation"));
    }
}
