//! Facility records from the "Building (Facility)" sheet.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

use super::{finish, record, require_columns, require_namespace, Extraction, TemplateSource};
use crate::error::ExtractResult;
use crate::logs::{DiagnosticSink, Diagnostics};
use crate::models::{cell_text, is_missing, Domain, Row, Table};

const OPERATION: &str = "facility";

/// Source columns, in output order.
pub const SOURCE_COLUMNS: [&str; 5] = [
    "Building Name",
    "Facility Type",
    "Building Criticality",
    "Longitude",
    "Latitude",
];

/// Output fields, in order.
pub const FIELDS: [&str; 7] = [
    "name*",
    "facilityType*",
    "criticality",
    "location.longitude",
    "location.latitude",
    "isActive*",
    "namespace*",
];

/// Accepted criticality codes.
pub const CRITICALITY_CODES: [&str; 3] = ["C1", "C2", "C3"];

static CRITICALITY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"C\d").expect("valid criticality pattern"));

const NAME_LABELS: [&str; 3] = ["name", "name*", "building name"];
const TYPE_LABELS: [&str; 3] = ["facility type", "facility type*", "facilitytype*"];

/// First `C<digit>` in free text, e.g. `"C2 - Important"` → `"C2"`.
pub fn extract_criticality(value: &Value) -> Option<String> {
    let text = cell_text(value)?;
    CRITICALITY_PATTERN
        .find(&text)
        .map(|m| m.as_str().to_string())
}

/// Numbers pass through, numeric text is parsed, anything else is empty.
pub fn coerce_number(value: &Value) -> Value {
    match value {
        Value::Number(_) => value.clone(),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// Instruction text such as "Mandatory" or the column's own label.
fn is_placeholder_label(value: &Value, labels: &[&str]) -> bool {
    let Some(text) = cell_text(value) else {
        return false;
    };
    let lowered = text.trim().to_lowercase();
    lowered.contains("mandatory") || labels.contains(&lowered.as_str())
}

fn keep(name: &Value, facility_type: &Value, criticality: Option<&str>) -> bool {
    !is_missing(name)
        && !is_placeholder_label(name, &NAME_LABELS)
        && !is_missing(facility_type)
        && !is_placeholder_label(facility_type, &TYPE_LABELS)
        && criticality.is_some_and(|c| CRITICALITY_CODES.contains(&c))
}

/// Build facility records and merge them after the template's data rows.
///
/// Rows without a C1–C3 criticality are dropped, as are instruction rows.
pub fn extract_facility(
    source: &Table,
    template: impl Into<TemplateSource>,
    namespace: &str,
    sink: &dyn DiagnosticSink,
) -> ExtractResult<Extraction> {
    let log = Diagnostics::new(sink, OPERATION);
    log.info("Starting facility data processing");

    let namespace = require_namespace(namespace, &log)?;
    require_columns(source, &SOURCE_COLUMNS, OPERATION, &log)?;

    let mut records: Vec<Row> = Vec::new();
    let mut dropped = 0;

    for row in &source.rows {
        let cell = |name: &str| row.get(name).unwrap_or(&Value::Null);
        let name = cell(SOURCE_COLUMNS[0]);
        let facility_type = cell(SOURCE_COLUMNS[1]);
        let criticality = extract_criticality(cell(SOURCE_COLUMNS[2]));

        if !keep(name, facility_type, criticality.as_deref()) {
            dropped += 1;
            continue;
        }

        records.push(record(
            &FIELDS,
            vec![
                name.clone(),
                facility_type.clone(),
                criticality.map(Value::String).unwrap_or(Value::Null),
                coerce_number(cell(SOURCE_COLUMNS[3])),
                coerce_number(cell(SOURCE_COLUMNS[4])),
            ],
            &namespace,
        ));
    }

    if dropped > 0 {
        log.info_indent(
            format!("{} source rows dropped (placeholder or criticality)", dropped),
            1,
        );
    }

    finish(Domain::Facility, &FIELDS, records, template.into(), &log)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;
    use crate::error::ExtractError;
    use crate::logs::NullSink;
    use serde_json::json;

    fn source(rows: &[&[&str]]) -> Table {
        fixtures::source(&SOURCE_COLUMNS, rows)
    }

    fn template() -> Table {
        fixtures::template(&FIELDS, 2, &["Existing HQ"])
    }

    #[test]
    fn test_criticality_extraction() {
        assert_eq!(extract_criticality(&json!("C2 Something")).as_deref(), Some("C2"));
        assert_eq!(extract_criticality(&json!("High (C1)")).as_deref(), Some("C1"));
        assert_eq!(extract_criticality(&json!("C4 - High")).as_deref(), Some("C4"));
        assert_eq!(extract_criticality(&json!("critical")), None);
        assert_eq!(extract_criticality(&Value::Null), None);
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&json!(" 55.27 ")), json!(55.27));
        assert_eq!(coerce_number(&json!(25)), json!(25));
        assert_eq!(coerce_number(&json!("n/a")), Value::Null);
        assert_eq!(coerce_number(&Value::Null), Value::Null);
    }

    #[test]
    fn test_three_rows_one_bad_criticality() {
        let src = source(&[
            &["Tower A", "Office", "C1 - Critical", "55.1", "25.2"],
            &["Tower B", "Warehouse", "C5", "55.3", "25.4"],
            &["Tower C", "Retail", "C2 Something", "east", ""],
        ]);
        let out = extract_facility(&src, template(), "acme", &NullSink).unwrap();

        assert_eq!(out.new_records, 2);
        assert_eq!(out.template_rows, 1);
        assert_eq!(out.table.len(), 3);
        assert_eq!(out.table.rows[0]["name*"], "Existing HQ");

        let new_rows = &out.table.rows[1..];
        assert_eq!(new_rows[0]["name*"], "Tower A");
        assert_eq!(new_rows[0]["criticality"], "C1");
        assert_eq!(new_rows[0]["location.longitude"], json!(55.1));
        assert_eq!(new_rows[1]["name*"], "Tower C");
        assert_eq!(new_rows[1]["criticality"], "C2");
        assert_eq!(new_rows[1]["location.longitude"], Value::Null);
        for row in new_rows {
            assert_eq!(row["namespace*"], "acme");
            assert_eq!(row["isActive*"], true);
        }
    }

    #[test]
    fn test_c4_row_dropped() {
        let src = source(&[&["Tower", "Office", "C4 - High", "", ""]]);
        let out = extract_facility(&src, template(), "acme", &NullSink).unwrap();
        assert_eq!(out.new_records, 0);
    }

    #[test]
    fn test_placeholder_rows_dropped() {
        let src = source(&[
            &["Mandatory", "Mandatory", "C1", "", ""],
            &["Building Name", "Facility Type", "C1", "", ""],
            &["Tower", "", "C1", "", ""],
            &["Tower", "Office", "C1", "", ""],
        ]);
        let out = extract_facility(&src, template(), "acme", &NullSink).unwrap();
        assert_eq!(out.new_records, 1);
    }

    #[test]
    fn test_names_containing_label_words_are_kept() {
        let src = source(&[&["Namesake Tower", "Office", "C3", "", ""]]);
        let out = extract_facility(&src, template(), "acme", &NullSink).unwrap();
        assert_eq!(out.new_records, 1);
    }

    #[test]
    fn test_missing_columns_listed() {
        let src = fixtures::source(&["Building Name", "Facility Type"], &[]);
        let err = extract_facility(&src, template(), "acme", &NullSink).unwrap_err();
        match err {
            ExtractError::MissingColumns { columns, .. } => {
                assert_eq!(columns, vec!["Building Criticality", "Longitude", "Latitude"])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_namespace_rejected() {
        let src = source(&[&["Tower", "Office", "C1", "", ""]]);
        let err = extract_facility(&src, template(), "   ", &NullSink).unwrap_err();
        assert!(matches!(err, ExtractError::EmptyNamespace));
    }

    #[test]
    fn test_rerun_is_identical() {
        let src = source(&[
            &["Tower A", "Office", "C1", "55.1", "25.2"],
            &["Tower B", "Office", "C3", "", ""],
        ]);
        let first = extract_facility(&src, template(), "acme", &NullSink).unwrap();
        let second = extract_facility(&src, template(), "acme", &NullSink).unwrap();
        assert_eq!(first, second);
    }
}
