//! Space (sublocation) records from the "Asset,location" sheet.

use super::{finish, record, require_columns, require_namespace, Extraction, TemplateSource};
use crate::error::ExtractResult;
use crate::logs::{DiagnosticSink, Diagnostics};
use crate::models::{is_usable, Domain, Row, Table};

const OPERATION: &str = "space";

pub const SOURCE_COLUMNS: [&str; 3] = ["Building", "Floor", "Sublocation"];

pub const FIELDS: [&str; 5] = [
    "facility name",
    "location name",
    "name*",
    "namespace*",
    "isActive*",
];

/// One record per distinct (Building, Floor, Sublocation) triple.
pub fn extract_space(
    source: &Table,
    template: impl Into<TemplateSource>,
    namespace: &str,
    sink: &dyn DiagnosticSink,
) -> ExtractResult<Extraction> {
    let log = Diagnostics::new(sink, OPERATION);
    log.info("Starting space data processing");

    let namespace = require_namespace(namespace, &log)?;
    require_columns(source, &SOURCE_COLUMNS, OPERATION, &log)?;

    let records: Vec<Row> = source
        .unique_rows(&SOURCE_COLUMNS)
        .into_iter()
        .filter(|u| u.values.iter().all(is_usable))
        .map(|u| record(&FIELDS, u.values, &namespace))
        .collect();

    finish(Domain::Space, &FIELDS, records, template.into(), &log)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;
    use crate::logs::NullSink;

    #[test]
    fn test_space_records() {
        let src = fixtures::source(
            &SOURCE_COLUMNS,
            &[
                &["Tower A", "Level 1", "Room 101"],
                &["Tower A", "Level 1", "Room 101"],
                &["Tower A", "Level 1", "Mandatory"],
                &["Tower A", "Level 2", "Room 201"],
            ],
        );
        let template = fixtures::template(&FIELDS, 1, &[]);
        let out = extract_space(&src, template, "acme", &NullSink).unwrap();

        assert_eq!(out.template_rows, 0);
        assert_eq!(out.new_records, 2);
        assert_eq!(out.table.rows[0]["facility name"], "Tower A");
        assert_eq!(out.table.rows[0]["location name"], "Level 1");
        assert_eq!(out.table.rows[0]["name*"], "Room 101");
        assert_eq!(out.table.rows[1]["name*"], "Room 201");
    }

    #[test]
    fn test_new_only_columns_appended() {
        let src = fixtures::source(&SOURCE_COLUMNS, &[&["T", "L", "S"]]);
        let template = fixtures::template(&["name*", "asset*"], 1, &["Old"]);
        let out = extract_space(&src, template, "acme", &NullSink).unwrap();

        assert_eq!(
            out.table.headers,
            vec!["name*", "asset*", "facility name", "location name", "namespace*", "isActive*"]
        );
        assert!(out.table.rows[0].get("facility name").is_none());
        assert!(out.table.rows[1].get("asset*").is_none());
    }

    #[test]
    fn test_template_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("space_template.csv");
        std::fs::write(
            &path,
            "facility name;location name;name*;namespace*;isActive*\nMandatory;Mandatory;Mandatory;Mandatory;Mandatory\nHQ;L1;Lobby;acme;true\n",
        )
        .unwrap();

        let src = fixtures::source(&SOURCE_COLUMNS, &[&["T", "L", "S"]]);
        let out = extract_space(&src, path.as_path(), "acme", &NullSink).unwrap();
        assert_eq!(out.template_rows, 1);
        assert_eq!(out.table.rows[0]["name*"], "Lobby");
        assert_eq!(out.table.rows[1]["name*"], "S");
    }
}
