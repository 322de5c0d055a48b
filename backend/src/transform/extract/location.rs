//! Location (floor) records from the "Asset,location" sheet.

use serde_json::Value;

use super::{finish, record, require_columns, require_namespace, Extraction, TemplateSource};
use crate::error::ExtractResult;
use crate::logs::{DiagnosticSink, Diagnostics};
use crate::models::{is_usable, Domain, Row, Table};

const OPERATION: &str = "location";

pub const SOURCE_COLUMNS: [&str; 2] = ["Building", "Floor"];

/// Output fields, in order. `facility*` is always left empty for the
/// platform to resolve.
pub const FIELDS: [&str; 5] = [
    "facility*",
    "facility name",
    "name*",
    "namespace*",
    "isActive*",
];

/// One record per distinct (Building, Floor) pair.
pub fn extract_location(
    source: &Table,
    template: impl Into<TemplateSource>,
    namespace: &str,
    sink: &dyn DiagnosticSink,
) -> ExtractResult<Extraction> {
    let log = Diagnostics::new(sink, OPERATION);
    log.info("Starting location data processing");

    let namespace = require_namespace(namespace, &log)?;
    require_columns(source, &SOURCE_COLUMNS, OPERATION, &log)?;

    let unique = source.unique_rows(&SOURCE_COLUMNS);
    log.info_indent(format!("{} distinct building/floor pairs", unique.len()), 1);

    let records: Vec<Row> = unique
        .iter()
        .filter(|u| u.values.iter().all(is_usable))
        .map(|u| {
            record(
                &FIELDS,
                vec![Value::Null, u.get(0).clone(), u.get(1).clone()],
                &namespace,
            )
        })
        .collect();

    finish(Domain::Location, &FIELDS, records, template.into(), &log)
}
