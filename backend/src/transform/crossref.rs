//! System asset mapping: resolve space rows to location ids by name.
//!
//! ```text
//! Locations              Spaces                    Spaces (mapped)
//! name*     id           asset name                asset name   asset*
//! Floor 1   L100    +    " Floor 1 "         →     " Floor 1 "  L100
//! Floor 2   L200         "Roof"                    "Roof"       (empty)
//! ```

use serde_json::Value;
use std::collections::HashMap;

use crate::error::{ExtractError, ExtractResult};
use crate::logs::{DiagnosticSink, Diagnostics};
use crate::models::{cell_text, Finding, Severity, Table};

const OPERATION: &str = "system-asset-mapping";

/// Location column holding the join key.
pub const LOCATION_NAME: &str = "name*";
/// Location column holding the id to copy.
pub const LOCATION_ID: &str = "id";
/// Space column holding the join key.
pub const SPACE_ASSET_NAME: &str = "asset name";
/// Space column receiving the resolved id.
pub const SPACE_ASSET: &str = "asset*";

/// Result of [`map_system_assets`].
#[derive(Debug, Clone, PartialEq)]
pub struct CrossReference {
    /// The space table with `asset*` filled in.
    pub table: Table,
    /// Rows whose `asset*` was resolved.
    pub mapped: usize,
    /// Advisory findings for duplicate location names.
    pub findings: Vec<Finding>,
}

/// Set `asset*` on every space row to the id of the location whose trimmed
/// `name*` equals the row's trimmed `asset name`.
///
/// When several locations share a name the last one wins; each overwrite is
/// reported as an advisory finding. The location table is not modified.
pub fn map_system_assets(
    locations: &Table,
    spaces: &Table,
    sink: &dyn DiagnosticSink,
) -> ExtractResult<CrossReference> {
    let log = Diagnostics::new(sink, OPERATION);

    let mut missing = locations.missing_columns(&[LOCATION_NAME, LOCATION_ID]);
    missing.extend(spaces.missing_columns(&[SPACE_ASSET_NAME]));
    if !missing.is_empty() {
        let err = ExtractError::MissingColumns {
            operation: OPERATION,
            columns: missing,
        };
        log.error(err.to_string());
        return Err(err);
    }

    let mut lookup: HashMap<String, (usize, Value)> = HashMap::new();
    let mut findings = Vec::new();

    for (index, row) in locations.rows.iter().enumerate() {
        let Some(name) = row.get(LOCATION_NAME).and_then(cell_text) else {
            continue;
        };
        let key = name.trim().to_string();
        let id = row.get(LOCATION_ID).cloned().unwrap_or(Value::Null);

        if let Some((first, previous)) = lookup.insert(key.clone(), (index, id.clone())) {
            findings.push(Finding {
                row: Finding::display_row(index),
                field: LOCATION_NAME.to_string(),
                value: key.clone(),
                severity: Severity::Advisory,
                message: format!(
                    "Duplicate location name '{}' (row {}): id '{}' replaces '{}'",
                    key,
                    Finding::display_row(first),
                    cell_text(&id).unwrap_or_default(),
                    cell_text(&previous).unwrap_or_default(),
                ),
            });
        }
    }

    let mut table = spaces.clone();
    table.ensure_column(SPACE_ASSET);
    let mut mapped = 0;

    for row in &mut table.rows {
        let resolved = row
            .get(SPACE_ASSET_NAME)
            .and_then(cell_text)
            .and_then(|name| lookup.get(name.trim()))
            .map(|(_, id)| id.clone())
            .filter(|id| cell_text(id).is_some())
            .unwrap_or(Value::Null);

        if !resolved.is_null() {
            mapped += 1;
        }
        row.insert(SPACE_ASSET.to_string(), resolved);
    }

    if !findings.is_empty() {
        log.warning(format!(
            "{} duplicate location name(s); the last id for each name was used",
            findings.len()
        ));
    }
    log.success(format!("Mapped {} of {} asset IDs", mapped, table.len()));

    Ok(CrossReference {
        table,
        mapped,
        findings,
    })
}
