//! Asset identifier generation.
//!
//! An identifier is five shorthand codes plus a counter that disambiguates
//! rows sharing the same codes:
//!
//! ```text
//! Building  Location  Space   Subspace  Asset / Equipment
//! Tower A   Level 2   Plant   North     Chiller            →  TOW-LEV-PLA-NOR-CHI-1
//! Tower A   Level 2   Plant   North     Chiller            →  TOW-LEV-PLA-NOR-CHI-2
//! ```
//!
//! The counter is explicit state owned by the caller and lives for one run.

use serde_json::Value;
use std::collections::HashMap;

use super::shorthand::{shorten_cell, UNKNOWN};
use crate::error::{ExtractError, ExtractResult};
use crate::logs::{DiagnosticSink, Diagnostics};
use crate::models::{is_missing, Row, Table};

/// Column receiving the generated identifiers.
pub const ASSET_ID_COLUMN: &str = "Asset ID";

/// Source columns the generator reads, in component order.
pub const ASSET_ID_COLUMNS: [&str; 6] = [
    "Building",
    "Location",
    "Space",
    "Subspace",
    "Asset System",
    "Asset / Equipment",
];

const OPERATION: &str = "asset-ids";

/// Per-run occurrence counts keyed by base code.
#[derive(Debug, Default, Clone)]
pub struct AssetCounter {
    counts: HashMap<String, usize>,
}

impl AssetCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more occurrence of `base` and return its 1-based ordinal.
    pub fn next(&mut self, base: &str) -> usize {
        let count = self.counts.entry(base.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Occurrences recorded so far.
    pub fn count(&self, base: &str) -> usize {
        self.counts.get(base).copied().unwrap_or(0)
    }

    /// Number of distinct base codes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Dash-joined shorthand codes of a row, before the counter suffix.
pub fn base_code(row: &Row) -> String {
    let cell = |name: &str| row.get(name).unwrap_or(&Value::Null);

    let mut components: Vec<String> = ASSET_ID_COLUMNS[..4]
        .iter()
        .map(|col| shorten_cell(cell(col)))
        .collect();

    let equipment = cell("Asset / Equipment");
    let system = cell("Asset System");
    let eqp = if !is_missing(equipment) {
        shorten_cell(equipment)
    } else if !is_missing(system) {
        shorten_cell(system)
    } else {
        UNKNOWN.to_string()
    };
    components.push(eqp);

    components.join("-")
}

/// Build the identifier for one row, advancing `counter`.
pub fn generate_asset_id(row: &Row, counter: &mut AssetCounter) -> String {
    let base = base_code(row);
    let n = counter.next(&base);
    format!("{}-{}", base, n)
}

/// Add an `Asset ID` column to every row of `table`, in row order.
///
/// All six source columns must exist; nothing is generated otherwise.
pub fn generate_asset_ids(table: &Table, sink: &dyn DiagnosticSink) -> ExtractResult<Table> {
    let log = Diagnostics::new(sink, OPERATION);

    let missing = table.missing_columns(&ASSET_ID_COLUMNS);
    if !missing.is_empty() {
        let err = ExtractError::MissingColumns {
            operation: OPERATION,
            columns: missing,
        };
        log.error(err.to_string());
        return Err(err);
    }

    let mut counter = AssetCounter::new();
    let mut result = table.clone();
    result.ensure_column(ASSET_ID_COLUMN);

    for row in &mut result.rows {
        let id = generate_asset_id(row, &mut counter);
        row.insert(ASSET_ID_COLUMN.to_string(), Value::String(id));
    }

    log.info(format!(
        "Generated {} asset IDs ({} distinct base codes)",
        result.len(),
        counter.len()
    ));
    Ok(result)
}
