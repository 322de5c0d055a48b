//! Domain models for the onboarding pipeline.
//!
//! - [`Table`] - ordered headers plus loosely typed rows
//! - [`Domain`] - the four platform record kinds
//! - [`Finding`] / [`Severity`] - row-level validation results
//!
//! Rows are JSON objects: cells are `null`, strings, numbers or booleans,
//! exactly as they come out of a workbook or delimited file.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// One record keyed by column name.
pub type Row = Map<String, Value>;

/// Placeholder literal used by source workbooks to mark required columns.
pub const MANDATORY: &str = "Mandatory";

// =============================================================================
// Table
// =============================================================================

/// A sheet: column order lives in `headers`, cell values in `rows`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    /// Build a table from string headers and positional cells.
    pub fn from_cells<H, R>(headers: &[H], cells: R) -> Self
    where
        H: AsRef<str>,
        R: IntoIterator<Item = Vec<Value>>,
    {
        let headers: Vec<String> = headers.iter().map(|h| h.as_ref().to_string()).collect();
        let rows = cells
            .into_iter()
            .map(|values| {
                let mut row = Row::new();
                for (i, header) in headers.iter().enumerate() {
                    row.insert(header.clone(), values.get(i).cloned().unwrap_or(Value::Null));
                }
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Required columns not present in this table, in the order asked for.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|col| !self.has_column(col))
            .map(|col| col.to_string())
            .collect()
    }

    /// Append a column header unless it already exists.
    pub fn ensure_column(&mut self, name: &str) {
        if !self.has_column(name) {
            self.headers.push(name.to_string());
        }
    }

    /// Cell at `row`/`column`, `null` when either is absent.
    pub fn cell(&self, row: usize, column: &str) -> &Value {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&Value::Null)
    }

    /// Select `columns` from every row and keep the first occurrence of each
    /// distinct combination. Source row indices are preserved.
    pub fn unique_rows(&self, columns: &[&str]) -> Vec<UniqueRow> {
        let mut seen: HashSet<Vec<String>> = HashSet::new();
        let mut unique = Vec::new();

        for (index, row) in self.rows.iter().enumerate() {
            let values: Vec<Value> = columns
                .iter()
                .map(|c| row.get(*c).cloned().unwrap_or(Value::Null))
                .collect();
            let key: Vec<String> = values.iter().map(Value::to_string).collect();
            if seen.insert(key) {
                unique.push(UniqueRow { index, values });
            }
        }

        unique
    }
}

/// A deduplicated projection of a source row.
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueRow {
    /// 0-based index of the first source row carrying these values.
    pub index: usize,
    pub values: Vec<Value>,
}

impl UniqueRow {
    pub fn get(&self, i: usize) -> &Value {
        self.values.get(i).unwrap_or(&Value::Null)
    }
}

// =============================================================================
// Cell helpers
// =============================================================================

/// `null` and whitespace-only strings count as missing.
pub fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Render a cell as text. Integral floats lose their fractional part so a
/// workbook number `101.0` reads as `"101"`.
pub fn cell_text(value: &Value) -> Option<String> {
    if is_missing(value) {
        return None;
    }
    Some(match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

/// True for the workbook's "Mandatory" marker.
pub fn is_mandatory_marker(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.trim() == MANDATORY)
}

/// Present and not a "Mandatory" marker.
pub fn is_usable(value: &Value) -> bool {
    !is_missing(value) && !is_mandatory_marker(value)
}

// =============================================================================
// Domain
// =============================================================================

/// Kinds of platform records produced by the extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Facility,
    Location,
    Space,
    Equipment,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Facility,
        Domain::Location,
        Domain::Space,
        Domain::Equipment,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Domain::Facility => "facility",
            Domain::Location => "location",
            Domain::Space => "space",
            Domain::Equipment => "equipment",
        }
    }

    /// Leading template rows that hold instructions rather than data.
    pub fn placeholder_rows(&self) -> usize {
        match self {
            Domain::Facility => 2,
            _ => 1,
        }
    }

    /// Sheet read from the uploaded workbook unless overridden.
    pub fn default_sheet(&self) -> &'static str {
        match self {
            Domain::Facility => "Building (Facility)",
            _ => ASSET_LOCATION_SHEET,
        }
    }

    /// File name of the bundled platform template.
    pub fn template_file(&self) -> &'static str {
        match self {
            Domain::Facility => "facility_template.csv",
            Domain::Location => "location_template.csv",
            Domain::Space => "space_template.csv",
            Domain::Equipment => "equipment_template.csv",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "facility" | "facilities" => Ok(Domain::Facility),
            "location" | "locations" => Ok(Domain::Location),
            "space" | "spaces" => Ok(Domain::Space),
            "equipment" => Ok(Domain::Equipment),
            other => Err(format!("unknown domain '{}'", other)),
        }
    }
}

/// Sheet holding asset and location rows in source workbooks.
pub const ASSET_LOCATION_SHEET: &str = "Asset,location";

// =============================================================================
// Findings
// =============================================================================

/// Whether a finding stops the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error class: no result table is produced.
    Blocking,
    /// Warning class: the result table is produced alongside the finding.
    Advisory,
}

/// A row-level validation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Display row number (header row counted, 1-based).
    pub row: usize,
    pub field: String,
    pub value: String,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    /// Display row for a 0-based data row index under a single header row.
    pub fn display_row(index: usize) -> usize {
        index + 2
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_values() {
        assert!(is_missing(&Value::Null));
        assert!(is_missing(&json!("   ")));
        assert!(!is_missing(&json!("x")));
        assert!(!is_missing(&json!(0)));
    }

    #[test]
    fn test_cell_text_integral_float() {
        assert_eq!(cell_text(&json!(101.0)).as_deref(), Some("101"));
        assert_eq!(cell_text(&json!(1.5)).as_deref(), Some("1.5"));
        assert_eq!(cell_text(&json!(7)).as_deref(), Some("7"));
        assert_eq!(cell_text(&json!("")), None);
    }

    #[test]
    fn test_mandatory_marker() {
        assert!(is_mandatory_marker(&json!("Mandatory")));
        assert!(is_mandatory_marker(&json!(" Mandatory ")));
        assert!(!is_mandatory_marker(&json!("mandatory field")));
        assert!(!is_usable(&json!("Mandatory")));
        assert!(is_usable(&json!("Tower A")));
    }

    #[test]
    fn test_unique_rows_keeps_first_occurrence() {
        let table = Table::from_cells(
            &["Building", "Floor"],
            vec![
                vec![json!("A"), json!("1")],
                vec![json!("A"), json!("2")],
                vec![json!("A"), json!("1")],
                vec![json!("B"), json!("1")],
            ],
        );
        let unique = table.unique_rows(&["Building", "Floor"]);
        let indices: Vec<usize> = unique.iter().map(|u| u.index).collect();
        assert_eq!(indices, vec![0, 1, 3]);
    }

    #[test]
    fn test_unique_rows_distinguishes_types() {
        let table = Table::from_cells(
            &["Floor"],
            vec![vec![json!("1")], vec![json!(1)], vec![Value::Null], vec![Value::Null]],
        );
        assert_eq!(table.unique_rows(&["Floor"]).len(), 3);
    }

    #[test]
    fn test_missing_columns_in_order() {
        let table = Table::new(vec!["Building".into()]);
        assert_eq!(
            table.missing_columns(&["Floor", "Building", "Sublocation"]),
            vec!["Floor".to_string(), "Sublocation".to_string()]
        );
    }

    #[test]
    fn test_domain_conventions() {
        assert_eq!(Domain::Facility.placeholder_rows(), 2);
        assert_eq!(Domain::Space.placeholder_rows(), 1);
        assert_eq!(Domain::Facility.default_sheet(), "Building (Facility)");
        assert_eq!(Domain::Equipment.default_sheet(), "Asset,location");
        assert_eq!("Spaces".parse::<Domain>(), Ok(Domain::Space));
    }
}
