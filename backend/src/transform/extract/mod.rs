//! Domain extractors.
//!
//! Every extractor follows the same steps:
//!
//! ```text
//! ┌───────────┐   ┌──────────┐   ┌──────────┐   ┌─────────┐   ┌──────────┐
//! │  columns  │──▶│  unique  │──▶│  filter  │──▶│  build  │──▶│  merge   │
//! │  present? │   │  rows    │   │  rows    │   │ records │   │ template │
//! └───────────┘   └──────────┘   └──────────┘   └─────────┘   └──────────┘
//! ```
//!
//! Records get `namespace*` and `isActive*` stamped on, are checked against
//! their domain schema, and are appended after the template's data rows.

pub mod equipment;
pub mod facility;
pub mod location;
pub mod space;

pub use equipment::extract_equipment;
pub use facility::extract_facility;
pub use location::extract_location;
pub use space::extract_space;

use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::merge::merge;
use crate::error::{ExtractError, ExtractResult, SheetResult};
use crate::logs::Diagnostics;
use crate::models::{cell_text, Domain, Finding, Row, Table};
use crate::parser::parse_file_auto;
use crate::validation::validate_record;

/// Platform field carrying the caller's namespace.
pub const NAMESPACE_FIELD: &str = "namespace*";
/// Platform field marking a record active.
pub const ACTIVE_FIELD: &str = "isActive*";

/// Where the platform template comes from.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// Already parsed.
    Table(Table),
    /// A delimited text file on disk.
    Path(PathBuf),
}

impl TemplateSource {
    pub fn load(self) -> SheetResult<Table> {
        match self {
            TemplateSource::Table(table) => Ok(table),
            TemplateSource::Path(path) => parse_file_auto(path).map(|r| r.table),
        }
    }
}

impl From<Table> for TemplateSource {
    fn from(table: Table) -> Self {
        TemplateSource::Table(table)
    }
}

impl From<PathBuf> for TemplateSource {
    fn from(path: PathBuf) -> Self {
        TemplateSource::Path(path)
    }
}

impl From<&Path> for TemplateSource {
    fn from(path: &Path) -> Self {
        TemplateSource::Path(path.to_path_buf())
    }
}

/// Output of a successful extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    pub domain: Domain,
    /// Template data rows followed by the new records.
    pub table: Table,
    /// Number of template rows kept after placeholder stripping.
    pub template_rows: usize,
    /// Number of records built from the source.
    pub new_records: usize,
    /// Advisory findings (equipment only).
    pub findings: Vec<Finding>,
    /// Diagnostic text accompanying `findings`.
    pub report: Option<String>,
}

/// Blank namespaces are rejected; surrounding whitespace is dropped.
pub(crate) fn require_namespace(namespace: &str, log: &Diagnostics<'_>) -> ExtractResult<String> {
    let trimmed = namespace.trim();
    if trimmed.is_empty() {
        let err = ExtractError::EmptyNamespace;
        log.error(err.to_string());
        return Err(err);
    }
    Ok(trimmed.to_string())
}

pub(crate) fn require_columns(
    source: &Table,
    required: &[&str],
    operation: &'static str,
    log: &Diagnostics<'_>,
) -> ExtractResult<()> {
    let missing = source.missing_columns(required);
    if missing.is_empty() {
        return Ok(());
    }
    let err = ExtractError::MissingColumns {
        operation,
        columns: missing,
    };
    log.error(err.to_string());
    Err(err)
}

/// Build one record from `(field, value)` pairs plus the stamped fields.
///
/// `fields` must list the stamped fields where they belong in the output
/// order; their values are overwritten here. Cells other than text and
/// numbers are stored as their text.
pub(crate) fn record(fields: &[&str], values: Vec<Value>, namespace: &str) -> Row {
    let mut row = Row::new();
    for (field, value) in fields.iter().zip(values.into_iter().chain(std::iter::repeat(Value::Null))) {
        row.insert(field.to_string(), record_value(value));
    }
    row.insert(NAMESPACE_FIELD.to_string(), Value::String(namespace.to_string()));
    row.insert(ACTIVE_FIELD.to_string(), Value::Bool(true));
    row
}

fn record_value(value: Value) -> Value {
    match value {
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            cell_text(&value).map(Value::String).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Schema-check the new records, merge them onto the template and report.
pub(crate) fn finish(
    domain: Domain,
    fields: &[&str],
    records: Vec<Row>,
    template: TemplateSource,
    log: &Diagnostics<'_>,
) -> ExtractResult<Extraction> {
    for (i, rec) in records.iter().enumerate() {
        if let Err(errors) = validate_record(domain, rec) {
            let err = ExtractError::InvalidRecord {
                domain,
                row: i + 1,
                errors,
            };
            log.error(err.to_string());
            return Err(err);
        }
    }

    let template = template.load().map_err(|e| {
        log.error(format!("Cannot load {} template: {}", domain, e));
        ExtractError::Template(e)
    })?;

    let placeholders = domain.placeholder_rows();
    let template_rows = template.len().saturating_sub(placeholders);
    let new_records = records.len();
    let new_table = Table::with_rows(fields.iter().map(|f| f.to_string()).collect(), records);
    let table = merge(template, new_table, placeholders);

    log.success(format!(
        "Processed {} {} records ({} template rows kept)",
        new_records, domain, template_rows
    ));

    Ok(Extraction {
        domain,
        table,
        template_rows,
        new_records,
        findings: Vec::new(),
        report: None,
    })
}
