//! High-level pipeline API: read an upload, run one operation, hand back an
//! [`Outcome`].
//!
//! # Example
//!
//! ```rust,ignore
//! use onboard::{run_domain, ConsoleSink, Domain, OnboardOptions, Outcome};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bytes = std::fs::read("site-survey.xlsx")?;
//!     let options = OnboardOptions {
//!         namespace: "acme".into(),
//!         ..Default::default()
//!     };
//!
//!     let outcome = Outcome::from_extraction(run_domain(Domain::Facility, &bytes, &options, &ConsoleSink));
//!     if let Some(table) = outcome.table() {
//!         println!("{} facility rows", table.len());
//!     }
//!     Ok(())
//! }
//! ```

use serde::Serialize;

use super::asset_id::generate_asset_ids;
use super::crossref::{map_system_assets, CrossReference};
use super::extract::{
    extract_equipment, extract_facility, extract_location, extract_space, Extraction,
};
use crate::config::OnboardOptions;
use crate::error::{ExtractError, PipelineError, PipelineResult};
use crate::logs::{DiagnosticSink, Diagnostics};
use crate::models::{Domain, Finding, Table, ASSET_LOCATION_SHEET};
use crate::parser::{is_workbook, parse_bytes_auto, read_workbook_sheet};

const OPERATION: &str = "read";

/// Result of one operation, as presented to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Outcome {
    /// Everything went through.
    Success { table: Table },
    /// The input has the wrong shape; nothing was produced.
    StructuralError { message: String },
    /// Row-level findings. `table` is absent when the findings block the run.
    ValidationFindings {
        findings: Vec<Finding>,
        report: String,
        table: Option<Table>,
    },
    /// Anything else: unreadable input, I/O, bad configuration.
    Failure { message: String },
}

impl Outcome {
    /// Classify an extractor run.
    pub fn from_extraction(result: PipelineResult<Extraction>) -> Self {
        match result {
            Ok(extraction) => match extraction.report {
                Some(report) if !extraction.findings.is_empty() => Outcome::ValidationFindings {
                    findings: extraction.findings,
                    report,
                    table: Some(extraction.table),
                },
                _ => Outcome::Success {
                    table: extraction.table,
                },
            },
            Err(e) => Self::from_error(e),
        }
    }

    /// Classify a run that yields a bare table.
    pub fn from_table(result: PipelineResult<Table>) -> Self {
        match result {
            Ok(table) => Outcome::Success { table },
            Err(e) => Self::from_error(e),
        }
    }

    /// Classify a system asset mapping run; duplicate names are advisory.
    pub fn from_cross_reference(result: PipelineResult<CrossReference>) -> Self {
        match result {
            Ok(mapping) if mapping.findings.is_empty() => Outcome::Success {
                table: mapping.table,
            },
            Ok(mapping) => Outcome::ValidationFindings {
                report: render_findings("System Asset Mapping Warnings:", &mapping.findings),
                findings: mapping.findings,
                table: Some(mapping.table),
            },
            Err(e) => Self::from_error(e),
        }
    }

    pub fn from_error(error: PipelineError) -> Self {
        match error {
            PipelineError::Extract(ExtractError::ValidationBlocked { findings, report }) => {
                Outcome::ValidationFindings {
                    findings,
                    report,
                    table: None,
                }
            }
            PipelineError::Extract(e) if e.is_structural() => Outcome::StructuralError {
                message: e.to_string(),
            },
            other => Outcome::Failure {
                message: other.to_string(),
            },
        }
    }

    /// The result table, when one was produced.
    pub fn table(&self) -> Option<&Table> {
        match self {
            Outcome::Success { table } => Some(table),
            Outcome::ValidationFindings { table, .. } => table.as_ref(),
            _ => None,
        }
    }

    pub fn findings(&self) -> &[Finding] {
        match self {
            Outcome::ValidationFindings { findings, .. } => findings,
            _ => &[],
        }
    }

    /// Diagnostic text accompanying findings.
    pub fn report(&self) -> Option<&str> {
        match self {
            Outcome::ValidationFindings { report, .. } => Some(report),
            _ => None,
        }
    }

    /// Message for runs that produced nothing.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Outcome::StructuralError { message } | Outcome::Failure { message } => Some(message),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

/// Title, one line per finding.
pub fn render_findings(title: &str, findings: &[Finding]) -> String {
    let mut lines = vec![title.to_string(), "=".repeat(title.len())];
    lines.extend(findings.iter().map(Finding::to_string));
    lines.join("\n")
}

/// Format delimiter for display
fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}

/// Read an uploaded source: the named sheet of a workbook, or delimited text.
pub fn read_upload(bytes: &[u8], sheet: &str, sink: &dyn DiagnosticSink) -> PipelineResult<Table> {
    let log = Diagnostics::new(sink, OPERATION);

    let table = if is_workbook(bytes) {
        log.info(format!("Reading workbook sheet '{}'", sheet));
        read_workbook_sheet(bytes, sheet).map_err(|e| {
            log.error(e.to_string());
            e
        })?
    } else {
        log.info("Reading delimited text");
        let parsed = parse_bytes_auto(bytes).map_err(|e| {
            log.error(e.to_string());
            e
        })?;
        log.info_indent(format!("Detected encoding: {}", parsed.encoding), 1);
        log.info_indent(
            format!("Detected separator: '{}'", format_delimiter(parsed.delimiter)),
            1,
        );
        parsed.table
    };

    log.success(format!(
        "Read {} rows, {} columns",
        table.len(),
        table.headers.len()
    ));
    Ok(table)
}

/// Run one domain extractor on an uploaded spreadsheet.
///
/// The sheet, template and equipment validator come from `options`.
pub fn run_domain(
    domain: Domain,
    bytes: &[u8],
    options: &OnboardOptions,
    sink: &dyn DiagnosticSink,
) -> PipelineResult<Extraction> {
    let source = read_upload(bytes, options.sheet_for(domain), sink)?;
    let template = options.template_path(domain);
    let namespace = options.namespace.as_str();

    let extraction = match domain {
        Domain::Facility => extract_facility(&source, template, namespace, sink)?,
        Domain::Location => extract_location(&source, template, namespace, sink)?,
        Domain::Space => extract_space(&source, template, namespace, sink)?,
        Domain::Equipment => {
            let validator = options.equipment_validator()?;
            extract_equipment(&source, template, namespace, &validator, sink)?
        }
    };

    Ok(extraction)
}

/// Append an `Asset ID` to every row of the asset sheet.
pub fn run_asset_ids(
    bytes: &[u8],
    sheet: Option<&str>,
    sink: &dyn DiagnosticSink,
) -> PipelineResult<Table> {
    let source = read_upload(bytes, sheet.unwrap_or(ASSET_LOCATION_SHEET), sink)?;
    Ok(generate_asset_ids(&source, sink)?)
}

/// Resolve `asset*` on a space export from a location export.
///
/// Both inputs are delimited text exports from the platform.
pub fn run_mapping(
    locations: &[u8],
    spaces: &[u8],
    sink: &dyn DiagnosticSink,
) -> PipelineResult<CrossReference> {
    let locations = read_upload(locations, ASSET_LOCATION_SHEET, sink)?;
    let spaces = read_upload(spaces, ASSET_LOCATION_SHEET, sink)?;
    Ok(map_system_assets(&locations, &spaces, sink)?)
}
