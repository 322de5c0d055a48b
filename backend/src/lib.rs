//! # Onboard - facility asset spreadsheet transformer
//!
//! Onboard reshapes facility survey spreadsheets (buildings, floors, spaces,
//! equipment) into the import layout of an asset-management platform,
//! merged onto the platform's own templates.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ XLSX / CSV  │────▶│   Parser    │────▶│   Extract   │────▶│  CSV / XLSX │
//! │  (upload)   │     │ (sheet/enc) │     │ (+template) │     │  (result)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use onboard::{run_domain, ConsoleSink, Domain, OnboardOptions, Outcome};
//!
//! let bytes = std::fs::read("survey.xlsx").unwrap();
//! let options = OnboardOptions { namespace: "acme".into(), ..Default::default() };
//! let outcome = Outcome::from_extraction(run_domain(Domain::Space, &bytes, &options, &ConsoleSink));
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Tables, domains, findings
//! - [`logs`] - Diagnostic events and sinks
//! - [`parser`] - Workbook and delimited text reading
//! - [`transform`] - Asset IDs, extractors, merge, mapping, pipeline
//! - [`validation`] - Record schemas and equipment vocabulary
//! - [`output`] - CSV and XLSX rendering
//! - [`config`] - Run options
//! - [`report`] - JSON run reports

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// Output
pub mod output;
pub mod report;

// Configuration
pub mod config;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, ExtractError, ExtractResult, OutputError, OutputResult, PipelineError,
    PipelineResult, SheetError, SheetResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Domain, Finding, Row, Severity, Table};

// =============================================================================
// Re-exports - Diagnostics
// =============================================================================

pub use logs::{ConsoleSink, DiagnosticSink, LogEntry, LogLevel, MemorySink, NullSink, Tee};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_file_auto,
    read_workbook_sheet, ParseResult,
};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    extract_equipment, extract_facility, extract_location, extract_space, generate_asset_id,
    generate_asset_ids, map_system_assets, merge, shorten, AssetCounter, CrossReference,
    Extraction, TemplateSource,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{
    is_valid_record, render_report, validate, validate_record, EquipmentPolicy,
    EquipmentValidator, EquipmentVocabulary,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    read_upload, render_findings, run_asset_ids, run_domain, run_mapping,
    Outcome,
};

// =============================================================================
// Re-exports - Output, config, report
// =============================================================================

pub use config::OnboardOptions;
pub use output::{render, to_csv_bytes, to_xlsx_bytes, write_table, OutputFormat};
pub use report::{RunReport, RunStatus};
