//! Error types for the onboarding pipeline.
//!
//! - [`SheetError`] - reading workbooks and delimited text
//! - [`ExtractError`] - domain extraction, identifier generation, mapping
//! - [`OutputError`] - rendering result tables
//! - [`ConfigError`] - options and vocabulary loading
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Conversions are provided via `From` so `?` works across layers.

use thiserror::Error;

use crate::models::{Domain, Finding};

// =============================================================================
// Sheet Reading Errors
// =============================================================================

/// Errors while turning uploaded bytes into a table.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The workbook could not be opened.
    #[error("Cannot open workbook: {0}")]
    Workbook(String),

    /// The requested sheet does not exist.
    #[error("Sheet '{sheet}' not found (available: {})", .available.join(", "))]
    SheetNotFound { sheet: String, available: Vec<String> },

    /// Text could not be decoded.
    #[error("Failed to decode text as {encoding}: {message}")]
    Encoding { encoding: String, message: String },

    /// Delimited text is malformed.
    #[error("Invalid delimited text at line {line}: {message}")]
    Parse { line: u64, message: String },

    /// Nothing to read.
    #[error("Input has no header row")]
    Empty,
}

// =============================================================================
// Extraction Errors
// =============================================================================

/// Errors raised by the extractors, the identifier generator and the mapper.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// One or more required source columns are absent.
    #[error("{operation}: missing required columns: {}", .columns.join(", "))]
    MissingColumns {
        operation: &'static str,
        columns: Vec<String>,
    },

    /// Namespace was empty or blank.
    #[error("Namespace is required")]
    EmptyNamespace,

    /// A built record does not match its domain schema.
    #[error("{domain} record {row} is invalid: {}", .errors.join("; "))]
    InvalidRecord {
        domain: Domain,
        row: usize,
        errors: Vec<String>,
    },

    /// Blocking equipment validation rejected the input.
    #[error("Equipment validation failed with {} finding(s)", .findings.len())]
    ValidationBlocked { findings: Vec<Finding>, report: String },

    /// Template could not be loaded.
    #[error("Template error: {0}")]
    Template(#[from] SheetError),
}

impl ExtractError {
    /// Structural errors are caused by the shape of the input, not its content.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ExtractError::MissingColumns { .. }
                | ExtractError::EmptyNamespace
                | ExtractError::InvalidRecord { .. }
        )
    }
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while rendering a table.
#[derive(Debug, Error)]
pub enum OutputError {
    /// CSV writer failure.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// XLSX writer failure.
    #[error("XLSX write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// IO error.
    #[error("Output IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Table is too large for the target format.
    #[error("Table too large for {format}: {message}")]
    TooLarge {
        format: &'static str,
        message: String,
    },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading options or vocabularies.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Unknown equipment policy string.
    #[error("Unknown equipment policy '{0}' (expected 'warn' or 'block')")]
    UnknownPolicy(String),

    /// Vocabulary file could not be read.
    #[error("Cannot read vocabulary file: {0}")]
    Io(#[from] std::io::Error),

    /// Vocabulary file is not valid JSON of the expected shape.
    #[error("Invalid vocabulary file: {0}")]
    Json(#[from] serde_json::Error),

    /// Vocabulary has no entries for a field.
    #[error("Vocabulary has no {0}")]
    EmptyVocabulary(&'static str),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level errors returned by [`crate::transform::pipeline`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reading the source failed.
    #[error("Source error: {0}")]
    Sheet(#[from] SheetError),

    /// Extraction failed.
    #[error("{0}")]
    Extract(#[from] ExtractError),

    /// Configuration failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for sheet reading.
pub type SheetResult<T> = Result<T, SheetError>;

/// Result type for extraction.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Result type for output rendering.
pub type OutputResult<T> = Result<T, OutputError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
