//! Sheet reader: uploaded bytes to [`Table`].
//!
//! Two input kinds are accepted:
//!
//! - XLSX workbooks (read with `calamine`), addressed by sheet name
//! - delimited text with encoding and delimiter auto-detection
//!
//! Blank cells become `null`. No domain-specific logic here.

use calamine::{Data, Reader, Xlsx};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::path::Path;

use crate::error::{SheetError, SheetResult};
use crate::models::{Row, Table};

/// Result of parsing delimited text with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed rows
    pub table: Table,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
}

// =============================================================================
// Delimited text
// =============================================================================

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> SheetResult<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8(bytes.to_vec()).map_err(|e| {
            SheetError::Encoding {
                encoding: encoding.to_string(),
                message: e.to_string(),
            }
        })?,
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.into_owned()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };

    Ok(match decoded.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    })
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// Falls back to `,` when the header has a single column.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse delimited text with an explicit delimiter.
///
/// The first record is the header. Short records are padded with `null`,
/// extra cells are ignored.
pub fn parse_delimited(content: &str, delimiter: char) -> SheetResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let header_record = reader.headers().map_err(csv_error)?.clone();
    if header_record.iter().all(|h| h.trim().is_empty()) {
        return Err(SheetError::Empty);
    }
    let headers = normalize_headers(header_record.iter().map(str::to_string).collect());

    let mut table = Table::new(headers);
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let mut row = Row::new();
        for (i, header) in table.headers.iter().enumerate() {
            let value = match record.get(i) {
                Some(raw) if !raw.trim().is_empty() => Value::String(raw.to_string()),
                _ => Value::Null,
            };
            row.insert(header.clone(), value);
        }
        table.rows.push(row);
    }

    Ok(table)
}

fn csv_error(e: csv::Error) -> SheetError {
    let line = e.position().map(|p| p.line()).unwrap_or(0);
    SheetError::Parse {
        line,
        message: e.to_string(),
    }
}

/// Parse delimited bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> SheetResult<ParseResult> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(SheetError::Empty);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);
    let table = parse_delimited(&content, delimiter)?;

    Ok(ParseResult {
        table,
        encoding,
        delimiter,
    })
}

/// Parse a delimited file with auto-detection.
pub fn parse_file_auto<P: AsRef<Path>>(path: P) -> SheetResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}

// =============================================================================
// Workbooks
// =============================================================================

/// True when the bytes look like a zip container (XLSX).
pub fn is_workbook(bytes: &[u8]) -> bool {
    bytes.starts_with(b"PK\x03\x04")
}

/// Read one sheet of an XLSX workbook held in memory.
///
/// Fully blank rows are skipped, as spreadsheet exports routinely carry them.
pub fn read_workbook_sheet(bytes: &[u8], sheet: &str) -> SheetResult<Table> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| SheetError::Workbook(e.to_string()))?;

    let available = workbook.sheet_names();
    if !available.iter().any(|name| name == sheet) {
        return Err(SheetError::SheetNotFound {
            sheet: sheet.to_string(),
            available,
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| SheetError::Workbook(e.to_string()))?;

    let mut rows = range.rows();
    let header = rows.next().ok_or(SheetError::Empty)?;
    let headers = normalize_headers(
        header
            .iter()
            .map(|cell| match cell_value(cell) {
                Value::Null => String::new(),
                Value::String(s) => s,
                other => crate::models::cell_text(&other).unwrap_or_default(),
            })
            .collect(),
    );

    let mut table = Table::new(headers);
    for cells in rows {
        if cells.iter().all(|c| matches!(cell_value(c), Value::Null)) {
            continue;
        }
        let mut row = Row::new();
        for (i, header) in table.headers.iter().enumerate() {
            let value = cells.get(i).map(cell_value).unwrap_or(Value::Null);
            row.insert(header.clone(), value);
        }
        table.rows.push(row);
    }

    Ok(table)
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) if s.trim().is_empty() => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Data::Bool(b) => Value::Bool(*b),
        other => Value::String(other.to_string()),
    }
}

/// Trim headers, name blank ones `Unnamed: N` and suffix repeats `.1`, `.2`,
/// skipping suffixed names the sheet already uses.
fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut repeats: HashMap<String, usize> = HashMap::new();
    raw.into_iter()
        .enumerate()
        .map(|(i, h)| {
            let base = match h.trim() {
                "" => format!("Unnamed: {}", i),
                trimmed => trimmed.to_string(),
            };
            let mut name = base.clone();
            while taken.contains(&name) {
                let count = repeats.entry(base.clone()).or_insert(0);
                *count += 1;
                name = format!("{}.{}", base, count);
            }
            taken.insert(name.clone());
            name
        })
        .collect()
}
