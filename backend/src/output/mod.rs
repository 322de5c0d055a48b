//! Rendering result tables.
//!
//! - CSV: `,` separated, header line, quoting only where needed
//! - XLSX: one worksheet with a bold header row, typed cells
//!
//! Both writers follow `Table::headers` for column order and leave missing
//! cells empty.

use rust_xlsxwriter::{Format, Workbook};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{OutputError, OutputResult};
use crate::models::{cell_text, Table};

/// Largest sheet an XLSX worksheet can hold.
pub const XLSX_MAX_ROWS: usize = 1_048_576;
pub const XLSX_MAX_COLUMNS: usize = 16_384;

/// Default worksheet name when none is given.
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// File format of a rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Xlsx,
}

impl OutputFormat {
    /// Pick the format from a file extension; anything but `.xlsx` is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => OutputFormat::Xlsx,
            _ => OutputFormat::Csv,
        }
    }
}

/// Text for one CSV cell.
fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(_) => cell_text(value).unwrap_or_default(),
        other => other.to_string(),
    }
}

/// Render a table as CSV.
pub fn to_csv_bytes(table: &Table) -> OutputResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.headers)?;

    for row in &table.rows {
        let record: Vec<String> = table
            .headers
            .iter()
            .map(|h| row.get(h).map(csv_cell).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }

    writer.into_inner().map_err(|e| OutputError::Io(e.into_error()))
}

/// Render a table as a single-sheet XLSX workbook.
pub fn to_xlsx_bytes(table: &Table, sheet_name: &str) -> OutputResult<Vec<u8>> {
    if table.len() + 1 > XLSX_MAX_ROWS {
        return Err(OutputError::TooLarge {
            format: "xlsx",
            message: format!("{} rows (limit {})", table.len(), XLSX_MAX_ROWS - 1),
        });
    }
    if table.headers.len() > XLSX_MAX_COLUMNS {
        return Err(OutputError::TooLarge {
            format: "xlsx",
            message: format!("{} columns (limit {})", table.headers.len(), XLSX_MAX_COLUMNS),
        });
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name)?;

    let header_format = Format::new().set_bold();
    for (col, header) in table.headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    for (i, row) in table.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, header) in table.headers.iter().enumerate() {
            let c = col as u16;
            match row.get(header) {
                None | Some(Value::Null) => {}
                Some(Value::String(s)) => {
                    sheet.write_string(r, c, s)?;
                }
                Some(Value::Bool(b)) => {
                    sheet.write_boolean(r, c, *b)?;
                }
                Some(Value::Number(n)) => match n.as_f64() {
                    Some(f) => {
                        sheet.write_number(r, c, f)?;
                    }
                    None => {
                        sheet.write_string(r, c, n.to_string())?;
                    }
                },
                Some(other) => {
                    sheet.write_string(r, c, other.to_string())?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Render in the requested format.
pub fn render(table: &Table, format: OutputFormat, sheet_name: &str) -> OutputResult<Vec<u8>> {
    match format {
        OutputFormat::Csv => to_csv_bytes(table),
        OutputFormat::Xlsx => to_xlsx_bytes(table, sheet_name),
    }
}

/// Write a table to `path`, choosing the format from its extension.
pub fn write_table<P: AsRef<Path>>(table: &Table, path: P, sheet_name: &str) -> OutputResult<()> {
    let path = path.as_ref();
    let bytes = render(table, OutputFormat::from_path(path), sheet_name)?;
    fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::read_workbook_sheet;
    use serde_json::json;

    fn sample() -> Table {
        Table::from_cells(
            &["name*", "location.longitude", "isActive*", "note"],
            vec![
                vec![json!("Tower, A"), json!(55.5), json!(true), Value::Null],
                vec![json!("Tower B"), json!(101.0), json!(true), json!("say \"hi\"")],
            ],
        )
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("out.XLSX")), OutputFormat::Xlsx);
        assert_eq!(OutputFormat::from_path(Path::new("out.csv")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_path(Path::new("out")), OutputFormat::Csv);
    }

    #[test]
    fn test_csv_output() {
        let bytes = to_csv_bytes(&sample()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "name*,location.longitude,isActive*,note");
        assert_eq!(lines[1], "\"Tower, A\",55.5,true,");
        assert_eq!(lines[2], "Tower B,101,true,\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_csv_follows_header_order() {
        let mut table = sample();
        table.headers.reverse();
        let text = String::from_utf8(to_csv_bytes(&table).unwrap()).unwrap();
        assert!(text.starts_with("note,isActive*,location.longitude,name*\n"));
    }

    #[test]
    fn test_csv_is_deterministic() {
        assert_eq!(to_csv_bytes(&sample()).unwrap(), to_csv_bytes(&sample()).unwrap());
    }

    #[test]
    fn test_xlsx_readback() {
        let bytes = to_xlsx_bytes(&sample(), "Facility").unwrap();
        let table = read_workbook_sheet(&bytes, "Facility").unwrap();

        assert_eq!(table.headers, sample().headers);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0]["name*"], "Tower, A");
        assert_eq!(table.rows[0]["location.longitude"], json!(55.5));
        assert_eq!(table.rows[0]["isActive*"], json!(true));
        assert_eq!(table.rows[0]["note"], Value::Null);
    }

    #[test]
    fn test_write_table_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_table(&sample(), &path, DEFAULT_SHEET_NAME).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("name*,"));
    }
}
