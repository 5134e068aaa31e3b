//! Spreadsheet file readers.
//!
//! Parses a CSV or Excel file and returns every row as a
//! [`serde_json::Value`] object keyed by the column headers in the first
//! row, ready for profile normalization.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{Data, Reader as _, open_workbook_auto};
use serde_json::{Map, Value};

use crate::ReadError;

/// Reads all rows from a spreadsheet file, dispatching on the extension.
///
/// Supports `.csv`, `.xlsx`, and `.xls`. Excel workbooks are read from
/// the first sheet only; both formats require a header row.
///
/// # Errors
///
/// Returns [`ReadError`] for unsupported extensions, I/O failures, or
/// unparsable content.
pub fn read_rows(path: &Path) -> Result<Vec<Value>, ReadError> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => read_csv(path),
        "xlsx" | "xls" => read_excel(path),
        _ => Err(ReadError::UnsupportedExtension { extension }),
    }
}

fn read_csv(path: &Path) -> Result<Vec<Value>, ReadError> {
    let file = File::open(path)?;
    let rows = parse_csv(file)?;
    log::debug!("read {} CSV rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parses CSV content from any reader. The first record is the header row.
///
/// # Errors
///
/// Returns [`ReadError::Csv`] if a record cannot be parsed.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Value>, ReadError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        let mut row = Map::new();
        for (header, field) in headers.iter().zip(record.iter()) {
            row.insert(header.to_string(), Value::String(field.to_string()));
        }
        rows.push(Value::Object(row));
    }

    Ok(rows)
}

fn read_excel(path: &Path) -> Result<Vec<Value>, ReadError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range_at(0).ok_or(ReadError::NoSheets)??;

    let mut sheet_rows = range.rows();
    let Some(header_cells) = sheet_rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_cells.iter().map(ToString::to_string).collect();

    let mut rows = Vec::new();
    for sheet_row in sheet_rows {
        let mut row = Map::new();
        for (header, cell) in headers.iter().zip(sheet_row.iter()) {
            if header.is_empty() {
                continue;
            }
            row.insert(header.clone(), cell_to_value(cell));
        }
        rows.push(Value::Object(row));
    }

    log::debug!("read {} Excel rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Converts one Excel cell to a JSON value.
fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Data::Int(i) => Value::Number((*i).into()),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => {
            serde_json::Number::from_f64(dt.as_f64()).map_or(Value::Null, Value::Number)
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_csv_with_arbitrary_column_order() {
        let csv = "Longitude,School Name,Latitude\n120.9842,Manila High School,14.5995\n";
        let rows = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["School Name"], "Manila High School");
        assert_eq!(rows[0]["Latitude"], "14.5995");
    }

    #[test]
    fn tolerates_short_records() {
        let csv = "a,b,c\n1,2\n";
        let rows = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows[0]["b"], "2");
        assert!(rows[0].get("c").is_none());
    }

    #[test]
    fn rejects_unsupported_extension() {
        let err = read_rows(Path::new("schools.pdf")).unwrap_err();
        assert!(matches!(
            err,
            ReadError::UnsupportedExtension { extension } if extension == "pdf"
        ));
    }

    #[test]
    fn converts_excel_cells() {
        assert_eq!(cell_to_value(&Data::String("NCR".to_string())), "NCR");
        assert_eq!(cell_to_value(&Data::Float(14.6)), serde_json::json!(14.6));
        assert_eq!(cell_to_value(&Data::Int(1)), serde_json::json!(1));
        assert_eq!(cell_to_value(&Data::Empty), Value::Null);
    }
}
