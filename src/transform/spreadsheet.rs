//! Spreadsheet ↔ CSV.
//!
//! Reading goes through `calamine`, which sniffs xlsx/xlsm/xlsb/xls/ods from
//! the bytes; writing goes through `rust_xlsxwriter`. Only the first sheet
//! is read, and the first row is always the header. No index column is
//! added in either direction.

use crate::conversion::ConversionId;
use crate::error::TransformError;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::Workbook;
use std::io::Cursor;
use tracing::debug;

/// `spreadsheet->csv`
pub fn spreadsheet_to_csv(input: &[u8]) -> Result<Vec<u8>, TransformError> {
    const ID: ConversionId = ConversionId::SpreadsheetToCsv;

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(input.to_vec()))
        .map_err(|e| TransformError::decode(ID, format!("not a readable spreadsheet: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TransformError::decode(ID, "workbook has no sheets"))?
        .map_err(|e| TransformError::decode(ID, format!("cannot read first sheet: {e}")))?;

    let (rows, cols) = range.get_size();
    debug!("First sheet is {}x{}", rows, cols);

    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in range.rows() {
        writer
            .write_record(row.iter().map(cell_text))
            .map_err(|e| TransformError::encode(ID, format!("cannot write CSV: {e}")))?;
    }
    writer
        .into_inner()
        .map_err(|e| TransformError::encode(ID, format!("cannot flush CSV: {e}")))
}

/// CSV form of one cell. Dates and booleans follow the spelling spreadsheet
/// users expect (`2024-01-15 00:00:00`, `True`) rather than raw serials.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(d) => match d.as_datetime() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => d.as_f64().to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `csv->spreadsheet`
pub fn csv_to_spreadsheet(input: &[u8]) -> Result<Vec<u8>, TransformError> {
    const ID: ConversionId = ConversionId::CsvToSpreadsheet;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(input);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let mut rows: u32 = 0;

    for record in reader.records() {
        let record = record.map_err(|e| csv_error(ID, e))?;
        for (col, field) in record.iter().enumerate() {
            let col = u16::try_from(col)
                .map_err(|_| TransformError::encode(ID, "too many columns for a worksheet"))?;
            let written = if rows == 0 {
                sheet.write_string(rows, col, field).map(|_| ())
            } else if field.is_empty() {
                Ok(())
            } else if let Some(n) = parse_number(field) {
                sheet.write_number(rows, col, n).map(|_| ())
            } else {
                sheet.write_string(rows, col, field).map(|_| ())
            };
            written.map_err(|e| TransformError::encode(ID, format!("cannot write cell: {e}")))?;
        }
        rows = rows
            .checked_add(1)
            .ok_or_else(|| TransformError::encode(ID, "too many rows for a worksheet"))?;
    }

    if rows == 0 {
        return Err(TransformError::decode(ID, "No columns to parse from file"));
    }
    debug!("CSV produced {} rows", rows);

    workbook
        .save_to_buffer()
        .map_err(|e| TransformError::encode(ID, format!("cannot write .xlsx: {e}")))
}

fn parse_number(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn csv_error(conversion: ConversionId, e: csv::Error) -> TransformError {
    match e.kind() {
        csv::ErrorKind::Utf8 { .. } => {
            TransformError::encoding(conversion, format!("CSV is not valid UTF-8: {e}"))
        }
        _ => TransformError::decode(conversion, format!("cannot parse CSV: {e}")),
    }
}
