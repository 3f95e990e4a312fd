// Excel import (xlsx, xls, xlsb, ods) into raw sheets, and xlsx export of
// consolidated rows.
//
// Import keeps cells typed: numbers stay numbers and date cells become
// timestamps. Column selection and coercion belong to the pipeline.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::{NaiveDate, NaiveDateTime};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};
use ventas_pipeline::normalize::excel_serial_to_datetime;
use ventas_pipeline::schema::{COL_DATE, OUTPUT_COLUMNS};
use ventas_pipeline::text::identifier_text;
use ventas_pipeline::{PipelineError, RawSheet, RawValue, SalesRecord, SheetSource};

/// Number format applied to timestamp cells on export.
pub const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Column width used for the date column so timestamps render in full.
const DATE_COLUMN_WIDTH: f64 = 20.0;

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Read one worksheet into a `RawSheet`: the first row becomes the headers,
/// every later row is kept as typed cells.
///
/// `sheet_name` of `None` reads the first sheet in the workbook.
pub fn read_sheet(path: &Path, sheet_name: Option<&str>) -> Result<RawSheet, String> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file: {}", e))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let name = match sheet_name {
        Some(wanted) => sheet_names
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| format!("sheet '{}' not found", wanted))?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| "Excel file contains no sheets".to_string())?,
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| format!("Failed to read sheet '{}': {}", name, e))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| identifier_text(&cell_value(cell)))
            .collect(),
        None => Vec::new(),
    };

    let rows: Vec<Vec<RawValue>> = rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    tracing::debug!(
        file = %path.display(),
        sheet = %name,
        columns = headers.len(),
        rows = rows.len(),
        "sheet read"
    );

    Ok(RawSheet {
        source: path.display().to_string(),
        headers,
        rows,
    })
}

/// Map a calamine cell onto the pipeline's cell type.
fn cell_value(cell: &Data) -> RawValue {
    match cell {
        Data::Empty => RawValue::Empty,
        Data::String(s) => RawValue::from_text(s),
        Data::Float(n) => RawValue::Number(*n),
        Data::Int(n) => RawValue::Int(*n),
        Data::Bool(b) => RawValue::Bool(*b),
        // "#N/A" and friends read as missing, the rest as their error text
        Data::Error(e) => RawValue::from_text(&e.to_string()),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            match excel_serial_to_datetime(serial) {
                Some(ts) => RawValue::DateTime(ts),
                None => RawValue::Number(serial),
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawValue::from_text(s),
    }
}

/// One source workbook, read from a named sheet.
#[derive(Debug, Clone)]
pub struct XlsxSource {
    pub path: PathBuf,
    pub sheet: String,
}

impl XlsxSource {
    pub fn new(path: impl Into<PathBuf>, sheet: &str) -> Self {
        Self {
            path: path.into(),
            sheet: sheet.to_string(),
        }
    }
}

impl SheetSource for XlsxSource {
    fn label(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<RawSheet, PipelineError> {
        read_sheet(&self.path, Some(&self.sheet)).map_err(|message| PipelineError::SourceRead {
            source: self.label(),
            message,
        })
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Timestamp to Excel 1900-system serial (inverse of `excel_serial_to_datetime`).
fn datetime_to_excel_serial(ts: NaiveDateTime) -> Option<f64> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (ts - epoch).num_milliseconds() as f64;
    let serial = millis / 86_400_000.0;
    // Excel counts a 1900-02-29 that never existed.
    Some(if serial < 61.0 { serial - 1.0 } else { serial })
}

/// Write the consolidated rows to a single-sheet workbook: header row of
/// output column names, then one row per record. No index column.
pub fn export(records: &[SalesRecord], path: &Path) -> Result<usize, String> {
    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook.add_worksheet();

    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    for (col, name) in OUTPUT_COLUMNS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *name, &header_format)
            .map_err(|e| format!("Failed to write header '{}': {}", name, e))?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = (idx + 1) as u32;
        for (col, value) in record.output_row().iter().enumerate() {
            let col = col as u16;
            let written = match value {
                RawValue::Empty => Ok(()),
                RawValue::Text(s) => worksheet.write_string(row, col, s).map(|_| ()),
                RawValue::Int(n) => worksheet.write_number(row, col, *n as f64).map(|_| ()),
                RawValue::Number(n) if n.is_finite() => {
                    worksheet.write_number(row, col, *n).map(|_| ())
                }
                RawValue::Number(_) => Ok(()),
                RawValue::Bool(b) => worksheet.write_boolean(row, col, *b).map(|_| ()),
                RawValue::DateTime(ts) => match datetime_to_excel_serial(*ts) {
                    Some(serial) => worksheet
                        .write_number_with_format(row, col, serial, &date_format)
                        .map(|_| ()),
                    None => worksheet.write_string(row, col, ts.to_string()).map(|_| ()),
                },
            };
            written.map_err(|e| format!("Failed to write cell ({}, {}): {}", row, col, e))?;
        }
    }

    if let Some(date_col) = OUTPUT_COLUMNS.iter().position(|c| *c == COL_DATE.1) {
        worksheet
            .set_column_width(date_col as u16, DATE_COLUMN_WIDTH)
            .map_err(|e| format!("Failed to size date column: {}", e))?;
    }

    workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))?;

    Ok(records.len())
}
