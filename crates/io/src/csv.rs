// CSV export of consolidated rows

use std::path::Path;

use ventas_pipeline::schema::OUTPUT_COLUMNS;
use ventas_pipeline::text::identifier_text;
use ventas_pipeline::{RawValue, SalesRecord};

pub fn export(records: &[SalesRecord], path: &Path) -> Result<usize, String> {
    export_with_delimiter(records, path, b',')
}

pub fn export_tsv(records: &[SalesRecord], path: &Path) -> Result<usize, String> {
    export_with_delimiter(records, path, b'\t')
}

/// Text form of a cell. Whole numbers print without a decimal part and
/// timestamps as `YYYY-MM-DD HH:MM:SS`; NaN prints empty.
fn field(value: &RawValue) -> String {
    match value {
        RawValue::Number(n) if n.is_nan() => String::new(),
        other => identifier_text(other),
    }
}

fn export_with_delimiter(records: &[SalesRecord], path: &Path, delimiter: u8) -> Result<usize, String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| e.to_string())?;

    writer.write_record(OUTPUT_COLUMNS).map_err(|e| e.to_string())?;

    for record in records {
        let row: Vec<String> = record.output_row().iter().map(field).collect();
        writer.write_record(&row).map_err(|e| e.to_string())?;
    }

    writer.flush().map_err(|e| e.to_string())?;
    Ok(records.len())
}
