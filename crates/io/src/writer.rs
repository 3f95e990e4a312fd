// Output dispatch by file extension

use std::path::Path;

use ventas_pipeline::SalesRecord;

use crate::{csv, xlsx};

/// Write the consolidated rows, picking the format from the extension
/// (`.xlsx`, `.csv`, `.tsv`). The parent directory is created if missing.
/// Returns the number of data rows written.
pub fn write_records(path: &Path, records: &[SalesRecord]) -> Result<usize, String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let write: fn(&[SalesRecord], &Path) -> Result<usize, String> = match ext.as_str() {
        "xlsx" => xlsx::export,
        "csv" => csv::export,
        "tsv" => csv::export_tsv,
        "" => return Err(format!("output file '{}' has no extension (use .xlsx or .csv)", path.display())),
        other => return Err(format!("unsupported output format '.{}' (use .xlsx or .csv)", other)),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create output directory '{}': {}", parent.display(), e))?;
    }

    let rows = write(records, path)?;
    tracing::info!(file = %path.display(), rows, "output written");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_creates_missing_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("salida").join("anidada").join("datos.csv");
        assert_eq!(write_records(&path, &[]).unwrap(), 0);
        assert!(path.exists());
    }

    #[test]
    fn test_xlsx_by_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("datos.xlsx");
        write_records(&path, &[]).unwrap();
        let sheet = xlsx::read_sheet(&path, None).unwrap();
        assert_eq!(sheet.headers.len(), ventas_pipeline::schema::OUTPUT_COLUMNS.len());
    }

    #[test]
    fn test_unknown_extension_rejected_before_writing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nuevo").join("datos.json");
        let err = write_records(&path, &[]).unwrap_err();
        assert!(err.contains(".json"), "got: {err}");
        assert!(!dir.path().join("nuevo").exists());
    }
}
