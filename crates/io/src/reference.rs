// Reference mapping workbook

use std::path::Path;

use ventas_pipeline::model::ReferenceRow;
use ventas_pipeline::reference::parse_reference;
use ventas_pipeline::PipelineError;

use crate::xlsx::read_sheet;

/// Read the first sheet of the reference workbook into mapping rows.
///
/// Any failure here is fatal for a run: an unreadable file comes back as
/// `PipelineError::Reference`, a missing column as `MissingColumn`.
pub fn read_reference(path: &Path) -> Result<Vec<ReferenceRow>, PipelineError> {
    let sheet = read_sheet(path, None)
        .map_err(|e| PipelineError::Reference(format!("{}: {}", path.display(), e)))?;
    let rows = parse_reference(&sheet)?;
    tracing::info!(file = %path.display(), rows = rows.len(), "reference mapping loaded");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;
    use ventas_pipeline::schema;
    use ventas_pipeline::RawValue;

    const HEADERS: [&str; 11] = [
        schema::REF_COMPANY,
        schema::REF_INITIAL_SKU,
        schema::REF_FINAL_SKU,
        schema::REF_BRAND,
        schema::REF_ACTIVE_INGREDIENT_1,
        schema::REF_ACTIVE_INGREDIENT_2,
        schema::REF_UNIT,
        schema::REF_SUPPLIER_LINE,
        schema::REF_MACRO_FAMILY,
        schema::REF_SUPPLIER,
        schema::REF_FAMILY_DESCRIPTION,
    ];

    #[test]
    fn test_reads_first_sheet_with_numeric_skus_as_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mapeo.xlsx");

        let mut wb = Workbook::new();
        let ws = wb.add_worksheet();
        for (col, name) in HEADERS.iter().enumerate() {
            ws.write_string(0, col as u16, *name).unwrap();
        }
        ws.write_string(1, 0, "AGRAC").unwrap();
        ws.write_number(1, 1, 1001.0).unwrap();
        ws.write_string(1, 2, "F1").unwrap();
        ws.write_string(1, 3, "MARCA").unwrap();
        ws.write_string(1, 10, "Herbicidas").unwrap();
        wb.save(&path).unwrap();

        let rows = read_reference(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].initial_sku, "1001");
        assert_eq!(rows[0].final_sku, "F1");
        assert_eq!(rows[0].attributes.brand, RawValue::from("MARCA"));
        assert_eq!(rows[0].attributes.unit_of_measure, RawValue::Empty);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mapeo.xlsx");

        let mut wb = Workbook::new();
        let ws = wb.add_worksheet();
        for (col, name) in HEADERS.iter().take(10).enumerate() {
            ws.write_string(0, col as u16, *name).unwrap();
        }
        wb.save(&path).unwrap();

        let err = read_reference(&path).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn { ref column, .. } if column == schema::REF_FAMILY_DESCRIPTION));
    }

    #[test]
    fn test_missing_file_is_reference_error() {
        let dir = tempdir().unwrap();
        let err = read_reference(&dir.path().join("no_existe.xlsx")).unwrap_err();
        assert!(matches!(err, PipelineError::Reference(_)));
    }
}
