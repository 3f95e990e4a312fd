use crate::error::PipelineError;
use crate::model::{LoadReport, LoadedSource, RawSalesRecord, RawSheet, SkippedSource};
use crate::schema::{self, EXCLUDED_ENTITY, SOURCE_COLUMNS};
use crate::text::{identifier_text, warehouse_code};

/// Anything that can produce one source sheet on demand.
///
/// Reading happens inside `load_sources`, so a source holds no open handle
/// before or after its turn.
pub trait SheetSource {
    /// Human-readable origin (usually the file path).
    fn label(&self) -> String;

    fn read(&self) -> Result<RawSheet, PipelineError>;
}

/// Pull the 17 relevant columns out of a sheet, in any header order.
///
/// Part number and warehouse code come out as text; the warehouse code
/// loses any zero fraction.
pub fn extract_records(sheet: &RawSheet) -> Result<Vec<RawSalesRecord>, PipelineError> {
    if sheet.headers.is_empty() {
        return Err(PipelineError::EmptySheet {
            source: sheet.source.clone(),
        });
    }

    let mut idx = [0usize; 17];
    for (slot, (raw, _)) in idx.iter_mut().zip(SOURCE_COLUMNS.iter()) {
        *slot = sheet.column_index(raw).ok_or_else(|| PipelineError::MissingColumn {
            source: sheet.source.clone(),
            column: (*raw).to_string(),
        })?;
    }

    let records = (0..sheet.rows.len())
        .map(|r| {
            let cell = |i: usize| sheet.cell(r, idx[i]).clone();
            RawSalesRecord {
                company: cell(0),
                invoice: cell(1),
                date: cell(2),
                supplier: cell(3),
                sub_zone: cell(4),
                zone: cell(5),
                business_line: cell(6),
                product_type: cell(7),
                part_number: identifier_text(sheet.cell(r, idx[8])),
                part_description: cell(9),
                family_code: cell(10),
                family_description: cell(11),
                quantity: cell(12),
                revenue: cell(13),
                year: cell(14),
                month: cell(15),
                warehouse: warehouse_code(sheet.cell(r, idx[16])),
            }
        })
        .collect();

    Ok(records)
}

/// Drop rows of the excluded entity. Returns the kept rows and the number removed.
pub fn exclude_entity(records: Vec<RawSalesRecord>) -> (Vec<RawSalesRecord>, usize) {
    let before = records.len();
    let kept: Vec<_> = records
        .into_iter()
        .filter(|r| r.company_name() != Some(EXCLUDED_ENTITY))
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// Read every source in order and accumulate its rows.
///
/// A source that fails to read or lacks a column is logged and skipped;
/// the remaining sources still load.
pub fn load_sources<S: SheetSource>(sources: &[S]) -> (Vec<RawSalesRecord>, LoadReport) {
    let mut all = Vec::new();
    let mut report = LoadReport::default();

    for source in sources {
        let label = source.label();
        let extracted = source.read().and_then(|sheet| extract_records(&sheet));
        match extracted {
            Ok(records) => {
                let (kept, excluded) = exclude_entity(records);
                tracing::info!(file = %label, rows = kept.len(), excluded, "file processed");
                report.loaded.push(LoadedSource {
                    source: label,
                    rows: kept.len(),
                    excluded,
                });
                all.extend(kept);
            }
            Err(e) => {
                tracing::warn!(file = %label, error = %e, "skipping file");
                report.skipped.push(SkippedSource {
                    source: label,
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        rows = all.len(),
        files = report.loaded.len(),
        skipped = report.skipped.len(),
        "initial load complete"
    );
    (all, report)
}

/// Header row of a well-formed source sheet, for fixtures and diagnostics.
pub fn source_headers() -> Vec<String> {
    schema::SOURCE_COLUMNS
        .iter()
        .map(|(raw, _)| (*raw).to_string())
        .collect()
}
