use crate::error::PipelineError;
use crate::model::{HomologatedAttributes, RawSheet, ReferenceRow};
use crate::schema::{
    REF_ACTIVE_INGREDIENT_1, REF_ACTIVE_INGREDIENT_2, REF_BRAND, REF_COMPANY,
    REF_FAMILY_DESCRIPTION, REF_FINAL_SKU, REF_INITIAL_SKU, REF_MACRO_FAMILY, REF_SUPPLIER,
    REF_SUPPLIER_LINE, REF_UNIT,
};
use crate::text::identifier_text;

const REQUIRED: [&str; 11] = [
    REF_COMPANY,
    REF_INITIAL_SKU,
    REF_FINAL_SKU,
    REF_BRAND,
    REF_ACTIVE_INGREDIENT_1,
    REF_ACTIVE_INGREDIENT_2,
    REF_UNIT,
    REF_SUPPLIER_LINE,
    REF_MACRO_FAMILY,
    REF_SUPPLIER,
    REF_FAMILY_DESCRIPTION,
];

/// Parse the reference mapping sheet. Any missing column is fatal.
pub fn parse_reference(sheet: &RawSheet) -> Result<Vec<ReferenceRow>, PipelineError> {
    let mut idx = [0usize; 11];
    for (slot, name) in idx.iter_mut().zip(REQUIRED.iter()) {
        *slot = sheet.column_index(name).ok_or_else(|| PipelineError::MissingColumn {
            source: sheet.source.clone(),
            column: (*name).to_string(),
        })?;
    }

    let rows = (0..sheet.rows.len())
        .map(|r| {
            let cell = |i: usize| sheet.cell(r, idx[i]).clone();
            ReferenceRow {
                company_tag: cell(0),
                initial_sku: identifier_text(sheet.cell(r, idx[1])),
                final_sku: identifier_text(sheet.cell(r, idx[2])),
                attributes: HomologatedAttributes {
                    brand: cell(3),
                    active_ingredient_1: cell(4),
                    active_ingredient_2: cell(5),
                    unit_of_measure: cell(6),
                    supplier_line: cell(7),
                    macro_family: cell(8),
                    supplier: cell(9),
                },
                family_description: cell(10),
            }
        })
        .collect();

    Ok(rows)
}
