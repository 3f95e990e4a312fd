use std::collections::HashSet;

use crate::model::{RawValue, SalesRecord};
use crate::schema::{FAMILY_ALLOW_LIST, WAREHOUSE_ALLOW_LIST, WAREHOUSE_REMAP};
use crate::text::{normalize_label, warehouse_code};

// ---------------------------------------------------------------------------
// Warehouses
// ---------------------------------------------------------------------------

fn canonical_warehouse(code: &str) -> Option<&'static str> {
    WAREHOUSE_REMAP
        .iter()
        .find(|(satellite, _)| *satellite == code)
        .map(|(_, canonical)| *canonical)
}

/// Fold satellite warehouses into their canonical code. Returns the rows
/// and how many codes changed.
pub fn unify_warehouses(records: Vec<SalesRecord>) -> (Vec<SalesRecord>, usize) {
    let mut changed = 0;
    let out = records
        .into_iter()
        .map(|mut r| {
            if let Some(canonical) = canonical_warehouse(&r.warehouse) {
                r.warehouse = canonical.to_string();
                changed += 1;
            }
            r.warehouse = warehouse_code(&RawValue::Text(r.warehouse));
            r
        })
        .collect();
    (out, changed)
}

/// Keep rows whose warehouse code is allow-listed.
pub fn filter_warehouses(records: Vec<SalesRecord>) -> Vec<SalesRecord> {
    records
        .into_iter()
        .filter(|r| WAREHOUSE_ALLOW_LIST.contains(&r.warehouse.as_str()))
        .collect()
}

// ---------------------------------------------------------------------------
// Families
// ---------------------------------------------------------------------------

/// The family allow-list, normalized the same way descriptions are.
pub fn normalized_family_allow_list() -> HashSet<String> {
    FAMILY_ALLOW_LIST.iter().map(|f| normalize_label(f)).collect()
}

/// Rewrite text family descriptions to their normalized label; other cell
/// kinds pass through untouched.
pub fn normalize_family_descriptions(records: Vec<SalesRecord>) -> Vec<SalesRecord> {
    records
        .into_iter()
        .map(|mut r| {
            if let RawValue::Text(s) = &r.family_description {
                r.family_description = RawValue::Text(normalize_label(s));
            }
            r
        })
        .collect()
}

/// Normalize family descriptions, then keep rows whose description is one
/// of the allow-listed families.
pub fn filter_families(records: Vec<SalesRecord>) -> Vec<SalesRecord> {
    let allowed = normalized_family_allow_list();
    normalize_family_descriptions(records)
        .into_iter()
        .filter(|r| match &r.family_description {
            RawValue::Text(s) => allowed.contains(s),
            _ => false,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Audit counts
// ---------------------------------------------------------------------------

/// Distinct (warehouse codes, SKUs) across the rows.
pub fn distinct_counts(records: &[SalesRecord]) -> (usize, usize) {
    let warehouses: HashSet<&str> = records.iter().map(|r| r.warehouse.as_str()).collect();
    let skus: HashSet<&str> = records.iter().map(|r| r.sku.as_str()).collect();
    (warehouses.len(), skus.len())
}
