use crate::filter::{distinct_counts, filter_families, filter_warehouses, unify_warehouses};
use crate::homologate::HomologationTable;
use crate::model::{Outcome, RawSalesRecord, ReferenceRow, RunSummary, StopReason};
use crate::normalize::normalize;
use crate::remap::SkuMapping;

/// Run every stage after loading: normalize, remap AGRAC SKUs, homologate,
/// unify and filter warehouses, filter families.
///
/// Stops early (without error) when nothing was loaded or when the family
/// filter leaves no rows.
pub fn run(loaded: Vec<RawSalesRecord>, reference: &[ReferenceRow]) -> Outcome {
    let mut summary = RunSummary {
        loaded: loaded.len(),
        ..Default::default()
    };

    if loaded.is_empty() {
        tracing::warn!("no data loaded; check the input files");
        return Outcome::Stopped {
            reason: StopReason::NoDataLoaded,
            summary,
        };
    }

    let (records, counts) = normalize(loaded);
    summary.after_key_null_drop = counts.after_key_null_drop;
    summary.after_numeric_drop = counts.after_numeric_drop;

    let mapping = SkuMapping::from_reference(reference);
    let (records, remapped) = mapping.apply(records);
    summary.skus_remapped = remapped;
    summary.after_sku_remap = records.len();
    tracing::info!(rows = records.len(), remapped, mapping_entries = mapping.len(), "AGRAC SKU mapping applied");

    let table = HomologationTable::from_reference(reference);
    let (records, matched) = table.apply(records);
    summary.homologation_matches = matched;
    summary.after_homologation = records.len();
    tracing::info!(rows = records.len(), matched, "categorical attributes homologated");

    let (records, unified) = unify_warehouses(records);
    summary.warehouses_unified = unified;
    summary.after_warehouse_unify = records.len();
    tracing::info!(rows = records.len(), unified, "satellite warehouses unified");

    let records = filter_warehouses(records);
    let (warehouses, skus) = distinct_counts(&records);
    summary.after_warehouse_filter = records.len();
    summary.distinct_warehouses_after_warehouse_filter = warehouses;
    summary.distinct_skus_after_warehouse_filter = skus;
    tracing::info!(rows = records.len(), warehouses, skus, "filtered to allow-listed warehouses");

    let records = filter_families(records);
    let (warehouses, skus) = distinct_counts(&records);
    summary.after_family_filter = records.len();
    summary.distinct_warehouses_after_family_filter = warehouses;
    summary.distinct_skus_after_family_filter = skus;
    tracing::info!(rows = records.len(), warehouses, skus, "filtered to allow-listed families");

    if records.is_empty() {
        tracing::warn!("no rows left after the family filter; check the filters");
        return Outcome::Stopped {
            reason: StopReason::NoRowsAfterFamilyFilter,
            summary,
        };
    }

    Outcome::Completed { records, summary }
}
