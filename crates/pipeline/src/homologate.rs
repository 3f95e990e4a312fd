use std::collections::HashMap;

use crate::model::{HomologatedAttributes, RawValue, ReferenceRow, SalesRecord};

#[derive(Debug, Clone)]
struct Entry {
    attributes: HomologatedAttributes,
    family_description: RawValue,
}

/// Canonical attributes keyed by final SKU.
#[derive(Debug, Clone, Default)]
pub struct HomologationTable {
    by_sku: HashMap<String, Entry>,
}

impl HomologationTable {
    /// One entry per final SKU; the first reference row for a SKU wins.
    pub fn from_reference(rows: &[ReferenceRow]) -> Self {
        let mut by_sku = HashMap::new();
        for row in rows {
            if row.final_sku.is_empty() {
                continue;
            }
            by_sku.entry(row.final_sku.clone()).or_insert_with(|| Entry {
                attributes: row.attributes.clone(),
                family_description: row.family_description.clone(),
            });
        }
        Self { by_sku }
    }

    pub fn len(&self) -> usize {
        self.by_sku.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_sku.is_empty()
    }

    pub fn contains(&self, sku: &str) -> bool {
        self.by_sku.contains_key(sku)
    }

    /// Left join on exact SKU text. Every row survives; unmatched rows get
    /// empty attributes and an empty family description. Returns the rows
    /// and the number that matched.
    pub fn apply(&self, records: Vec<SalesRecord>) -> (Vec<SalesRecord>, usize) {
        let mut matched = 0;
        let out = records
            .into_iter()
            .map(|mut r| {
                match self.by_sku.get(&r.sku) {
                    Some(entry) => {
                        matched += 1;
                        r.attributes = entry.attributes.clone();
                        r.family_description = entry.family_description.clone();
                    }
                    None => {
                        r.attributes = HomologatedAttributes::default();
                        r.family_description = RawValue::Empty;
                    }
                }
                r
            })
            .collect();
        (out, matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remap::tests::{record, reference};

    fn with_attrs(final_sku: &str, brand: &str, family: &str) -> ReferenceRow {
        let mut row = reference("AGRAC", "X", final_sku);
        row.attributes.brand = brand.into();
        row.family_description = family.into();
        row
    }

    #[test]
    fn first_reference_row_wins() {
        let table = HomologationTable::from_reference(&[
            with_attrs("F1", "PRIMERA", "HERBICIDAS"),
            with_attrs("F1", "SEGUNDA", "FUNGICIDAS"),
        ]);
        assert_eq!(table.len(), 1);
        let (out, matched) = table.apply(vec![record("IFRS Otra", "F1")]);
        assert_eq!(matched, 1);
        assert_eq!(out[0].attributes.brand, RawValue::from("PRIMERA"));
        assert_eq!(out[0].family_description, RawValue::from("HERBICIDAS"));
    }

    #[test]
    fn unmatched_rows_kept_with_empty_attributes() {
        let table = HomologationTable::from_reference(&[with_attrs("F1", "M", "HERBICIDAS")]);
        let (out, matched) = table.apply(vec![record("IFRS Otra", "NOPE"), record("IFRS Otra", "F1")]);
        assert_eq!(out.len(), 2);
        assert_eq!(matched, 1);
        assert_eq!(out[0].attributes, HomologatedAttributes::default());
        assert_eq!(out[0].family_description, RawValue::Empty);
    }

    #[test]
    fn key_match_is_exact() {
        let table = HomologationTable::from_reference(&[with_attrs("F1", "M", "HERBICIDAS")]);
        let (_, matched) = table.apply(vec![record("IFRS Otra", "f1"), record("IFRS Otra", " F1")]);
        assert_eq!(matched, 0);
    }
}
