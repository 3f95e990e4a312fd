use std::collections::HashMap;

use crate::model::{ReferenceRow, SalesRecord};
use crate::schema::{REMAP_COMPANY_TAG, REMAP_ENTITIES};

/// Initial -> final SKU lookup for the AGRAC company tag.
#[derive(Debug, Clone, Default)]
pub struct SkuMapping {
    map: HashMap<String, String>,
}

impl SkuMapping {
    /// Build from reference rows tagged AGRAC. A repeated initial SKU keeps
    /// the last final SKU seen. Rows with a blank initial or final SKU are
    /// skipped before that rule applies, so `[X -> F1, X -> ""]` maps `X`
    /// to `F1` rather than clearing it.
    pub fn from_reference(rows: &[ReferenceRow]) -> Self {
        let mut map = HashMap::new();
        for row in rows {
            if row.company_tag.as_text() != Some(REMAP_COMPANY_TAG) {
                continue;
            }
            if row.initial_sku.is_empty() || row.final_sku.is_empty() {
                continue;
            }
            map.insert(row.initial_sku.clone(), row.final_sku.clone());
        }
        Self { map }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, initial: &str) -> Option<&str> {
        self.map.get(initial).map(String::as_str)
    }

    /// Rewrite SKUs of the AGRAC/AGSE entities; every other row is left
    /// alone even when its SKU is a mapping key. Returns the rows and how
    /// many SKUs changed.
    pub fn apply(&self, records: Vec<SalesRecord>) -> (Vec<SalesRecord>, usize) {
        let mut remapped = 0;
        let out = records
            .into_iter()
            .map(|mut r| {
                let eligible = r
                    .company_name()
                    .is_some_and(|name| REMAP_ENTITIES.contains(&name));
                if eligible {
                    if let Some(target) = self.map.get(&r.sku) {
                        if *target != r.sku {
                            remapped += 1;
                        }
                        r.sku = target.clone();
                    }
                }
                r
            })
            .collect();
        (out, remapped)
    }
}
