use chrono::NaiveDateTime;
use serde::Serialize;

use crate::schema::NA_MARKERS;

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

/// A single typed spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawValue {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl RawValue {
    /// Build a text cell, reading missing-value markers ("", "NA", "#N/A", ...) as empty.
    pub fn from_text(s: &str) -> Self {
        if NA_MARKERS.contains(&s) {
            Self::Empty
        } else {
            Self::Text(s.to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// One sheet as read from a workbook: header row plus data rows.
#[derive(Debug, Clone, Default)]
pub struct RawSheet {
    /// Where the sheet came from (file path), used in diagnostics.
    pub source: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawValue>>,
}

impl RawSheet {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at (row, col); short rows read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &RawValue {
        static EMPTY: RawValue = RawValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One row of a source "DataSheet", restricted to the relevant columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSalesRecord {
    pub company: RawValue,
    pub invoice: RawValue,
    pub date: RawValue,
    pub supplier: RawValue,
    pub sub_zone: RawValue,
    pub zone: RawValue,
    pub business_line: RawValue,
    pub product_type: RawValue,
    pub part_number: String,
    pub part_description: RawValue,
    pub family_code: RawValue,
    pub family_description: RawValue,
    pub quantity: RawValue,
    pub revenue: RawValue,
    pub year: RawValue,
    pub month: RawValue,
    pub warehouse: String,
}

impl RawSalesRecord {
    pub fn company_name(&self) -> Option<&str> {
        self.company.as_text()
    }
}

/// Attributes taken from the reference table for a final SKU.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HomologatedAttributes {
    pub brand: RawValue,
    pub active_ingredient_1: RawValue,
    pub active_ingredient_2: RawValue,
    pub unit_of_measure: RawValue,
    pub supplier_line: RawValue,
    pub macro_family: RawValue,
    pub supplier: RawValue,
}

/// A consolidated, typed sales row.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub company: RawValue,
    pub invoice: RawValue,
    pub date: NaiveDateTime,
    pub supplier: RawValue,
    pub sub_zone: RawValue,
    pub zone: RawValue,
    pub business_line: RawValue,
    pub product_type: RawValue,
    pub sku: String,
    pub product_description: RawValue,
    pub family_code: RawValue,
    pub family_description: RawValue,
    pub quantity: i64,
    pub revenue: i64,
    pub year: RawValue,
    pub month: RawValue,
    pub warehouse: String,
    pub attributes: HomologatedAttributes,
}

impl SalesRecord {
    pub fn company_name(&self) -> Option<&str> {
        self.company.as_text()
    }

    /// Cells in `schema::OUTPUT_COLUMNS` order.
    pub fn output_row(&self) -> Vec<RawValue> {
        let a = &self.attributes;
        vec![
            self.company.clone(),
            self.invoice.clone(),
            RawValue::DateTime(self.date),
            self.supplier.clone(),
            self.sub_zone.clone(),
            self.zone.clone(),
            self.business_line.clone(),
            self.product_type.clone(),
            RawValue::Text(self.sku.clone()),
            self.product_description.clone(),
            self.family_code.clone(),
            self.family_description.clone(),
            RawValue::Int(self.quantity),
            RawValue::Int(self.revenue),
            self.year.clone(),
            self.month.clone(),
            RawValue::Text(self.warehouse.clone()),
            a.brand.clone(),
            a.active_ingredient_1.clone(),
            a.active_ingredient_2.clone(),
            a.unit_of_measure.clone(),
            a.supplier_line.clone(),
            a.macro_family.clone(),
            a.supplier.clone(),
        ]
    }
}

/// One row of the reference mapping workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceRow {
    pub company_tag: RawValue,
    pub initial_sku: String,
    pub final_sku: String,
    pub attributes: HomologatedAttributes,
    pub family_description: RawValue,
}

// ---------------------------------------------------------------------------
// Load report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct LoadedSource {
    pub source: String,
    pub rows: usize,
    pub excluded: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedSource {
    pub source: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub loaded: Vec<LoadedSource>,
    pub skipped: Vec<SkippedSource>,
}

impl LoadReport {
    pub fn total_rows(&self) -> usize {
        self.loaded.iter().map(|s| s.rows).sum()
    }
}

// ---------------------------------------------------------------------------
// Run summary + outcome
// ---------------------------------------------------------------------------

/// Row and distinct-value counts observed between stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub loaded: usize,
    pub after_key_null_drop: usize,
    pub after_numeric_drop: usize,
    pub skus_remapped: usize,
    pub after_sku_remap: usize,
    pub homologation_matches: usize,
    pub after_homologation: usize,
    pub warehouses_unified: usize,
    pub after_warehouse_unify: usize,
    pub after_warehouse_filter: usize,
    pub distinct_warehouses_after_warehouse_filter: usize,
    pub distinct_skus_after_warehouse_filter: usize,
    pub after_family_filter: usize,
    pub distinct_warehouses_after_family_filter: usize,
    pub distinct_skus_after_family_filter: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    NoDataLoaded,
    NoRowsAfterFamilyFilter,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDataLoaded => write!(f, "no data loaded; check the input files"),
            Self::NoRowsAfterFamilyFilter => {
                write!(f, "no rows left after the family filter; check the filters")
            }
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Completed {
        records: Vec<SalesRecord>,
        summary: RunSummary,
    },
    Stopped {
        reason: StopReason,
        summary: RunSummary,
    },
}

impl Outcome {
    pub fn summary(&self) -> &RunSummary {
        match self {
            Self::Completed { summary, .. } | Self::Stopped { summary, .. } => summary,
        }
    }
}
