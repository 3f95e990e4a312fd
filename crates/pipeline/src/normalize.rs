use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

use crate::model::{HomologatedAttributes, RawSalesRecord, RawValue, SalesRecord};
use crate::text::{identifier_text, warehouse_code};

/// Row counts reported by the normalizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeCounts {
    pub after_key_null_drop: usize,
    pub after_numeric_drop: usize,
}

/// Largest serial Excel can display (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M",
];

// Month-first before day-first: "05/03/2024" reads as May 3rd, while
// "25/03/2024" only parses day-first.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%d-%m-%Y"];

/// Convert an Excel 1900-system serial date to a timestamp.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 || serial >= MAX_EXCEL_SERIAL + 1.0 {
        return None;
    }
    // Serials below 60 predate Excel's phantom 1900-02-29.
    let epoch = if serial < 60.0 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let days = serial.floor();
    let seconds = ((serial - days) * 86_400.0).round() as i64;
    epoch
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::days(days as i64))?
        .checked_add_signed(Duration::seconds(seconds))
}

/// Parse a date cell. Anything unrecognizable is `None`, never an error.
pub fn parse_date(value: &RawValue) -> Option<NaiveDateTime> {
    match value {
        RawValue::DateTime(dt) => Some(*dt),
        RawValue::Number(n) => excel_serial_to_datetime(*n),
        RawValue::Int(n) => excel_serial_to_datetime(*n as f64),
        RawValue::Text(s) => parse_date_text(s.trim()),
        RawValue::Empty | RawValue::Bool(_) => None,
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    // Zoned timestamps keep the wall-clock time as written.
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Integer coercion for quantity and revenue. Values that are present but
/// not numeric become 0; fractions truncate toward zero.
pub fn coerce_integer(value: &RawValue) -> i64 {
    match value {
        RawValue::Int(n) => *n,
        RawValue::Number(n) => truncate(*n),
        RawValue::Text(s) => s.trim().parse::<f64>().map(truncate).unwrap_or(0),
        RawValue::Bool(b) => i64::from(*b),
        RawValue::Empty | RawValue::DateTime(_) => 0,
    }
}

fn truncate(n: f64) -> i64 {
    if n.is_finite() {
        n.trunc() as i64
    } else {
        0
    }
}

/// Rename, type, clean and sort the loaded rows.
///
/// Rows missing a date (or with an unparseable one), a quantity or a
/// revenue are dropped before numeric coercion; the survivors are sorted by
/// date with ties kept in load order.
pub fn normalize(records: Vec<RawSalesRecord>) -> (Vec<SalesRecord>, NormalizeCounts) {
    let mut out: Vec<SalesRecord> = Vec::with_capacity(records.len());

    for raw in records {
        let Some(date) = parse_date(&raw.date) else {
            continue;
        };
        if raw.quantity.is_null() || raw.revenue.is_null() {
            continue;
        }

        out.push(SalesRecord {
            sku: identifier_text(&RawValue::Text(raw.part_number)),
            warehouse: warehouse_code(&RawValue::Text(raw.warehouse)),
            quantity: coerce_integer(&raw.quantity),
            revenue: coerce_integer(&raw.revenue),
            company: raw.company,
            invoice: raw.invoice,
            date,
            supplier: raw.supplier,
            sub_zone: raw.sub_zone,
            zone: raw.zone,
            business_line: raw.business_line,
            product_type: raw.product_type,
            product_description: raw.part_description,
            family_code: raw.family_code,
            family_description: raw.family_description,
            year: raw.year,
            month: raw.month,
            attributes: HomologatedAttributes::default(),
        });
    }

    let after_key_null_drop = out.len();
    tracing::info!(rows = after_key_null_drop, "dropped rows with missing date, quantity or revenue");

    // Quantity and revenue are plain integers from here on, so the second
    // null pass has nothing left to remove.
    let after_numeric_drop = out.len();
    tracing::info!(rows = after_numeric_drop, "numeric columns coerced");

    out.sort_by_key(|r| r.date);

    (
        out,
        NormalizeCounts {
            after_key_null_drop,
            after_numeric_drop,
        },
    )
}
