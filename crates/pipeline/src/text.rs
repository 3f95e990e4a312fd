//! Text coercion shared by every stage: identifier formatting and the
//! label normalization used on both sides of the family filter.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::model::RawValue;

/// Uppercase, trim, and strip diacritics down to base Latin letters.
///
/// `"  herbicídas "` and `"HERBICIDAS"` normalize to the same label.
/// Compatibility forms fold too: a non-breaking space becomes a plain
/// space and `ﬁ` becomes `FI`.
pub fn normalize_label(s: &str) -> String {
    let folded: String = s.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    let upper = folded.to_uppercase();
    let mut out = String::with_capacity(upper.len());
    // Uppercasing can reintroduce marks (`ǰ` -> `J̌`).
    for c in upper.nfkd() {
        if is_combining_mark(c) {
            continue;
        }
        match transliterate(c) {
            Some(t) => out.push_str(t),
            None => out.push(c),
        }
    }
    out.trim().to_string()
}

/// Latin letters that carry no decomposable diacritic.
fn transliterate(c: char) -> Option<&'static str> {
    let t = match c {
        'Æ' => "AE",
        'Œ' => "OE",
        'Ø' => "O",
        'Đ' | 'Ð' => "D",
        'Ł' => "L",
        'Ħ' => "H",
        'Þ' => "TH",
        'ß' | 'ẞ' => "SS",
        'ı' => "I",
        _ => return None,
    };
    Some(t)
}

/// Render any cell as identifier text. Whole numbers never carry a
/// decimal part, so a numeric SKU `12345.0` becomes `"12345"`.
pub fn identifier_text(value: &RawValue) -> String {
    match value {
        RawValue::Empty => String::new(),
        RawValue::Text(s) => s.clone(),
        RawValue::Int(n) => n.to_string(),
        RawValue::Number(n) => format_number(*n),
        RawValue::Bool(b) => if *b { "True" } else { "False" }.to_string(),
        RawValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

/// Identifier text for a warehouse code, with any zero fraction removed
/// (`"5510.0"` and `5510.0` both become `"5510"`). Non-numeric text only
/// loses a literal trailing `".0"`.
pub fn warehouse_code(value: &RawValue) -> String {
    strip_zero_fraction(&identifier_text(value))
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn strip_zero_fraction(s: &str) -> String {
    if let Some((whole, frac)) = s.split_once('.') {
        let digits = !whole.is_empty() && whole.bytes().all(|b| b.is_ascii_digit());
        let zeros = !frac.is_empty() && frac.bytes().all(|b| b == b'0');
        if digits && zeros {
            return whole.to_string();
        }
    }
    s.strip_suffix(".0").unwrap_or(s).to_string()
}
