use calamine::Data;
use once_cell::sync::Lazy;
use regex::Regex;

use super::types::CellValue;

// Optional sign and currency sign, an integer part that is either plain digits or
// comma-grouped thousands, an optional fraction and an optional exponent.
static NUMERIC_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?\$?(?P<int>\d{1,3}(?:,\d{3})+|\d*)(?P<frac>\.\d*)?(?:[eE][+-]?\d+)?$")
        .expect("numeric text pattern is valid")
});

pub fn to_cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            CellValue::Text(s.clone())
        }
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => CellValue::Text(e.to_string()),
        // Serial dates are not quantities.
        Data::DateTime(_) => CellValue::Empty,
        Data::Empty => CellValue::Empty,
    }
}

/// The number a cell contributes to an aggregate, if any.
pub fn numeric_value(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(v) if v.is_finite() => Some(*v),
        CellValue::Number(_) | CellValue::Empty => None,
        CellValue::Text(s) => parse_numeric_text(s),
    }
}

pub fn parse_numeric_text(text: &str) -> Option<f64> {
    let text = text.trim();
    let caps = NUMERIC_TEXT.captures(text)?;

    let int_digits = caps.name("int").map_or(false, |m| !m.as_str().is_empty());
    let frac_digits = caps.name("frac").map_or(false, |m| m.as_str().len() > 1);
    if !int_digits && !frac_digits {
        return None;
    }

    let cleaned: String = text.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase()
}
