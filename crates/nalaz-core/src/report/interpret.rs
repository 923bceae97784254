//! Interpreters turning raw captured strings into typed values and
//! reference ranges.
//!
//! Every function here is total: malformed input yields `Absent`/`None`
//! rather than an error, because the source text is untrusted.

use lazy_static::lazy_static;
use regex::Regex;

use super::patterns::{NUM, QUAL};
use crate::models::record::{Reference, Value};

lazy_static! {
    static ref NUMERIC_FULL: Regex = Regex::new(&format!(r"^{num}$", num = NUM)).unwrap();
    static ref QUAL_FULL: Regex = Regex::new(&format!(r"(?i)^{qual}$", qual = QUAL)).unwrap();
    static ref RANGE_FULL: Regex =
        Regex::new(&format!(r"^({num})\s*[~\-]\s*({num})$", num = NUM)).unwrap();
    static ref LESS_FULL: Regex = Regex::new(&format!(r"^<\s*({num})$", num = NUM)).unwrap();
    static ref GREATER_FULL: Regex = Regex::new(&format!(r"^>\s*({num})$", num = NUM)).unwrap();
}

/// Parse a number with either `.` or `,` as the decimal separator.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().replace(',', ".").parse().ok()
}

/// Whether the string is exactly one of the fixed qualitative tokens.
pub fn is_qualitative_token(raw: &str) -> bool {
    QUAL_FULL.is_match(raw.trim())
}

/// Interpret a raw value string as numeric, qualitative, or absent.
pub fn parse_value(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.is_empty() {
        return Value::Absent;
    }

    if NUMERIC_FULL.is_match(raw) {
        return match parse_number(raw) {
            Some(v) => Value::Numeric(v),
            None => Value::Absent,
        };
    }

    if QUAL_FULL.is_match(raw) {
        return Value::Qualitative(raw.to_string());
    }

    Value::Absent
}

/// Interpret a raw reference string.
///
/// Recognized forms, in priority order: two-number range (`-` or `~`),
/// `<n`, `>n`, qualitative expectation. Anything else is `Reference::None`.
pub fn parse_reference(raw: &str) -> Reference {
    let raw = raw.trim();
    if raw.is_empty() {
        return Reference::None;
    }

    if let Some(caps) = RANGE_FULL.captures(raw) {
        if let (Some(low), Some(high)) = (parse_number(&caps[1]), parse_number(&caps[2])) {
            return Reference::Range { low, high };
        }
    }

    if let Some(caps) = LESS_FULL.captures(raw) {
        if let Some(high) = parse_number(&caps[1]) {
            return Reference::LessThan(high);
        }
    }

    if let Some(caps) = GREATER_FULL.captures(raw) {
        if let Some(low) = parse_number(&caps[1]) {
            return Reference::GreaterThan(low);
        }
    }

    if QUAL_FULL.is_match(raw) {
        return Reference::Qualitative(raw.to_string());
    }

    Reference::None
}

/// Resolve a qualitative token captured in the unit slot.
///
/// Upstream pattern overlap sometimes lands a token like "Negativan" in the
/// unit group. It is never a unit: it becomes the value when the value is
/// missing, or the qualitative expectation when the reference is missing,
/// and the unit comes back empty either way.
pub fn reconcile_qualitative_unit(
    mut value: Value,
    mut reference: Reference,
    unit_raw: &str,
) -> (Value, Reference, String) {
    let unit_raw = unit_raw.trim();

    if is_qualitative_token(unit_raw) {
        if value.is_absent() {
            value = Value::Qualitative(unit_raw.to_string());
        } else if reference.is_none() {
            reference = Reference::Qualitative(unit_raw.to_string());
        }
        return (value, reference, String::new());
    }

    (value, reference, normalize_unit(unit_raw))
}

/// Normalize a unit string: strip whitespace, `^` to `*`, micro sign to `u`.
pub fn normalize_unit(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '^' => '*',
            'µ' | 'μ' => 'u',
            other => other,
        })
        .collect()
}
