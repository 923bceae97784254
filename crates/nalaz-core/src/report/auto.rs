//! Auto pipeline: every layout strategy over every line of the text.

use tracing::{debug, trace};

use super::interpret::{parse_reference, parse_value, reconcile_qualitative_unit};
use super::merge::dedup_auto;
use super::normalize::normalize_name;
use super::patterns::{COLUMN_SPLIT, RawCandidate, strategies};
use super::validate::is_valid_analyte;
use crate::models::record::{AnalyteRecord, Source};

/// Run the pattern library across the whole text and return one record per
/// `(analyte, subtype)`.
///
/// Empty or whitespace-only text yields an empty table; a line no strategy
/// recognizes simply produces no candidates. Nothing here fails.
pub fn extract(text: &str) -> Vec<AnalyteRecord> {
    let mut rows = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        for segment in split_columns(line) {
            for strategy in strategies() {
                for raw in strategy.candidates(segment) {
                    if let Some(record) = interpret_candidate(&raw, segment) {
                        trace!("{}: accepted '{}'", strategy.name(), record.analyte);
                        rows.push(record);
                    }
                }
            }
        }
    }

    debug!("auto pipeline produced {} raw candidates", rows.len());
    dedup_auto(rows)
}

/// Split a physical line into pseudo-columns on tab runs or 3+ spaces, so
/// two-column report layouts are scanned column by column.
fn split_columns(line: &str) -> Vec<&str> {
    let parts: Vec<&str> = COLUMN_SPLIT
        .split(line)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    if parts.is_empty() { vec![line] } else { parts }
}

/// Normalize, validate, and type one raw strategy match.
///
/// Returns `None` for names that collapse to nothing or fail the validator;
/// that is routine noise filtering, not an error path.
fn interpret_candidate(raw: &RawCandidate, origin: &str) -> Option<AnalyteRecord> {
    let (name, subtype) = normalize_name(&raw.name, &raw.unit);
    if name.chars().count() < 2 || !is_valid_analyte(&name) {
        return None;
    }

    let value = parse_value(&raw.value);
    let reference = parse_reference(&raw.reference);
    let (value, reference, unit) = reconcile_qualitative_unit(value, reference, &raw.unit);

    Some(AnalyteRecord::new(
        name,
        subtype,
        value,
        unit,
        reference,
        Source::Auto,
        origin.to_string(),
    ))
}
