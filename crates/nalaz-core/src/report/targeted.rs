//! Targeted (catalog-driven) extraction pipeline.
//!
//! For every alias occurrence of a catalog entry, a bounded window of
//! surrounding text is scanned for a value, unit, and reference. This
//! catches reports where the analyte label and its value sit on different
//! lines, which no single-line pattern can recognize.

use regex::Regex;
use tracing::debug;

use super::interpret::{parse_reference, parse_value, reconcile_qualitative_unit};
use super::merge::dedup_targeted;
use super::normalize::normalize_name;
use super::patterns::{RANGE_TOKEN, UNIT_TOKEN, VALUE_TOKEN};
use crate::models::catalog::AnalyteCatalog;
use crate::models::record::{AnalyteRecord, Source};

/// Characters scanned on each side of an alias match.
pub const WINDOW_CHARS: usize = 120;

/// Run the targeted pipeline with the default window size.
pub fn extract_targeted(text: &str, catalog: &AnalyteCatalog) -> Vec<AnalyteRecord> {
    extract_targeted_within(text, catalog, WINDOW_CHARS)
}

/// Run the targeted pipeline with an explicit window size.
///
/// Fields are searched independently, each in the first window that yields
/// a match: the text following the alias first, then the preceding text,
/// then the combined window. Matches without a discoverable value are
/// discarded.
pub fn extract_targeted_within(
    text: &str,
    catalog: &AnalyteCatalog,
    window_chars: usize,
) -> Vec<AnalyteRecord> {
    let mut rows = Vec::new();

    for entry in catalog.entries() {
        let Some(alias_re) = entry.alias_regex() else {
            continue;
        };

        for m in alias_re.find_iter(text) {
            let left_start = floor_boundary(text, m.start().saturating_sub(window_chars));
            let right_end = ceil_boundary(text, m.end().saturating_add(window_chars));

            let right = &text[m.end()..right_end];
            let left = &text[left_start..m.start()];
            let around = &text[left_start..right_end];
            let windows = [right, left, around];

            let value_raw = first_capture(&VALUE_TOKEN, &windows, "val");
            let unit_raw = first_capture(&UNIT_TOKEN, &windows, "un");
            let reference_raw = first_capture(&RANGE_TOKEN, &windows, "ref");

            let (name, subtype) = normalize_name(&entry.name, &unit_raw);
            if name.is_empty() {
                continue;
            }

            let value = parse_value(&value_raw);
            let reference = parse_reference(&reference_raw);
            let (value, reference, unit) =
                reconcile_qualitative_unit(value, reference, &unit_raw);

            if value.is_absent() {
                continue;
            }

            rows.push(AnalyteRecord::new(
                name,
                subtype,
                value,
                unit,
                reference,
                Source::Targeted,
                m.as_str().to_string(),
            ));
        }
    }

    debug!("targeted pipeline produced {} raw candidates", rows.len());
    dedup_targeted(rows)
}

/// First capture of `group` across the windows, in priority order.
fn first_capture(pattern: &Regex, windows: &[&str], group: &str) -> String {
    for window in windows {
        if let Some(m) = pattern.captures(window).and_then(|caps| caps.name(group)) {
            return m.as_str().to_string();
        }
    }
    String::new()
}

fn floor_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{Reference, Status, Subtype, Value};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_value_on_next_line() {
        let text = "Hemoglobin\n135 g/L 120-160";
        let records = extract_targeted(text, &AnalyteCatalog::base());

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.analyte, "Hemoglobin");
        assert_eq!(record.value, Value::Numeric(135.0));
        assert_eq!(record.unit, "g/L");
        assert_eq!(record.reference, Reference::Range { low: 120.0, high: 160.0 });
        assert_eq!(record.status, Status::Within);
        assert_eq!(record.source, Source::Targeted);
    }

    #[test]
    fn test_bare_name_without_value_is_discarded() {
        let records = extract_targeted("Hemoglobin", &AnalyteCatalog::base());
        assert!(records.is_empty());
    }

    #[test]
    fn test_value_outside_window_is_not_found() {
        let text = format!("Hemoglobin{}135", " ".repeat(130));
        let records = extract_targeted(&text, &AnalyteCatalog::base());
        assert!(records.is_empty());
    }

    #[test]
    fn test_subtype_aware_catalog_entry() {
        let records = extract_targeted("Neutrofili aps 2.5 10*9/L", &AnalyteCatalog::base());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].analyte, "Neutrofili");
        assert_eq!(records[0].subtype, Subtype::Absolute);
        assert_eq!(records[0].value, Value::Numeric(2.5));
    }

    #[test]
    fn test_dedup_keeps_most_informative_occurrence() {
        let text = format!(
            "Glukoza 5.2{}Glukoza 5.4 mmol/L 3.9-6.1",
            " ".repeat(130)
        );
        let records = extract_targeted(&text, &AnalyteCatalog::base());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, Value::Numeric(5.4));
        assert_eq!(records[0].reference, Reference::Range { low: 3.9, high: 6.1 });
    }

    #[test]
    fn test_custom_catalog_entry() {
        let mut catalog = AnalyteCatalog::empty();
        catalog.add_custom("Feritin");

        let records = extract_targeted("Feritin 85 ug/L 30-400", &catalog);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].analyte, "Feritin");
        assert_eq!(records[0].status, Status::Within);
    }

    #[test]
    fn test_window_clamps_to_char_boundaries() {
        let text = format!("{} Glukoza 5.2", "č".repeat(65));
        let records = extract_targeted(&text, &AnalyteCatalog::base());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, Value::Numeric(5.2));
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_targeted("", &AnalyteCatalog::base()).is_empty());
        assert!(extract_targeted("Hemoglobin 135", &AnalyteCatalog::empty()).is_empty());
    }
}
