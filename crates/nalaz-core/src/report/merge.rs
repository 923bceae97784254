//! Deduplication and cross-pipeline merge policies.
//!
//! Dedup selects among immutable alternatives; it never merges fields from
//! two records.

use std::collections::HashSet;

use tracing::debug;

use crate::models::record::{AnalyteRecord, Subtype};

/// Auto-pipeline internal dedup: exactly one record per `(analyte, subtype)`.
///
/// Candidates are ordered by source priority rank, then by reference
/// completeness (populated low bound first, then populated high bound); the
/// first record per key survives. The sort is stable, so equally informative
/// candidates keep their input order.
pub fn dedup_auto(mut rows: Vec<AnalyteRecord>) -> Vec<AnalyteRecord> {
    rows.sort_by_key(|r| {
        (
            r.source.rank(),
            r.reference.low().is_none(),
            r.reference.high().is_none(),
        )
    });

    let mut seen: HashSet<(String, Subtype)> = HashSet::new();
    rows.retain(|r| seen.insert(r.key()));
    rows
}

/// Targeted-pipeline internal dedup: exactly one record per analyte name.
///
/// Candidates are scored by the number of populated reference fields; ties
/// keep input order. The surviving table is sorted by analyte name.
pub fn dedup_targeted(mut rows: Vec<AnalyteRecord>) -> Vec<AnalyteRecord> {
    rows.sort_by(|a, b| {
        a.analyte
            .cmp(&b.analyte)
            .then_with(|| b.reference.field_count().cmp(&a.reference.field_count()))
    });

    let mut seen: HashSet<String> = HashSet::new();
    rows.retain(|r| seen.insert(r.analyte.clone()));
    rows
}

/// Cross-pipeline merge.
///
/// Every targeted record is kept (catalog-anchored extraction has higher
/// precision); auto records are added only for `(analyte, subtype)` keys the
/// targeted table lacks (the auto pipeline has higher recall).
pub fn merge(auto: Vec<AnalyteRecord>, targeted: Vec<AnalyteRecord>) -> Vec<AnalyteRecord> {
    let taken: HashSet<(String, Subtype)> = targeted.iter().map(AnalyteRecord::key).collect();

    let mut table = targeted;
    table.extend(auto.into_iter().filter(|r| !taken.contains(&r.key())));

    debug!("merged table holds {} records", table.len());
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{Reference, Source, Status, Value};

    fn record(
        analyte: &str,
        subtype: Subtype,
        value: Value,
        reference: Reference,
        source: Source,
    ) -> AnalyteRecord {
        AnalyteRecord::new(
            analyte.to_string(),
            subtype,
            value,
            String::new(),
            reference,
            source,
            String::new(),
        )
    }

    #[test]
    fn test_dedup_auto_keeps_most_complete_reference() {
        let rows = vec![
            record("Glukoza", Subtype::None, Value::Numeric(5.2), Reference::None, Source::Auto),
            record(
                "Glukoza",
                Subtype::None,
                Value::Numeric(5.2),
                Reference::LessThan(6.1),
                Source::Auto,
            ),
            record(
                "Glukoza",
                Subtype::None,
                Value::Numeric(5.2),
                Reference::Range { low: 3.9, high: 6.1 },
                Source::Auto,
            ),
        ];

        let deduped = dedup_auto(rows);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].reference, Reference::Range { low: 3.9, high: 6.1 });
        assert_eq!(deduped[0].status, Status::Within);
    }

    #[test]
    fn test_dedup_auto_prefers_targeted_rank() {
        let rows = vec![
            record(
                "Glukoza",
                Subtype::None,
                Value::Numeric(5.2),
                Reference::Range { low: 3.9, high: 6.1 },
                Source::Auto,
            ),
            record("Glukoza", Subtype::None, Value::Numeric(5.4), Reference::None, Source::Targeted),
        ];

        let deduped = dedup_auto(rows);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].source, Source::Targeted);
    }

    #[test]
    fn test_dedup_auto_is_subtype_aware() {
        let rows = vec![
            record("Neutrofili", Subtype::Percent, Value::Numeric(55.0), Reference::None, Source::Auto),
            record("Neutrofili", Subtype::Absolute, Value::Numeric(3.1), Reference::None, Source::Auto),
        ];

        assert_eq!(dedup_auto(rows).len(), 2);
    }

    #[test]
    fn test_dedup_targeted_scores_reference_fields() {
        let rows = vec![
            record("Hemoglobin", Subtype::None, Value::Numeric(135.0), Reference::None, Source::Targeted),
            record(
                "Hemoglobin",
                Subtype::None,
                Value::Numeric(136.0),
                Reference::Range { low: 120.0, high: 160.0 },
                Source::Targeted,
            ),
            record("Albumin", Subtype::None, Value::Numeric(45.0), Reference::None, Source::Targeted),
        ];

        let deduped = dedup_targeted(rows);
        assert_eq!(deduped.len(), 2);
        // Output is name-sorted.
        assert_eq!(deduped[0].analyte, "Albumin");
        assert_eq!(deduped[1].analyte, "Hemoglobin");
        assert_eq!(deduped[1].value, Value::Numeric(136.0));
    }

    #[test]
    fn test_dedup_targeted_ties_keep_input_order() {
        let rows = vec![
            record("Urea", Subtype::None, Value::Numeric(4.0), Reference::None, Source::Targeted),
            record("Urea", Subtype::None, Value::Numeric(9.9), Reference::None, Source::Targeted),
        ];

        let deduped = dedup_targeted(rows);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].value, Value::Numeric(4.0));
    }

    #[test]
    fn test_merge_targeted_is_authoritative() {
        let targeted = vec![record(
            "Glukoza",
            Subtype::None,
            Value::Numeric(5.4),
            Reference::Range { low: 3.9, high: 6.1 },
            Source::Targeted,
        )];
        let auto = vec![
            record("Glukoza", Subtype::None, Value::Numeric(5.2), Reference::None, Source::Auto),
            record("Amilaza", Subtype::None, Value::Numeric(60.0), Reference::None, Source::Auto),
        ];

        let merged = merge(auto, targeted);
        assert_eq!(merged.len(), 2);

        let glukoza: Vec<_> = merged.iter().filter(|r| r.analyte == "Glukoza").collect();
        assert_eq!(glukoza.len(), 1);
        assert_eq!(glukoza[0].value, Value::Numeric(5.4));
        assert_eq!(glukoza[0].source, Source::Targeted);

        assert!(merged.iter().any(|r| r.analyte == "Amilaza"));
    }

    #[test]
    fn test_merge_keeps_distinct_subtypes() {
        let targeted = vec![record(
            "Neutrofili",
            Subtype::Percent,
            Value::Numeric(55.0),
            Reference::None,
            Source::Targeted,
        )];
        let auto = vec![record(
            "Neutrofili",
            Subtype::Absolute,
            Value::Numeric(3.1),
            Reference::None,
            Source::Auto,
        )];

        assert_eq!(merge(auto, targeted).len(), 2);
    }
}
