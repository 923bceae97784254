//! Analyte record model: one extracted lab measurement per record.

use serde::{Deserialize, Serialize};

/// Disambiguating tag for analytes reported in two forms
/// (e.g. "Neutrofili %" vs "Neutrofili aps").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subtype {
    /// Plain analyte, no subtype.
    #[default]
    #[serde(rename = "")]
    None,

    /// Relative (percentage) form of a differential count.
    #[serde(rename = "%")]
    Percent,

    /// Absolute-count form of a differential count.
    #[serde(rename = "aps")]
    Absolute,
}

impl Subtype {
    /// Short tag used in tabular output.
    pub fn tag(&self) -> &'static str {
        match self {
            Subtype::None => "",
            Subtype::Percent => "%",
            Subtype::Absolute => "aps",
        }
    }
}

/// A measured value: numeric, qualitative, or missing.
///
/// The three variants are mutually exclusive by construction; a record can
/// never hold both a number and a qualitative token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Numeric measurement.
    Numeric(f64),
    /// Qualitative result (e.g. "Negativan").
    Qualitative(String),
    /// No value could be recognized.
    Absent,
}

impl Value {
    /// Check whether no value was recognized.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Numeric value, if any.
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Value::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    /// Tabular rendering ("" for an absent value).
    pub fn display(&self) -> String {
        match self {
            Value::Numeric(v) => v.to_string(),
            Value::Qualitative(s) => s.clone(),
            Value::Absent => String::new(),
        }
    }
}

/// Clinically normal interval (or qualitative expectation) for a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reference {
    /// Two-sided interval, e.g. "3.5-5.0".
    Range { low: f64, high: f64 },
    /// Upper bound only, e.g. "<10".
    LessThan(f64),
    /// Lower bound only, e.g. ">2".
    GreaterThan(f64),
    /// Expected qualitative token, e.g. "Negativan".
    Qualitative(String),
    /// No reference was recognized.
    None,
}

impl Reference {
    /// Lower bound, if the reference carries one.
    pub fn low(&self) -> Option<f64> {
        match self {
            Reference::Range { low, .. } => Some(*low),
            Reference::GreaterThan(low) => Some(*low),
            _ => None,
        }
    }

    /// Upper bound, if the reference carries one.
    pub fn high(&self) -> Option<f64> {
        match self {
            Reference::Range { high, .. } => Some(*high),
            Reference::LessThan(high) => Some(*high),
            _ => None,
        }
    }

    /// Expected qualitative token, if any.
    pub fn qualitative(&self) -> Option<&str> {
        match self {
            Reference::Qualitative(s) => Some(s),
            _ => None,
        }
    }

    /// Check whether no reference was recognized.
    pub fn is_none(&self) -> bool {
        matches!(self, Reference::None)
    }

    /// Tag used in the exported `ref_type` column.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Reference::Range { .. } => "range",
            Reference::LessThan(_) => "<",
            Reference::GreaterThan(_) => ">",
            Reference::Qualitative(_) => "qual",
            Reference::None => "none",
        }
    }

    /// Tabular rendering ("" when no reference was recognized).
    pub fn display(&self) -> String {
        match self {
            Reference::Range { low, high } => format!("{low}-{high}"),
            Reference::LessThan(high) => format!("<{high}"),
            Reference::GreaterThan(low) => format!(">{low}"),
            Reference::Qualitative(s) => s.clone(),
            Reference::None => String::new(),
        }
    }

    /// Number of populated reference fields (low, high, type).
    ///
    /// Used by the targeted pipeline to keep the most informative candidate
    /// per analyte.
    pub fn field_count(&self) -> usize {
        usize::from(self.low().is_some())
            + usize::from(self.high().is_some())
            + usize::from(!self.is_none())
    }
}

/// Where a value sits relative to its reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Numeric value under the lower bound.
    Below,
    /// Numeric value over the upper bound.
    Above,
    /// Value inside the reference interval / matching the expectation.
    Within,
    /// Qualitative value differing from the qualitative expectation.
    Deviation,
    /// Not enough information to judge.
    #[default]
    Unknown,
}

impl Status {
    /// Derive the status from a value/reference pair.
    ///
    /// This is the only way a status comes into existence; records never
    /// store a status that disagrees with their value and reference.
    pub fn derive(value: &Value, reference: &Reference) -> Status {
        match (value, reference) {
            (Value::Numeric(v), Reference::Range { low, high }) => {
                if v < low {
                    Status::Below
                } else if v > high {
                    Status::Above
                } else {
                    Status::Within
                }
            }
            (Value::Numeric(v), Reference::LessThan(high)) => {
                if v < high {
                    Status::Within
                } else {
                    Status::Above
                }
            }
            (Value::Numeric(v), Reference::GreaterThan(low)) => {
                if v > low {
                    Status::Within
                } else {
                    Status::Below
                }
            }
            (Value::Qualitative(v), Reference::Qualitative(expected)) => {
                if v.to_lowercase() == expected.to_lowercase() {
                    Status::Within
                } else {
                    Status::Deviation
                }
            }
            _ => Status::Unknown,
        }
    }

    /// Tag used in tabular output ("" for unknown).
    pub fn tag(&self) -> &'static str {
        match self {
            Status::Below => "below",
            Status::Above => "above",
            Status::Within => "within",
            Status::Deviation => "deviation",
            Status::Unknown => "",
        }
    }

    /// Whether the value sits outside its reference.
    pub fn is_deviation(&self) -> bool {
        matches!(self, Status::Below | Status::Above | Status::Deviation)
    }
}

/// Which pipeline produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Pattern-library sweep over every line.
    Auto,
    /// Catalog-driven proximity search.
    Targeted,
}

impl Source {
    /// Priority rank for deduplication; lower ranks win.
    pub fn rank(&self) -> u8 {
        match self {
            Source::Targeted => 1,
            Source::Auto => 2,
        }
    }

    /// Tag used in the exported `source` column.
    pub fn tag(&self) -> &'static str {
        match self {
            Source::Auto => "auto",
            Source::Targeted => "targeted",
        }
    }
}

/// One extracted lab measurement.
///
/// Records are immutable after construction; deduplication selects among
/// alternatives, it never edits fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyteRecord {
    /// Normalized canonical analyte name, e.g. "Hemoglobin".
    pub analyte: String,

    /// Percent/absolute disambiguation for differential counts.
    pub subtype: Subtype,

    /// Numeric or qualitative measurement.
    pub value: Value,

    /// Normalized unit string (may be empty).
    pub unit: String,

    /// Recognized reference range or expectation.
    pub reference: Reference,

    /// Derived position of the value relative to the reference.
    pub status: Status,

    /// Pipeline that produced this record.
    pub source: Source,

    /// Raw line or span the record was derived from.
    pub origin: String,
}

impl AnalyteRecord {
    /// Build a record, deriving the status from the value/reference pair.
    pub fn new(
        analyte: String,
        subtype: Subtype,
        value: Value,
        unit: String,
        reference: Reference,
        source: Source,
        origin: String,
    ) -> Self {
        let status = Status::derive(&value, &reference);
        Self {
            analyte,
            subtype,
            value,
            unit,
            reference,
            status,
            source,
            origin,
        }
    }

    /// Deduplication identity for the auto pipeline and cross-pipeline merge.
    pub fn key(&self) -> (String, Subtype) {
        (self.analyte.clone(), self.subtype)
    }
}

/// Flat row schema for delimited-text and spreadsheet export.
///
/// Serializes directly with both `csv` and `serde_json` without further
/// transformation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRow {
    pub analyte: String,
    pub subtype: String,
    pub value: String,
    pub unit: String,
    pub ref_low: Option<f64>,
    pub ref_high: Option<f64>,
    pub ref_type: String,
    pub ref_qualitative: String,
    pub status: String,
    pub source: String,
    pub origin: String,
}

impl From<&AnalyteRecord> for ExportRow {
    fn from(record: &AnalyteRecord) -> Self {
        Self {
            analyte: record.analyte.clone(),
            subtype: record.subtype.tag().to_string(),
            value: record.value.display(),
            unit: record.unit.clone(),
            ref_low: record.reference.low(),
            ref_high: record.reference.high(),
            ref_type: record.reference.type_tag().to_string(),
            ref_qualitative: record
                .reference
                .qualitative()
                .unwrap_or_default()
                .to_string(),
            status: record.status.tag().to_string(),
            source: record.source.tag().to_string(),
            origin: record.origin.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_from_range() {
        let range = Reference::Range { low: 3.5, high: 5.0 };

        assert_eq!(Status::derive(&Value::Numeric(2.0), &range), Status::Below);
        assert_eq!(Status::derive(&Value::Numeric(6.0), &range), Status::Above);
        assert_eq!(Status::derive(&Value::Numeric(4.0), &range), Status::Within);
        // Boundaries are inside the interval (strict inequalities).
        assert_eq!(Status::derive(&Value::Numeric(3.5), &range), Status::Within);
        assert_eq!(Status::derive(&Value::Numeric(5.0), &range), Status::Within);
    }

    #[test]
    fn test_status_from_bounds() {
        assert_eq!(
            Status::derive(&Value::Numeric(5.0), &Reference::LessThan(10.0)),
            Status::Within
        );
        assert_eq!(
            Status::derive(&Value::Numeric(10.0), &Reference::LessThan(10.0)),
            Status::Above
        );
        assert_eq!(
            Status::derive(&Value::Numeric(3.0), &Reference::GreaterThan(2.0)),
            Status::Within
        );
        assert_eq!(
            Status::derive(&Value::Numeric(2.0), &Reference::GreaterThan(2.0)),
            Status::Below
        );
    }

    #[test]
    fn test_status_qualitative() {
        let expected = Reference::Qualitative("Negativan".to_string());

        assert_eq!(
            Status::derive(&Value::Qualitative("negativan".to_string()), &expected),
            Status::Within
        );
        assert_eq!(
            Status::derive(&Value::Qualitative("Pozitivan".to_string()), &expected),
            Status::Deviation
        );
    }

    #[test]
    fn test_status_unknown_pairings() {
        assert_eq!(
            Status::derive(&Value::Numeric(1.0), &Reference::None),
            Status::Unknown
        );
        assert_eq!(
            Status::derive(
                &Value::Qualitative("Negativan".to_string()),
                &Reference::Range { low: 0.0, high: 1.0 }
            ),
            Status::Unknown
        );
        assert_eq!(
            Status::derive(&Value::Absent, &Reference::Range { low: 0.0, high: 1.0 }),
            Status::Unknown
        );
    }

    #[test]
    fn test_reference_field_count() {
        assert_eq!(Reference::Range { low: 1.0, high: 2.0 }.field_count(), 3);
        assert_eq!(Reference::LessThan(10.0).field_count(), 2);
        assert_eq!(Reference::Qualitative("Negativan".to_string()).field_count(), 1);
        assert_eq!(Reference::None.field_count(), 0);
    }

    #[test]
    fn test_record_derives_status() {
        let record = AnalyteRecord::new(
            "Hemoglobin".to_string(),
            Subtype::None,
            Value::Numeric(135.0),
            "g/L".to_string(),
            Reference::Range { low: 120.0, high: 160.0 },
            Source::Auto,
            "Hemoglobin 135 g/L 120-160".to_string(),
        );

        assert_eq!(record.status, Status::Within);
    }

    #[test]
    fn test_export_row() {
        let record = AnalyteRecord::new(
            "Glukoza".to_string(),
            Subtype::None,
            Value::Numeric(5.2),
            "mmol/L".to_string(),
            Reference::Range { low: 3.9, high: 6.1 },
            Source::Targeted,
            "Glukoza".to_string(),
        );

        let row = ExportRow::from(&record);
        assert_eq!(row.analyte, "Glukoza");
        assert_eq!(row.value, "5.2");
        assert_eq!(row.ref_low, Some(3.9));
        assert_eq!(row.ref_high, Some(6.1));
        assert_eq!(row.ref_type, "range");
        assert_eq!(row.status, "within");
        assert_eq!(row.source, "targeted");
    }
}
