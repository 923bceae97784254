//! Line-level recognition patterns for lab-result rows.
//!
//! Each [`LineStrategy`] is one layout hypothesis for how a result line is
//! structured. Strategies are not mutually exclusive: a single line may
//! produce candidates from several strategies, and deduplication resolves
//! the conflicts afterwards (recall over precision).

use lazy_static::lazy_static;
use regex::Regex;

/// Numeric token: optional sign, digits, optional `.`/`,` fraction.
pub const NUM: &str = r"[-+]?\d+(?:[.,]\d+)?";

/// Fixed qualitative result tokens.
pub const QUAL: &str = r"(?:Negativan|Normalan|Pozitivan)";

/// Unit token: `10^n/x` exponential forms or a run of unit characters.
pub const UNIT: &str = r"(?:10[*^]\d+/[A-Za-z]+|[A-Za-z%/*.\-^]+)";

/// Analyte name: Latin letters with Serbian diacritics, spaces, `.`, `-`, `%`.
const NAME: &str = r"[A-Za-zČĆŠĐŽčćšđž][A-Za-zČĆŠĐŽčćšđž\s.\-%]+?";

/// Legacy name classes (leading space/dot tolerated by the older layouts).
const LEGACY_NAME_LAZY: &str = r"[A-Za-zČĆŠĐŽčćšđž.\-% ]+?";
const LEGACY_NAME_GREEDY: &str = r"[A-Za-zČĆŠĐŽčćšđž.\-% ]+";

lazy_static! {
    /// Reference range: two-number range, `<n`, `>n`, or a qualitative token.
    pub static ref RANGE: String =
        format!(r"(?:{num}\s*[~\-]\s*{num}|<\s*{num}|>\s*{num}|{qual})", num = NUM, qual = QUAL);

    /// First value token inside a proximity window.
    pub static ref VALUE_TOKEN: Regex =
        Regex::new(&format!(r"(?P<val>{num}|{qual})", num = NUM, qual = QUAL)).unwrap();

    /// First unit token inside a proximity window.
    pub static ref UNIT_TOKEN: Regex =
        Regex::new(&format!(r"(?P<un>{unit})", unit = UNIT)).unwrap();

    /// First reference token inside a proximity window.
    pub static ref RANGE_TOKEN: Regex =
        Regex::new(&format!(r"(?P<ref>{range})", range = RANGE.as_str())).unwrap();

    /// Pseudo-column separator: tab runs or 3+ consecutive spaces.
    pub static ref COLUMN_SPLIT: Regex = Regex::new(r"\s{3,}|\t+").unwrap();

    /// Ordered layout hypotheses, applied to every line independently.
    pub static ref STRATEGIES: Vec<LineStrategy> = vec![
        // Vendor-specific layout: value unit low-high K-Name at line end.
        LineStrategy::new(
            "trailing-name",
            &format!(
                r"(?P<val>{num})\s+(?P<un>{unit})\s*(?P<low>{num})\s*-\s*(?P<high>{num})\s*(?P<an>K-{lname})$",
                num = NUM,
                unit = UNIT,
                lname = LEGACY_NAME_GREEDY,
            ),
        ),
        // Permissive name-first layout, anywhere in the line.
        LineStrategy::new(
            "general",
            &format!(
                r"(?P<an>{name})\s+(?P<val>{num}|{qual})\s+(?P<un>{unit})?\s*(?P<ref>{range})?",
                name = NAME,
                num = NUM,
                qual = QUAL,
                unit = UNIT,
                range = RANGE.as_str(),
            ),
        ),
        // Strict full-line layout used by the state lab system.
        LineStrategy::new(
            "state-format",
            &format!(
                r"^(?P<an>{name})\s+(?P<val>{num}|{qual})\s+(?P<un>{unit})?\s*(?P<ref>{range})?\s*$",
                name = NAME,
                num = NUM,
                qual = QUAL,
                unit = UNIT,
                range = RANGE.as_str(),
            ),
        ),
        // Tabular layout with 2+ space column separation.
        LineStrategy::new(
            "tabular",
            &format!(
                r"(?P<an>{name})\s{{2,}}(?P<val>{num}|{qual})\s+(?P<un>{unit})?\s*(?P<ref>{range})?",
                name = NAME,
                num = NUM,
                qual = QUAL,
                unit = UNIT,
                range = RANGE.as_str(),
            ),
        ),
        // Legacy: name, optional H/L flag, value, unit, reference.
        LineStrategy::new(
            "flagged",
            &format!(
                r"(?P<an>{lname})\s+(?P<fl>[HL])?\s*(?P<val>{num}|{qual})\s+(?P<un>{unit})?\s*(?P<ref>{range})",
                lname = LEGACY_NAME_LAZY,
                num = NUM,
                qual = QUAL,
                unit = UNIT,
                range = RANGE.as_str(),
            ),
        ),
        // Legacy reversed: value, unit, reference, then the name.
        LineStrategy::new(
            "reversed",
            &format!(
                r"(?P<fl>[HL])?\s*(?P<val>{num}|{qual})\s+(?P<un>{unit})?\s*(?P<ref>{range})\s+(?P<an>{lname})",
                lname = LEGACY_NAME_GREEDY,
                num = NUM,
                qual = QUAL,
                unit = UNIT,
                range = RANGE.as_str(),
            ),
        ),
        // Legacy: name, value, unit, no reference.
        LineStrategy::new(
            "name-value-unit",
            &format!(
                r"(?P<an>{lname})\s+(?P<val>{num})\s+(?P<un>{unit})\b",
                lname = LEGACY_NAME_LAZY,
                num = NUM,
                unit = UNIT,
            ),
        ),
        // Legacy reversed, no reference: value, unit, name.
        LineStrategy::new(
            "value-unit-name",
            &format!(
                r"(?P<val>{num})\s+(?P<un>{unit})\s+(?P<an>{lname})",
                lname = LEGACY_NAME_GREEDY,
                num = NUM,
                unit = UNIT,
            ),
        ),
    ];
}

/// Raw candidate tuple produced by one strategy match, before normalization
/// and validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCandidate {
    /// Raw analyte-name capture.
    pub name: String,
    /// Raw value capture (numeric or qualitative token).
    pub value: String,
    /// Raw unit capture (may be empty).
    pub unit: String,
    /// Raw reference capture (may be empty).
    pub reference: String,
}

/// One layout hypothesis: a named recognition rule with the common
/// `(line) -> candidates` contract.
pub struct LineStrategy {
    name: &'static str,
    pattern: Regex,
}

impl LineStrategy {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
        }
    }

    /// Strategy name, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All raw candidates this strategy recognizes on one line.
    pub fn candidates(&self, line: &str) -> Vec<RawCandidate> {
        self.pattern
            .captures_iter(line)
            .filter_map(|caps| {
                let group = |g: &str| {
                    caps.name(g)
                        .map(|m| m.as_str().trim().to_string())
                        .unwrap_or_default()
                };

                let name = group("an");
                let value = group("val");
                if name.is_empty() || value.is_empty() {
                    return None;
                }

                // The trailing-name layout captures its range as two bare
                // numbers; stitch them back into a range expression.
                let mut reference = group("ref");
                if reference.is_empty() {
                    let low = group("low");
                    let high = group("high");
                    if !low.is_empty() && !high.is_empty() {
                        reference = format!("{low}-{high}");
                    }
                }

                Some(RawCandidate {
                    name,
                    value,
                    unit: group("un"),
                    reference,
                })
            })
            .collect()
    }
}

/// The ordered strategy list.
pub fn strategies() -> &'static [LineStrategy] {
    &STRATEGIES
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_name(name: &str) -> &'static LineStrategy {
        strategies().iter().find(|s| s.name() == name).unwrap()
    }

    #[test]
    fn test_strategy_order() {
        let names: Vec<&str> = strategies().iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "trailing-name",
                "general",
                "state-format",
                "tabular",
                "flagged",
                "reversed",
                "name-value-unit",
                "value-unit-name",
            ]
        );
    }

    #[test]
    fn test_state_format_line() {
        let candidates = by_name("state-format").candidates("Hemoglobin 135 g/L 120-160");

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Hemoglobin");
        assert_eq!(candidates[0].value, "135");
        assert_eq!(candidates[0].unit, "g/L");
        assert_eq!(candidates[0].reference, "120-160");
    }

    #[test]
    fn test_trailing_name_line() {
        let candidates = by_name("trailing-name").candidates("4.8 10*12/L 4.3 - 5.7 K-Eritrociti");

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "K-Eritrociti");
        assert_eq!(candidates[0].value, "4.8");
        assert_eq!(candidates[0].unit, "10*12/L");
        assert_eq!(candidates[0].reference, "4.3-5.7");
    }

    #[test]
    fn test_reversed_line() {
        let candidates = by_name("reversed").candidates("12.5 g/L 10.0-15.0 Hemoglobin");

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Hemoglobin");
        assert_eq!(candidates[0].reference, "10.0-15.0");
    }

    #[test]
    fn test_tabular_needs_column_gap() {
        let strategy = by_name("tabular");

        assert_eq!(strategy.candidates("Glukoza  5.2 mmol/L").len(), 1);
        assert!(strategy.candidates("Glukoza 5.2 mmol/L").is_empty());
    }

    #[test]
    fn test_qualitative_value_token() {
        let candidates = by_name("general").candidates("Glukoza u urinu Negativan Negativan");

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Glukoza u urinu");
        assert_eq!(candidates[0].value, "Negativan");
        // The second token lands in the unit slot; interpretation moves it
        // into the reference.
        assert_eq!(candidates[0].unit, "Negativan");
    }
}
