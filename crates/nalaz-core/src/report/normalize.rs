//! Analyte name normalization and subtype classification.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::record::Subtype;

lazy_static! {
    /// Unit-like suffixes that sometimes trail into the name capture when
    /// neighbouring pattern groups overlap.
    static ref UNIT_TAIL: Regex = Regex::new(
        r"(?i)(?:(?:10[*^]\d+/[A-Za-z]+)|(?:[fpnumk]?g/L|ng/mL|ug/mL|mg/dL|mmol/L|mol/L|U/L|IU/L|mIU/L)|(?:L/L)|(?:fL|pL|nL|pg)|(?:%))\s*$"
    )
    .unwrap();
}

/// Clean a raw analyte label into a canonical name plus subtype tag.
///
/// Steps: strip a leading `K-`/`S-` lab prefix, collapse whitespace and
/// normalize `aps.`, classify a trailing `%`/`aps` suffix, repeatedly strip
/// trailing unit noise, and finally fall back to the unit hint for the
/// percent subtype. A non-empty input can come back empty when everything
/// was unit noise; callers treat that as an extraction failure.
pub fn normalize_name(raw: &str, unit_hint: &str) -> (String, Subtype) {
    let mut name = raw.trim().to_string();

    if name.to_lowercase().starts_with("k-") || name.to_lowercase().starts_with("s-") {
        name = name[2..].trim().to_string();
    }

    name = name.replace("aps.", "aps");
    name = name.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut subtype = Subtype::None;
    if name.ends_with('%') {
        subtype = Subtype::Percent;
        name.pop();
        name = name.trim_end().to_string();
    } else if name.to_lowercase().ends_with(" aps") {
        subtype = Subtype::Absolute;
        name.truncate(name.len() - 3);
        name = name.trim_end().to_string();
    }

    while let Some(start) = UNIT_TAIL.find(&name).map(|m| m.start()) {
        name.truncate(start);
        name = name.trim_end().to_string();
    }

    if subtype == Subtype::None && unit_hint.trim() == "%" {
        subtype = Subtype::Percent;
    }

    (name, subtype)
}
