//! Analyte catalog for the targeted extraction pipeline.
//!
//! The catalog is an explicit configuration value: callers construct their
//! own instance (base set, user additions, or both) and pass it into the
//! targeted pipeline. There is no process-wide catalog.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// One catalog entry: a canonical analyte name and its recognized aliases
/// across labs and language variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Canonical display name, e.g. "Hemoglobin" or "Neutrofili %".
    pub name: String,

    /// Alias spellings matched in the raw text.
    pub aliases: Vec<String>,
}

impl CatalogEntry {
    /// Create an entry from a canonical name and alias list.
    pub fn new(name: &str, aliases: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
        }
    }

    /// Entry whose canonical name is its only alias (user-supplied analytes).
    pub fn from_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: vec![name.to_string()],
        }
    }

    /// Case-insensitive alternation over all aliases.
    ///
    /// Word boundaries are attached wherever an alias starts or ends with a
    /// word character, so short aliases like "K" or "Na" match whole tokens
    /// only. Returns `None` when the entry has no usable alias.
    pub fn alias_regex(&self) -> Option<Regex> {
        let alternatives: Vec<String> = self
            .aliases
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .map(bounded_alias)
            .collect();

        if alternatives.is_empty() {
            return None;
        }

        Regex::new(&format!("(?i){}", alternatives.join("|"))).ok()
    }
}

fn bounded_alias(alias: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut pattern = String::new();

    if alias.chars().next().is_some_and(is_word) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(alias));
    if alias.chars().last().is_some_and(is_word) {
        pattern.push_str(r"\b");
    }

    pattern
}

/// Configured list of analytes the targeted pipeline searches for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyteCatalog {
    entries: Vec<CatalogEntry>,
}

impl AnalyteCatalog {
    /// Catalog with no entries.
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Base set covering common hematology/chemistry/electrolyte analytes,
    /// with subtype-aware entries for differential counts.
    pub fn base() -> Self {
        let entries = vec![
            CatalogEntry::new("Hemoglobin", &["Hemoglobin", "Hb"]),
            CatalogEntry::new("Leukociti", &["Leukociti", "Leukocite", "WBC"]),
            CatalogEntry::new("Eritrociti", &["Eritrociti", "Eritrocite", "RBC", "K-Eritrociti"]),
            CatalogEntry::new("Hematokrit", &["Hematokrit", "HCT"]),
            CatalogEntry::new("Trombociti", &["Trombociti", "PLT"]),
            CatalogEntry::new("Glukoza", &["Glukoza", "Glucose"]),
            CatalogEntry::new("Urea", &["Urea"]),
            CatalogEntry::new("Kreatinin", &["Kreatinin", "Creatinine"]),
            CatalogEntry::new("ALT", &["ALT", "GPT"]),
            CatalogEntry::new("AST", &["AST", "GOT"]),
            CatalogEntry::new("GGT", &["GGT", "Gamma GT", "Gamma-GT"]),
            CatalogEntry::new(
                "Ukupni holesterol",
                &["Ukupni holesterol", "Holesterol ukupni", "Cholesterol total"],
            ),
            CatalogEntry::new("HDL", &["HDL"]),
            CatalogEntry::new("LDL", &["LDL"]),
            CatalogEntry::new("Trigliceridi", &["Trigliceridi", "Triglycerides", "Trigl."]),
            CatalogEntry::new("Natrijum", &["Natrijum", "Na"]),
            CatalogEntry::new("Kalijum", &["Kalijum", "K"]),
            CatalogEntry::new("Kalcijum", &["Kalcijum", "Ca"]),
            CatalogEntry::new(
                "Neutrofili %",
                &["Neutrofili %", "Neutrofili%", "Neutrofili procenat", "Neutrophils %"],
            ),
            CatalogEntry::new(
                "Neutrofili aps",
                &["Neutrofili aps", "Neutrofili aps.", "Neutrofili abs", "Neutrophils abs"],
            ),
            CatalogEntry::new("Limfociti %", &["Limfociti %", "Lymphocytes %", "Limfociti%"]),
            CatalogEntry::new("Limfociti aps", &["Limfociti aps", "Lymphocytes abs", "Limfociti aps."]),
            CatalogEntry::new("Monociti %", &["Monociti %", "Monocytes %", "Monociti%"]),
            CatalogEntry::new("Monociti aps", &["Monociti aps", "Monocytes abs", "Monociti aps."]),
        ];

        Self { entries }
    }

    /// Configured entries, in search order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Append a fully specified entry.
    pub fn push(&mut self, entry: CatalogEntry) {
        self.entries.push(entry);
    }

    /// Append a user-supplied analyte name as its own sole alias.
    ///
    /// Empty and whitespace-only names are ignored.
    pub fn add_custom(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() {
            self.entries.push(CatalogEntry::from_name(name));
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AnalyteCatalog {
    fn default() -> Self {
        Self::base()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_catalog_size() {
        assert_eq!(AnalyteCatalog::base().len(), 24);
    }

    #[test]
    fn test_add_custom() {
        let mut catalog = AnalyteCatalog::empty();
        catalog.add_custom("  Feritin ");
        catalog.add_custom("   ");

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].name, "Feritin");
        assert_eq!(catalog.entries()[0].aliases, vec!["Feritin".to_string()]);
    }

    #[test]
    fn test_alias_regex_is_case_insensitive() {
        let entry = CatalogEntry::new("Hemoglobin", &["Hemoglobin", "Hb"]);
        let re = entry.alias_regex().unwrap();

        assert!(re.is_match("HEMOGLOBIN 135"));
        assert!(re.is_match("hb 135"));
    }

    #[test]
    fn test_short_alias_matches_whole_tokens_only() {
        let entry = CatalogEntry::new("Kalijum", &["Kalijum", "K"]);
        let re = entry.alias_regex().unwrap();

        assert!(re.is_match("K 4.5 mmol/L"));
        // "K" must not fire inside unrelated words.
        assert!(re.find("Kreatinin").map(|m| m.as_str().len()) != Some(1));
        assert!(!re.is_match("trombocit"));
    }

    #[test]
    fn test_alias_regex_empty_entry() {
        let entry = CatalogEntry::new("X", &["", "  "]);
        assert!(entry.alias_regex().is_none());
    }
}
