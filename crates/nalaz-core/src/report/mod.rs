//! Lab-report record extraction.
//!
//! Two independent pipelines consume the same raw text: the auto pipeline
//! sweeps a pattern library over every line, and the targeted pipeline
//! searches bounded windows around catalog analyte names. Their outputs are
//! deduplicated and merged into one table, with targeted records taking
//! priority.

pub mod auto;
pub mod interpret;
pub mod merge;
pub mod normalize;
pub mod patterns;
pub mod targeted;
pub mod validate;

pub use auto::extract;
pub use interpret::{
    normalize_unit, parse_number, parse_reference, parse_value, reconcile_qualitative_unit,
};
pub use merge::{dedup_auto, dedup_targeted, merge};
pub use normalize::normalize_name;
pub use patterns::{LineStrategy, RawCandidate, strategies};
pub use targeted::{WINDOW_CHARS, extract_targeted, extract_targeted_within};
pub use validate::is_valid_analyte;

use crate::models::catalog::AnalyteCatalog;
use crate::models::record::AnalyteRecord;

/// Configurable façade over both pipelines and the merge step.
pub struct ReportParser {
    catalog: AnalyteCatalog,
    window_chars: usize,
}

impl ReportParser {
    /// Parser with the base catalog and default window size.
    pub fn new() -> Self {
        Self {
            catalog: AnalyteCatalog::base(),
            window_chars: WINDOW_CHARS,
        }
    }

    /// Replace the analyte catalog.
    pub fn with_catalog(mut self, catalog: AnalyteCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Set the targeted pipeline's window size.
    pub fn with_window_chars(mut self, window_chars: usize) -> Self {
        self.window_chars = window_chars;
        self
    }

    /// Run both pipelines on the text and merge their tables.
    pub fn parse(&self, text: &str) -> Vec<AnalyteRecord> {
        let auto_rows = extract(text);
        let targeted_rows = extract_targeted_within(text, &self.catalog, self.window_chars);
        merge(auto_rows, targeted_rows)
    }
}

impl Default for ReportParser {
    fn default() -> Self {
        Self::new()
    }
}
