//! Core library for lab-report analyte extraction.
//!
//! This crate provides:
//! - PDF text extraction through a prioritized provider chain
//! - a pattern-library auto pipeline over free-form report text
//! - a catalog-driven targeted pipeline searching around known analyte names
//! - merge/deduplication producing one trustworthy row per analyte

pub mod error;
pub mod models;
pub mod pdf;
pub mod report;

pub use error::{NalazError, PdfError, Result};
pub use models::catalog::{AnalyteCatalog, CatalogEntry};
pub use models::config::NalazConfig;
pub use models::record::{
    AnalyteRecord, ExportRow, Reference, Source, Status, Subtype, Value,
};
pub use pdf::{PdfTextExtractor, TextProvider};
pub use report::{ReportParser, extract, extract_targeted, merge};
