//! PDF text extraction module.
//!
//! Text extraction is a collaborator of the extraction core, not part of
//! it: the core only ever sees the final text, and empty text simply means
//! zero candidates. Providers are tried in priority order.

mod extractor;

pub use extractor::{LopdfProvider, PdfExtractProvider, PdfTextExtractor};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// One text-extraction capability in the provider chain.
pub trait TextProvider {
    /// Provider name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Best-effort plain text for one document.
    fn extract(&self, data: &[u8]) -> Result<String>;
}
