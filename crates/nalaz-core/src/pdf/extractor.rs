//! Native PDF text providers using pdf-extract and lopdf.

use lopdf::Document;
use tracing::{debug, warn};

use super::{Result, TextProvider};
use crate::error::PdfError;

/// Text-layer extraction via the `pdf-extract` crate.
pub struct PdfExtractProvider;

impl TextProvider for PdfExtractProvider {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn extract(&self, data: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}

/// Page-by-page text extraction via `lopdf`.
pub struct LopdfProvider;

impl TextProvider for LopdfProvider {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn extract(&self, data: &[u8]) -> Result<String> {
        let doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(PdfError::Encrypted);
        }

        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        if pages.is_empty() {
            return Err(PdfError::NoPages);
        }

        let mut text = String::new();
        for page in pages {
            match doc.extract_text(&[page]) {
                Ok(page_text) => {
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str(&page_text);
                }
                Err(e) => debug!("lopdf could not read page {}: {}", page, e),
            }
        }

        Ok(text)
    }
}

/// Prioritized chain of text providers.
///
/// The first provider returning non-whitespace text wins. Provider failures
/// are logged and the next provider is tried; an exhausted chain yields an
/// empty string, which downstream extraction treats as zero candidates.
pub struct PdfTextExtractor {
    providers: Vec<Box<dyn TextProvider>>,
}

impl PdfTextExtractor {
    /// Default chain: pdf-extract first, lopdf second.
    pub fn new() -> Self {
        Self {
            providers: vec![Box::new(PdfExtractProvider), Box::new(LopdfProvider)],
        }
    }

    /// Chain with explicit providers, in priority order.
    pub fn with_providers(providers: Vec<Box<dyn TextProvider>>) -> Self {
        Self { providers }
    }

    /// Best-effort plain text for one document.
    pub fn extract_text(&self, data: &[u8]) -> String {
        for provider in &self.providers {
            match provider.extract(data) {
                Ok(text) if !text.trim().is_empty() => {
                    debug!("{} extracted {} characters", provider.name(), text.len());
                    return text;
                }
                Ok(_) => debug!("{} returned no text", provider.name()),
                Err(e) => warn!("{} failed: {}", provider.name(), e),
            }
        }

        String::new()
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl TextProvider for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn extract(&self, _data: &[u8]) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    impl TextProvider for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn extract(&self, _data: &[u8]) -> Result<String> {
            Err(PdfError::Parse("boom".to_string()))
        }
    }

    #[test]
    fn test_first_successful_provider_wins() {
        let chain = PdfTextExtractor::with_providers(vec![
            Box::new(Failing),
            Box::new(Fixed("Hemoglobin 135")),
            Box::new(Fixed("never reached")),
        ]);

        assert_eq!(chain.extract_text(b"pdf"), "Hemoglobin 135");
    }

    #[test]
    fn test_whitespace_only_result_falls_through() {
        let chain = PdfTextExtractor::with_providers(vec![
            Box::new(Fixed("   \n ")),
            Box::new(Fixed("Glukoza 5.2")),
        ]);

        assert_eq!(chain.extract_text(b"pdf"), "Glukoza 5.2");
    }

    #[test]
    fn test_exhausted_chain_yields_empty_text() {
        let chain = PdfTextExtractor::with_providers(vec![Box::new(Failing)]);
        assert_eq!(chain.extract_text(b"pdf"), "");

        let empty = PdfTextExtractor::with_providers(Vec::new());
        assert_eq!(empty.extract_text(b"pdf"), "");
    }
}
