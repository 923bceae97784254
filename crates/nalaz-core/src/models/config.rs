//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use super::catalog::{AnalyteCatalog, CatalogEntry};

/// Main configuration for the nalaz pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NalazConfig {
    /// PDF text extraction configuration.
    pub pdf: PdfConfig,

    /// Record extraction configuration.
    pub extraction: ExtractionConfig,

    /// Analyte catalog configuration.
    pub catalog: CatalogConfig,
}

/// PDF text extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Prefer the embedded text layer over any external OCR collaborator.
    pub prefer_embedded_text: bool,

    /// Minimum text length to consider extraction successful.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            prefer_embedded_text: true,
            min_text_length: 1,
        }
    }
}

/// Record extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Characters scanned on each side of a catalog alias match when the
    /// targeted pipeline searches for a value/unit/reference.
    pub window_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            window_chars: crate::report::WINDOW_CHARS,
        }
    }
}

/// Analyte catalog configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Skip the built-in base catalog.
    pub skip_base: bool,

    /// User-supplied analyte names, each its own sole alias.
    pub extra_analytes: Vec<String>,

    /// Fully specified custom entries (name plus alias list).
    pub entries: Vec<CatalogEntry>,
}

impl NalazConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// Materialize the configured catalog: base set (unless skipped) plus
    /// custom entries and user-supplied names.
    pub fn catalog(&self) -> AnalyteCatalog {
        let mut catalog = if self.catalog.skip_base {
            AnalyteCatalog::empty()
        } else {
            AnalyteCatalog::base()
        };

        for entry in &self.catalog.entries {
            catalog.push(entry.clone());
        }
        for name in &self.catalog.extra_analytes {
            catalog.add_custom(name);
        }

        catalog
    }
}
