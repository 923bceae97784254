//! Error types for the nalaz-core library.

use thiserror::Error;

/// Main error type for the nalaz library.
///
/// The extraction engine itself is total over its input and never fails;
/// errors can only come from the surrounding collaborator layers (PDF
/// loading, configuration I/O).
#[derive(Error, Debug)]
pub enum NalazError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Result type for the nalaz library.
pub type Result<T> = std::result::Result<T, NalazError>;
