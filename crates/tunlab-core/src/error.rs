//! Error types for the tunlab-core library.

use thiserror::Error;

/// Main error type for the tunlab library.
#[derive(Error, Debug)]
pub enum TunlabError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Ledger error.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

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

    /// Failed to extract an embedded image.
    #[error("failed to extract image: {0}")]
    ImageExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to the label ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The ledger header does not match the configured schema.
    #[error("ledger schema mismatch at {path}: expected {expected} header")]
    SchemaMismatch { path: String, expected: String },

    /// A record's value layout does not match the ledger schema.
    #[error("record does not match {0} schema")]
    RecordShape(String),

    /// CSV read/write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error on the ledger file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the tunlab library.
pub type Result<T> = std::result::Result<T, TunlabError>;
