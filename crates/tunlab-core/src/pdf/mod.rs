//! PDF processing module.

mod extractor;

pub use extractor::{PdfExtractor, PdfImage};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for document sources that expose embedded raster images page by page.
pub trait DocumentSource {
    /// Load a document from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the document.
    fn page_count(&self) -> u32;

    /// Extract the embedded images of a page, in resource enumeration order.
    fn page_images(&self, page: u32) -> Result<Vec<PdfImage>>;
}
