//! Batch extraction pipeline: PDF document -> per-document folder of images.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::pdf::{DocumentSource, PdfExtractor};

/// Filtering options for the extraction pipeline.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Minimum image width in pixels; smaller images are dropped.
    pub min_width: u32,
    /// Minimum image height in pixels; smaller images are dropped.
    pub min_height: u32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        // Filters out logos, icons and other page furniture
        Self {
            min_width: 350,
            min_height: 350,
        }
    }
}

/// Result of extracting a single document.
#[derive(Debug, Clone)]
pub struct DocumentStats {
    /// The source document.
    pub document: PathBuf,
    /// Number of pages processed.
    pub pages: u32,
    /// Files written under the document's output folder.
    pub written: Vec<PathBuf>,
    /// Images dropped for being below the minimum size.
    pub skipped_small: usize,
}

/// Extract all sufficiently large embedded images from one PDF.
///
/// Writes each surviving image to
/// `output_root/<document_stem>/page_<N>_img_<M>.<ext>` with 1-based page
/// number and per-page ordinal. The ordinal counts every enumerated image on
/// the page, so dropped images still consume ordinals. Existing files with
/// the same name are overwritten.
pub fn extract_document(
    path: &Path,
    output_root: &Path,
    opts: &ExtractOptions,
) -> Result<DocumentStats> {
    let data = fs::read(path)?;
    let mut extractor = PdfExtractor::new();
    extractor.load(&data)?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let doc_dir = output_root.join(stem);
    fs::create_dir_all(&doc_dir)?;

    let pages = extractor.page_count();
    let mut written = Vec::new();
    let mut skipped_small = 0;

    for page in 1..=pages {
        let images = extractor.page_images(page)?;

        for (idx, img) in images.iter().enumerate() {
            if img.width < opts.min_width || img.height < opts.min_height {
                info!(
                    "Skipping small image on page {} ({}x{})",
                    page, img.width, img.height
                );
                skipped_small += 1;
                continue;
            }

            let filename = format!("page_{}_img_{}.{}", page, idx + 1, img.ext);
            let target = doc_dir.join(filename);
            fs::write(&target, &img.data)?;

            debug!(
                "Extracted {} ({}x{})",
                target.display(),
                img.width,
                img.height
            );
            written.push(target);
        }
    }

    info!(
        "Completed extraction for {}: {} written, {} skipped",
        path.display(),
        written.len(),
        skipped_small
    );

    Ok(DocumentStats {
        document: path.to_path_buf(),
        pages,
        written,
        skipped_small,
    })
}
