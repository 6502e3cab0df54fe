//! Embedded raster image extraction using lopdf.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, RgbImage};
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, trace};

use super::{DocumentSource, Result};
use crate::error::PdfError;

/// PDF image extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
}

/// A raster image pulled out of a PDF page.
///
/// JPEG streams keep their original bytes; raw sample streams are wrapped
/// losslessly into PNG. Width and height come from the image dictionary.
#[derive(Debug, Clone)]
pub struct PdfImage {
    /// Encoded image data, ready to write to disk.
    pub data: Vec<u8>,
    /// File extension matching the data encoding (jpg, png).
    pub ext: &'static str,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PdfExtractor {
    /// Create a new PDF extractor with no document loaded.
    pub fn new() -> Self {
        Self { document: None }
    }

    fn try_image_from_object(&self, doc: &Document, obj: &Object) -> Option<PdfImage> {
        let Object::Stream(stream) = obj else {
            return None;
        };
        let dict = &stream.dict;

        // Only image XObjects qualify
        let subtype = dict.get(b"Subtype").ok()?;
        if subtype.as_name().ok()? != b"Image" {
            return None;
        }

        let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
        let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;

        trace!("Found image object: {}x{}", width, height);

        if let Ok(filter) = dict.get(b"Filter") {
            let filter_name = match filter {
                Object::Name(name) => Some(name.as_slice()),
                Object::Array(arr) if !arr.is_empty() => {
                    arr.first().and_then(|o| o.as_name().ok())
                }
                _ => None,
            };

            match filter_name {
                Some(b"DCTDecode") => {
                    // JPEG stream, written to disk verbatim
                    trace!("Passing JPEG stream through unchanged");
                    return Some(PdfImage {
                        data: stream.content.clone(),
                        ext: "jpg",
                        width,
                        height,
                    });
                }
                Some(b"JPXDecode") => {
                    trace!("Found JPEG2000 image (not supported)");
                    return None;
                }
                Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                    trace!("Found fax/JBIG2 image (not supported)");
                    return None;
                }
                _ => {}
            }
        }

        // Raw (possibly flate-compressed) sample data
        let data = match stream.decompressed_content() {
            Ok(d) => d,
            Err(_) => stream.content.clone(),
        };

        let color_space = dict
            .get(b"ColorSpace")
            .ok()
            .and_then(|o| match o {
                Object::Name(name) => Some(name.as_slice()),
                Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
                Object::Reference(r) => doc.get_object(*r).ok().and_then(|o| o.as_name().ok()),
                _ => None,
            })
            .unwrap_or(b"DeviceRGB");

        let bits = dict
            .get(b"BitsPerComponent")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(8) as u8;

        self.png_from_samples(&data, width, height, color_space, bits)
            .map(|data| PdfImage {
                data,
                ext: "png",
                width,
                height,
            })
    }

    /// Wrap raw RGB or grayscale samples into a PNG without altering pixels.
    fn png_from_samples(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        color_space: &[u8],
        bits_per_component: u8,
    ) -> Option<Vec<u8>> {
        trace!(
            "Encoding raw samples: {}x{}, colorspace={:?}, bits={}",
            width,
            height,
            String::from_utf8_lossy(color_space),
            bits_per_component
        );

        if bits_per_component != 8 {
            trace!("Unsupported bits per component: {}", bits_per_component);
            return None;
        }

        let dynamic = if color_space == b"DeviceRGB" || color_space == b"RGB" {
            let expected = (width as usize) * (height as usize) * 3;
            if data.len() < expected {
                trace!("RGB sample data too short: {} < {}", data.len(), expected);
                return None;
            }
            RgbImage::from_raw(width, height, data[..expected].to_vec())
                .map(DynamicImage::ImageRgb8)?
        } else if color_space == b"DeviceGray" || color_space == b"G" {
            let expected = (width as usize) * (height as usize);
            if data.len() < expected {
                trace!("Gray sample data too short: {} < {}", data.len(), expected);
                return None;
            }
            GrayImage::from_raw(width, height, data[..expected].to_vec())
                .map(DynamicImage::ImageLuma8)?
        } else {
            trace!(
                "Unsupported color space: {:?}",
                String::from_utf8_lossy(color_space)
            );
            return None;
        };

        let mut out = Vec::new();
        match dynamic.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png) {
            Ok(()) => Some(out),
            Err(e) => {
                trace!("PNG encoding failed: {}", e);
                None
            }
        }
    }

    /// Get the resources dictionary for a page, handling inheritance.
    fn page_resources(&self, doc: &Document, page_id: ObjectId) -> Option<lopdf::Dictionary> {
        let page = doc.get_object(page_id).ok()?;
        if let Object::Dictionary(dict) = page {
            if let Ok(resources) = dict.get(b"Resources") {
                if let Ok((_, Object::Dictionary(res_dict))) = doc.dereference(resources) {
                    return Some(res_dict.clone());
                }
            }

            // Resources may be inherited from the page tree
            if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
                return self.inherited_resources(doc, *parent_id);
            }
        }
        None
    }

    fn inherited_resources(&self, doc: &Document, node_id: ObjectId) -> Option<lopdf::Dictionary> {
        let node = doc.get_object(node_id).ok()?;
        if let Object::Dictionary(dict) = node {
            if let Ok(resources) = dict.get(b"Resources") {
                if let Ok((_, Object::Dictionary(res_dict))) = doc.dereference(resources) {
                    return Some(res_dict.clone());
                }
            }

            if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
                return self.inherited_resources(doc, *parent_id);
            }
        }
        None
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSource for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn page_images(&self, page: u32) -> Result<Vec<PdfImage>> {
        let doc = self
            .document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))?;

        let pages = doc.get_pages();
        let page_id = pages.get(&page).ok_or(PdfError::InvalidPage(page))?;

        let mut images = Vec::new();

        if let Some(resources) = self.page_resources(doc, *page_id) {
            if let Ok(xobjects) = resources.get(b"XObject") {
                if let Ok((_, Object::Dictionary(xobj_dict))) = doc.dereference(xobjects) {
                    for (_name, obj_ref) in xobj_dict.iter() {
                        if let Ok((_, obj)) = doc.dereference(obj_ref) {
                            if let Some(img) = self.try_image_from_object(doc, obj) {
                                images.push(img);
                            }
                        }
                    }
                }
            }
        }

        debug!("Extracted {} images from page {}", images.len(), page);
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{build_pdf, jpeg_image_stream, rgb_image_stream};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut extractor = PdfExtractor::new();
        assert!(extractor.load(b"not a pdf").is_err());
    }

    #[test]
    fn test_page_count() {
        let data = build_pdf(vec![vec![], vec![], vec![]]);
        let mut extractor = PdfExtractor::new();
        extractor.load(&data).unwrap();
        assert_eq!(extractor.page_count(), 3);
    }

    #[test]
    fn test_raw_rgb_image_becomes_png() {
        let data = build_pdf(vec![vec![rgb_image_stream(400, 380)]]);
        let mut extractor = PdfExtractor::new();
        extractor.load(&data).unwrap();

        let images = extractor.page_images(1).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].ext, "png");
        assert_eq!((images[0].width, images[0].height), (400, 380));

        // The PNG must decode back to the dictionary dimensions
        let decoded = image::load_from_memory(&images[0].data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (400, 380));
    }

    #[test]
    fn test_jpeg_stream_passes_through_verbatim() {
        let marker = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x42, 0x42, 0x42];
        let data = build_pdf(vec![vec![jpeg_image_stream(512, 512, marker.clone())]]);
        let mut extractor = PdfExtractor::new();
        extractor.load(&data).unwrap();

        let images = extractor.page_images(1).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].ext, "jpg");
        assert_eq!(images[0].data, marker);
    }

    #[test]
    fn test_invalid_page_number() {
        let data = build_pdf(vec![vec![]]);
        let mut extractor = PdfExtractor::new();
        extractor.load(&data).unwrap();
        assert!(matches!(
            extractor.page_images(5),
            Err(PdfError::InvalidPage(5))
        ));
    }

    #[test]
    fn test_page_without_images_is_empty() {
        let data = build_pdf(vec![vec![]]);
        let mut extractor = PdfExtractor::new();
        extractor.load(&data).unwrap();
        assert!(extractor.page_images(1).unwrap().is_empty());
    }
}
