//! In-memory PDF construction helpers shared across tests.

use lopdf::{Dictionary, Document, Object, Stream, dictionary};

/// An uncompressed DeviceRGB image XObject with 8 bits per component.
pub(crate) fn rgb_image_stream(width: i64, height: i64) -> Stream {
    let data = vec![0x7Fu8; (width * height * 3) as usize];
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        data,
    )
}

/// A DCTDecode (JPEG) image XObject carrying arbitrary stream bytes.
pub(crate) fn jpeg_image_stream(width: i64, height: i64, data: Vec<u8>) -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        data,
    )
}

/// Build a PDF with one entry per page, each holding the given image XObjects.
pub(crate) fn build_pdf(pages: Vec<Vec<Stream>>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for page_images in pages {
        let mut xobjects = Dictionary::new();
        for (i, stream) in page_images.into_iter().enumerate() {
            let img_id = doc.add_object(stream);
            xobjects.set(format!("Im{}", i + 1), img_id);
        }

        let resources_id = doc.add_object(dictionary! {
            "XObject" => xobjects,
        });
        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).expect("failed to serialize test PDF");
    out
}
