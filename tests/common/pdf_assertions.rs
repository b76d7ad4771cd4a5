use lopdf::content::Content;
use lopdf::{Document as LopdfDocument, Object};
use std::collections::HashSet;

/// Extract all text content from a PDF document
pub fn extract_text(doc: &LopdfDocument) -> String {
    let mut text = String::new();
    let pages = doc.get_pages();
    for page_num in 1..=pages.len() {
        if let Ok(page_text) = doc.extract_text(&[page_num as u32]) {
            text.push_str(&page_text);
            text.push('\n');
        }
    }
    text
}

/// Text of a single page, 1-based.
pub fn page_text(doc: &LopdfDocument, page_num: u32) -> String {
    doc.extract_text(&[page_num]).unwrap_or_default()
}

/// BaseFont names of every font referenced from a page resource dictionary.
pub fn extract_font_names(doc: &LopdfDocument) -> Vec<String> {
    let mut fonts = HashSet::new();
    for (_, page_id) in doc.get_pages() {
        let Ok(resources) = doc
            .get_dictionary(page_id)
            .and_then(|page| page.get(b"Resources"))
            .and_then(|r| resolve_dict(doc, r))
        else {
            continue;
        };
        let Ok(font_dict) = resources.get(b"Font").and_then(|f| resolve_dict(doc, f)) else {
            continue;
        };
        for (_, font) in font_dict.iter() {
            if let Ok(font) = resolve_dict(doc, font)
                && let Ok(name) = font.get(b"BaseFont").and_then(Object::as_name)
            {
                fonts.insert(String::from_utf8_lossy(name).to_string());
            }
        }
    }
    let mut fonts: Vec<_> = fonts.into_iter().collect();
    fonts.sort();
    fonts
}

fn resolve_dict<'a>(doc: &'a LopdfDocument, object: &'a Object) -> lopdf::Result<&'a lopdf::Dictionary> {
    match object {
        Object::Reference(id) => doc.get_dictionary(*id),
        other => other.as_dict(),
    }
}

/// URI targets of every link annotation, in page order.
pub fn extract_link_uris(doc: &LopdfDocument) -> Vec<String> {
    let mut uris = Vec::new();
    for (_, page_id) in doc.get_pages() {
        let Ok(page) = doc.get_dictionary(page_id) else { continue };
        let Ok(annots) = page.get(b"Annots").and_then(Object::as_array) else {
            continue;
        };
        for annot in annots {
            if let Ok(annot) = resolve_dict(doc, annot)
                && let Ok(action) = annot.get(b"A").and_then(|a| resolve_dict(doc, a))
                && let Ok(uri) = action.get(b"URI").and_then(Object::as_str)
            {
                uris.push(String::from_utf8_lossy(uri).to_string());
            }
        }
    }
    uris
}

/// Decoded content operations of one page.
pub fn page_operations(doc: &LopdfDocument, page_num: u32) -> Vec<lopdf::content::Operation> {
    let pages = doc.get_pages();
    let Some(page_id) = pages.get(&page_num) else {
        return Vec::new();
    };
    doc.get_page_content(*page_id)
        .ok()
        .and_then(|bytes| Content::decode(&bytes).ok())
        .map(|content| content.operations)
        .unwrap_or_default()
}

/// Every `/ActualText` string in the document, decoded from UTF-16BE.
pub fn actual_texts(doc: &LopdfDocument) -> Vec<String> {
    let mut texts = Vec::new();
    for page_num in 1..=doc.get_pages().len() as u32 {
        for op in page_operations(doc, page_num) {
            if op.operator != "BDC" {
                continue;
            }
            if let Some(Ok(props)) = op.operands.get(1).map(Object::as_dict)
                && let Ok(bytes) = props.get(b"ActualText").and_then(Object::as_str)
            {
                texts.push(decode_utf16_be(bytes));
            }
        }
    }
    texts
}

fn decode_utf16_be(bytes: &[u8]) -> String {
    let body = bytes.strip_prefix(&[0xFE, 0xFF]).unwrap_or(bytes);
    let units: Vec<u16> = body.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]])).collect();
    String::from_utf16_lossy(&units)
}

/// Get page dimensions (width, height) in points
pub fn get_page_dimensions(doc: &LopdfDocument, page_num: u32) -> Option<(f32, f32)> {
    let pages = doc.get_pages();
    let page = doc.get_dictionary(*pages.get(&page_num)?).ok()?;
    let media_box = page.get(b"MediaBox").ok()?.as_array().ok()?;
    if media_box.len() < 4 {
        return None;
    }
    let number = |o: &Object| o.as_float().ok().or_else(|| o.as_i64().ok().map(|v| v as f32));
    Some((
        number(&media_box[2])? - number(&media_box[0])?,
        number(&media_box[3])? - number(&media_box[1])?,
    ))
}

pub fn has_acroform(doc: &LopdfDocument) -> bool {
    let in_catalog = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_dictionary(id))
        .is_ok_and(|catalog| catalog.has(b"AcroForm"));
    let widgets = doc.objects.values().any(|object| {
        object
            .as_dict()
            .ok()
            .and_then(|d| d.get(b"Subtype").ok())
            .and_then(|s| s.as_name().ok())
            .is_some_and(|name| name == b"Widget")
    });
    in_catalog || widgets
}

/// (width, height) in pixels of every image XObject.
pub fn image_dimensions(doc: &LopdfDocument) -> Vec<(i64, i64)> {
    let mut dims = Vec::new();
    for object in doc.objects.values() {
        if let Ok(stream) = object.as_stream()
            && stream.dict.get(b"Subtype").and_then(Object::as_name).is_ok_and(|n| n == b"Image")
            && let (Ok(w), Ok(h)) = (
                stream.dict.get(b"Width").and_then(Object::as_i64),
                stream.dict.get(b"Height").and_then(Object::as_i64),
            )
        {
            dims.push((w, h));
        }
    }
    dims
}

// ============================================================================
// Fluent Assertion Macros
// ============================================================================

/// Assert that PDF contains specific text
#[macro_export]
macro_rules! assert_pdf_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            extracted.contains($text),
            "PDF should contain '{}', but extracted text was:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert that PDF does NOT contain specific text
#[macro_export]
macro_rules! assert_pdf_not_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            !extracted.contains($text),
            "PDF should NOT contain '{}', but it was found in:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert the PDF has exactly this many pages
#[macro_export]
macro_rules! assert_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!($pdf.page_count(), $count, "unexpected page count");
    };
}
