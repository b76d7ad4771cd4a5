use crate::encoding::text_string;
use crate::page::PageContext;
use crate::writer::StreamingPdfWriter;
use crate::SerializeError;
use chrono::{DateTime, Utc};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{dictionary, Dictionary, Object, ObjectId, Stream};
use quire_layout::{LaidOutDocument, LayoutElement, RasterImage, StandardFont};
use std::collections::HashMap;
use std::io::{Cursor, Seek, Write};
use std::sync::Arc;

/// Document information dictionary contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfMetadata {
    pub title: String,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Vec<String>,
    pub creator: Option<String>,
    /// Written as both creation and modification date.
    pub created_at: Option<DateTime<Utc>>,
}

fn pdf_date(at: &DateTime<Utc>) -> String {
    at.format("D:%Y%m%d%H%M%S+00'00'").to_string()
}

impl PdfMetadata {
    fn to_info(&self) -> Dictionary {
        let mut info = dictionary! {
            "Title" => text_string(&self.title),
            "Producer" => text_string(concat!("quire ", env!("CARGO_PKG_VERSION"))),
        };
        if let Some(author) = &self.author {
            info.set("Author", text_string(author));
        }
        if let Some(subject) = &self.subject {
            info.set("Subject", text_string(subject));
        }
        if !self.keywords.is_empty() {
            info.set("Keywords", text_string(&self.keywords.join(", ")));
        }
        if let Some(creator) = &self.creator {
            info.set("Creator", text_string(creator));
        }
        if let Some(at) = &self.created_at {
            info.set("CreationDate", Object::string_literal(pdf_date(at)));
            info.set("ModDate", Object::string_literal(pdf_date(at)));
        }
        info
    }
}

/// Serializes a [`LaidOutDocument`] to PDF bytes.
///
/// Stateless; each call writes a complete, self-contained file.
#[derive(Debug, Clone, Default)]
pub struct LopdfRenderer;

impl LopdfRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, document: &LaidOutDocument, metadata: &PdfMetadata) -> Result<Vec<u8>, SerializeError> {
        Ok(self.render_to(document, metadata, Cursor::new(Vec::new()))?.into_inner())
    }

    pub fn render_to<W: Write + Seek>(
        &self,
        document: &LaidOutDocument,
        metadata: &PdfMetadata,
        writer: W,
    ) -> Result<W, SerializeError> {
        let mut font_dict = Dictionary::new();
        for font in StandardFont::ALL {
            let single_font_dict = dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.postscript_name(),
                "Encoding" => "WinAnsiEncoding",
            };
            font_dict.set(font.resource_name().as_bytes(), Object::Dictionary(single_font_dict));
        }

        let mut writer = StreamingPdfWriter::new(writer, "1.7", font_dict)?;
        let images = write_images(&mut writer, document)?;

        let mut page_ids = Vec::with_capacity(document.pages.len());
        for (index, elements) in document.pages.iter().enumerate() {
            let mut page = PageContext::new(document.page_height, &images);
            for el in elements {
                page.draw_element(el);
            }
            let (content, links) = page.finish();
            let content_id = writer
                .buffer_content_stream(content)
                .map_err(|e| SerializeError::Content {
                    page: index + 1,
                    message: e.to_string(),
                })?;

            let annotations: Vec<Object> = links
                .into_iter()
                .map(|link| {
                    let rect = vec![
                        link.rect.x.into(),
                        link.rect.y.into(),
                        link.rect.right().into(),
                        link.rect.bottom().into(),
                    ];
                    let action = dictionary! { "Type" => "Action", "S" => "URI", "URI" => Object::string_literal(link.href) };
                    let annot = dictionary! {
                        "Type" => "Annot", "Subtype" => "Link", "Rect" => rect,
                        "Border" => vec![0.into(), 0.into(), 0.into()], "A" => action,
                    };
                    Object::Reference(writer.buffer_object(annot.into()))
                })
                .collect();

            let mut page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => writer.pages_id,
                "MediaBox" => vec![0.0.into(), 0.0.into(), document.page_width.into(), document.page_height.into()],
                "Contents" => content_id,
                "Resources" => writer.resources_id,
            };
            if !annotations.is_empty() {
                page_dict.set("Annots", Object::Array(annotations));
            }
            page_ids.push(writer.buffer_object(page_dict.into()));
        }

        log::debug!("Serialized {} pages with {} images.", page_ids.len(), images.len());
        writer.set_page_ids(page_ids);
        writer.set_info(metadata.to_info());
        Ok(writer.finish()?)
    }
}

/// Writes every distinct raster once, in first-use order, and returns the
/// XObject name for each raster address.
fn write_images<W: Write + Seek>(
    writer: &mut StreamingPdfWriter<W>,
    document: &LaidOutDocument,
) -> Result<HashMap<usize, String>, SerializeError> {
    let mut names = HashMap::new();
    let rasters = document.pages.iter().flatten().filter_map(|el| match &el.element {
        LayoutElement::Image(image) => Some(&image.image),
        _ => None,
    });
    for raster in rasters {
        let key = Arc::as_ptr(raster) as usize;
        if names.contains_key(&key) {
            continue;
        }
        let name = format!("Im{}", names.len() + 1);
        writer.add_xobject(&name, image_stream(raster)?);
        names.insert(key, name);
    }
    Ok(names)
}

fn image_stream(raster: &RasterImage) -> Result<Stream, SerializeError> {
    let expected = raster.width_px as usize * raster.height_px as usize * 3;
    if raster.width_px == 0 || raster.height_px == 0 || raster.rgb.len() != expected {
        return Err(SerializeError::InvalidImage {
            width: raster.width_px,
            height: raster.height_px,
            len: raster.rgb.len(),
        });
    }
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raster.rgb)?;
    let data = encoder.finish()?;

    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => raster.width_px as i64,
        "Height" => raster.height_px as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };
    Ok(Stream::new(dict, data).with_compression(false))
}
