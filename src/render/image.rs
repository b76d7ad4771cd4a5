//! Image sizing, loading and decoding.

use crate::render::error::RenderError;
use image::{DynamicImage, GenericImageView};
use log::debug;
use quire_layout::{ImageSpec, RasterImage};
use quire_model::ImageProps;
use quire_types::Size;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

pub const MAX_WIDTH_RATIO: f32 = 0.8;
pub const MAX_HEIGHT: f32 = 360.0;
pub const DEFAULT_SIDE: f32 = 200.0;
/// Longest side kept when embedding. Larger sources are downsampled.
const MAX_EMBED_PX: u32 = 2048;

/// Supplies encoded image bytes for a URL. Implementations are consulted
/// synchronously while rendering.
pub trait ImageProvider: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, RenderError>;
}

/// Serves pre-loaded bytes keyed by URL.
#[derive(Debug, Default, Clone)]
pub struct MemoryImageProvider {
    images: HashMap<String, Vec<u8>>,
}

impl MemoryImageProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(url.into(), bytes);
    }

    pub fn with_image(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(url, bytes);
        self
    }
}

impl ImageProvider for MemoryImageProvider {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, RenderError> {
        self.images.get(url).cloned().ok_or_else(|| RenderError::ImageUnavailable {
            url: url.to_string(),
            reason: "not found".to_string(),
        })
    }
}

/// Resolves relative paths and `file://` URLs against a root directory.
/// Paths that would escape the root are refused.
#[derive(Debug, Clone)]
pub struct DirectoryImageProvider {
    root: PathBuf,
}

impl DirectoryImageProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, url: &str) -> Option<PathBuf> {
        let relative = url.strip_prefix("file://").unwrap_or(url).trim_start_matches('/');
        if relative.is_empty() || relative.contains("://") {
            return None;
        }
        let path = Path::new(relative);
        if path.components().any(|c| !matches!(c, Component::Normal(_) | Component::CurDir)) {
            return None;
        }
        Some(self.root.join(path))
    }
}

impl ImageProvider for DirectoryImageProvider {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, RenderError> {
        let unavailable = |reason: String| RenderError::ImageUnavailable {
            url: url.to_string(),
            reason,
        };
        let path = self
            .resolve(url)
            .ok_or_else(|| unavailable("outside the image directory".to_string()))?;
        std::fs::read(&path).map_err(|e| unavailable(e.to_string()))
    }
}

/// Display box for an image. Declared dimensions win, then the decoded
/// pixel size, then a square default. The result keeps the aspect ratio and
/// fits within 80% of the column and the height cap.
pub fn display_size(props: &ImageProps, intrinsic: Option<(u32, u32)>, content_width: f32) -> Size {
    let intrinsic_ratio = intrinsic
        .filter(|(w, h)| *w > 0 && *h > 0)
        .map(|(w, h)| w as f32 / h as f32);

    let natural = match (props.width, props.height) {
        (Some(w), Some(h)) => Size::new(w, h),
        (Some(w), None) => Size::new(w, intrinsic_ratio.map_or(w, |r| w / r)),
        (None, Some(h)) => Size::new(intrinsic_ratio.map_or(h, |r| h * r), h),
        (None, None) => match intrinsic {
            Some((w, h)) if w > 0 && h > 0 => Size::new(w as f32, h as f32),
            _ => Size::new(DEFAULT_SIDE, DEFAULT_SIDE),
        },
    };
    natural.fit_within(Size::new(content_width * MAX_WIDTH_RATIO, MAX_HEIGHT))
}

/// Decodes PNG, JPEG or GIF bytes into opaque RGB. Transparent pixels are
/// composited over white.
pub fn decode(bytes: &[u8]) -> Result<RasterImage, image::ImageError> {
    let mut decoded = image::load_from_memory(bytes)?;
    let (w, h) = decoded.dimensions();
    if w.max(h) > MAX_EMBED_PX {
        debug!("Downsampling {}x{} image", w, h);
        decoded = decoded.thumbnail(MAX_EMBED_PX, MAX_EMBED_PX);
    }
    Ok(flatten(&decoded))
}

fn flatten(image: &DynamicImage) -> RasterImage {
    let rgba = image.to_rgba8();
    let (width_px, height_px) = rgba.dimensions();
    let mut rgb = Vec::with_capacity((width_px * height_px * 3) as usize);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u32;
        for channel in [r, g, b] {
            rgb.push(((channel as u32 * alpha + 255 * (255 - alpha)) / 255) as u8);
        }
    }
    RasterImage {
        width_px,
        height_px,
        rgb,
    }
}

/// Builds the image element. A missing provider, a fetch failure or a decode
/// failure all produce a placeholder of the same size; the error is returned
/// alongside so the caller can count it.
pub fn render_image(
    props: &ImageProps,
    provider: Option<&dyn ImageProvider>,
    content_width: f32,
) -> (ImageSpec, Option<RenderError>) {
    let loaded = match provider {
        None => Err(RenderError::ImageUnavailable {
            url: props.url.clone(),
            reason: "no image provider".to_string(),
        }),
        Some(_) if props.url.trim().is_empty() => Err(RenderError::ImageUnavailable {
            url: String::new(),
            reason: "empty url".to_string(),
        }),
        Some(provider) => provider.fetch(&props.url).and_then(|bytes| {
            decode(&bytes).map_err(|e| RenderError::ImageUnavailable {
                url: props.url.clone(),
                reason: e.to_string(),
            })
        }),
    };

    let (raster, error) = match loaded {
        Ok(raster) => (Some(Arc::new(raster)), None),
        Err(e) => (None, Some(e)),
    };
    let intrinsic = raster.as_ref().map(|r| (r.width_px, r.height_px));
    let size = display_size(props, intrinsic, content_width);
    let caption = props.caption.trim();

    (
        ImageSpec {
            width: size.width,
            height: size.height,
            raster,
            alt: props.alt.clone(),
            caption: (!caption.is_empty()).then(|| caption.to_string()),
        },
        error,
    )
}
