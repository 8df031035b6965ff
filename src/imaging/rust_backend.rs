//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP, GIF, BMP, TIFF, ICO) | `image::ImageReader` with content sniffing |
//! | Prime surface | `image::RgbaImage::from_pixel` with the background color |
//! | Stretch | `image::DynamicImage::resize_exact` (filter from config, Lanczos3 default) |
//! | Composite | `image::imageops::overlay` (alpha blend onto the backdrop) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at the requested quality |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (lossless) |
//! | Encode → WebP | `webp::Encoder` (lossy, libwebp) at the requested quality |

use super::backend::{BackendError, ImageBackend};
use super::format::Encoding;
use super::params::RenderParams;
use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader, RgbImage, RgbaImage};
use std::io::Cursor;

/// Largest surface the backend will allocate, in pixels (16384 × 16384).
pub const MAX_SURFACE_PIXELS: u64 = 16384 * 16384;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn check_surface(width: u32, height: u32) -> Result<(), BackendError> {
    let pixels = width as u64 * height as u64;
    if pixels > MAX_SURFACE_PIXELS {
        return Err(BackendError::SurfaceTooLarge {
            width,
            height,
            limit: MAX_SURFACE_PIXELS,
        });
    }
    Ok(())
}

/// Prime a surface with the background and stretch the source over all of it.
///
/// No cropping and no letterboxing: the source is scaled non-uniformly to
/// the exact surface size.
fn compose(source: &DynamicImage, params: &RenderParams) -> RgbaImage {
    let mut surface =
        RgbaImage::from_pixel(params.width, params.height, params.background.to_rgba());
    let stretched = source
        .resize_exact(params.width, params.height, params.filter.filter_type())
        .to_rgba8();
    image::imageops::overlay(&mut surface, &stretched, 0, 0);
    surface
}

/// Encode a composed surface into the requested format.
fn encode(surface: &RgbaImage, params: &RenderParams) -> Result<Vec<u8>, BackendError> {
    let (width, height) = surface.dimensions();
    let mime = params.encoding.mime();
    let failed = |e: image::ImageError| BackendError::Encode {
        mime,
        reason: e.to_string(),
    };

    let mut buf = Vec::new();
    match params.encoding {
        Encoding::Jpeg => {
            // JPEG has no alpha channel; the backdrop already made the surface opaque.
            let rgb: RgbImage = surface.convert();
            let quality = params.quality.value().min(100) as u8;
            JpegEncoder::new_with_quality(Cursor::new(&mut buf), quality)
                .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                .map_err(failed)?;
        }
        Encoding::Png => {
            PngEncoder::new(Cursor::new(&mut buf))
                .write_image(surface.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(failed)?;
        }
        Encoding::Webp => {
            // `image` only writes lossless WebP.
            let encoded = webp::Encoder::from_rgba(surface.as_raw(), width, height)
                .encode_simple(false, params.quality.value() as f32)
                .map_err(|e| BackendError::Encode {
                    mime,
                    reason: format!("{e:?}"),
                })?;
            buf.extend_from_slice(&encoded);
        }
    }
    Ok(buf)
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError> {
        ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .decode()
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn render(&self, source: &DynamicImage, params: &RenderParams) -> Result<Vec<u8>, BackendError> {
        check_surface(params.width, params.height)?;
        let surface = compose(source, params);
        encode(&surface, params)
    }
}
