//! Image processing backend trait and shared error type.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: decode a file's bytes into a raster, and render a raster onto a
//! primed surface of the requested size, encoded in the requested format.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording `MockBackend` below.

use super::params::RenderParams;
use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("{mime} encode failed: {reason}")]
    Encode { mime: &'static str, reason: String },
    #[error("Surface {width}x{height} exceeds the {limit} pixel limit")]
    SurfaceTooLarge { width: u32, height: u32, limit: u64 },
}

/// Trait for image processing backends.
///
/// Keeping both operations behind one seam lets the session and the resize
/// operation run against a mock without decoding or encoding real pixels.
pub trait ImageBackend {
    /// Decode encoded file bytes into a raster.
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError>;

    /// Stretch `source` over a `width × height` surface primed with the
    /// background color and return the encoded bytes.
    fn render(&self, source: &DynamicImage, params: &RenderParams) -> Result<Vec<u8>, BackendError>;
}
