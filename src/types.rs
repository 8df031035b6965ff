//! Shared types passed between the imaging layer and the session.
//!
//! A [`SourceImage`] is what a successful load produces; a
//! [`ResizedArtifact`] is what a successful resize produces. Neither is
//! mutated after construction: the session replaces them wholesale.

use crate::imaging::Dimensions;
use image::DynamicImage;
use serde::Serialize;

/// A decoded, user-supplied image plus the file facts it arrived with.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: DynamicImage,
    filename: String,
    media_type: String,
    byte_size: u64,
}

impl SourceImage {
    pub fn new(pixels: DynamicImage, filename: &str, media_type: &str, byte_size: u64) -> Self {
        Self {
            pixels,
            filename: filename.to_string(),
            media_type: media_type.to_string(),
            byte_size,
        }
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width(), self.height())
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn byte_size(&self) -> u64 {
        self.byte_size
    }
}

/// Encoded output of a resize, ready to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResizedArtifact {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub extension: String,
    pub width: u32,
    pub height: u32,
}

impl ResizedArtifact {
    /// Download filename: `conv-{width}x{height}.{extension}`.
    pub fn download_name(&self) -> String {
        format!("conv-{}x{}.{}", self.width, self.height, self.extension)
    }
}
