//! High-level image operations.
//!
//! These functions combine calculations with backend execution. They take
//! the raw target fields and the requested format, compute render
//! parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{Dimensions, parse_dimension_field};
use super::format::{OutputFormat, quality_for, resolve};
use super::params::{Background, RenderParams, ResampleFilter};
use crate::types::{ResizedArtifact, SourceImage};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("Invalid dimensions: {width}x{height} (both must be at least 1)")]
    InvalidDimensions { width: i64, height: i64 },
    #[error("Encoding failed: {0}")]
    EncodingFailed(#[source] BackendError),
}

/// Raw resize target as read from the two dimension fields.
///
/// `None` means the field was empty or did not start with a number; the
/// corresponding original dimension is used instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetInput {
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl TargetInput {
    pub fn new(width: Option<i64>, height: Option<i64>) -> Self {
        Self { width, height }
    }

    /// Parse the text of the width and height fields.
    pub fn from_fields(width: &str, height: &str) -> Self {
        Self {
            width: parse_dimension_field(width),
            height: parse_dimension_field(height),
        }
    }
}

impl From<Dimensions> for TargetInput {
    fn from(dims: Dimensions) -> Self {
        Self::new(Some(dims.width.into()), Some(dims.height.into()))
    }
}

/// Render settings that do not change between resizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSettings {
    pub background: Background,
    pub filter: ResampleFilter,
}

/// Substitute missing fields with the original size and validate the result.
pub fn resolve_target(original: Dimensions, target: TargetInput) -> Result<Dimensions, ResizeError> {
    let width = target.width.unwrap_or(original.width.into());
    let height = target.height.unwrap_or(original.height.into());

    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if Dimensions::new(w, h).is_valid_target() => Ok(Dimensions::new(w, h)),
        _ => Err(ResizeError::InvalidDimensions { width, height }),
    }
}

/// Plan a render without executing it.
///
/// Resolves the format against the source filename and picks the quality.
/// Returns the parameters together with the extension the output will carry.
pub fn plan_render(
    source: &SourceImage,
    target: Dimensions,
    format: OutputFormat,
    settings: &RenderSettings,
) -> (RenderParams, String) {
    let resolved = resolve(format, source.filename());
    let params = RenderParams {
        width: target.width,
        height: target.height,
        encoding: resolved.encoding,
        quality: quality_for(&resolved),
        background: settings.background,
        filter: settings.filter,
    };
    (params, resolved.extension)
}

/// Resize `source` to the target fields and encode it in the requested format.
///
/// Dimensions are validated before the backend is touched, so an invalid
/// target never allocates a surface. Encoding failures come back as
/// [`ResizeError::EncodingFailed`] with no artifact produced.
pub fn resize(
    backend: &impl ImageBackend,
    source: &SourceImage,
    target: TargetInput,
    format: OutputFormat,
    settings: &RenderSettings,
) -> Result<ResizedArtifact, ResizeError> {
    let dims = resolve_target(source.dimensions(), target)?;
    let (params, extension) = plan_render(source, dims, format, settings);

    debug!(
        width = params.width,
        height = params.height,
        mime = params.encoding.mime(),
        quality = params.quality.value(),
        filter = ?params.filter,
        "rendering resize"
    );

    let bytes = backend
        .render(source.pixels(), &params)
        .map_err(ResizeError::EncodingFailed)?;

    Ok(ResizedArtifact {
        bytes,
        mime: params.encoding.mime(),
        extension,
        width: params.width,
        height: params.height,
    })
}
