//! Output format selection and resolution.
//!
//! The user picks an [`OutputFormat`]; at resize time it is resolved against
//! the source filename into a concrete [`ResolvedFormat`], the encoder to
//! run, its mime type and the extension the download gets.
//!
//! | Requested | Mime | Extension |
//! |---|---|---|
//! | `jpeg` | `image/jpeg` | `jpg` |
//! | `png` | `image/png` | `png` |
//! | `webp` | `image/webp` | `webp` |
//! | `original` (`.jpg` / `.jpeg`) | `image/jpeg` | as written, lowercased |
//! | `original` (`.png`) | `image/png` | `png` |
//! | `original` (`.webp`) | `image/webp` | `webp` |
//! | `original` (anything else) | `image/png` | `png` |

use super::params::Quality;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The format the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    Webp,
    /// Keep the source's format, decided from its filename at resize time.
    #[default]
    Original,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
            OutputFormat::Original => "original",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown output format '{0}' (expected jpeg, png, webp or original)")]
pub struct ParseFormatError(String);

impl FromStr for OutputFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::Webp),
            "original" => Ok(OutputFormat::Original),
            _ => Err(ParseFormatError(s.to_string())),
        }
    }
}

/// An encoder the backend can actually run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Encoding {
    Jpeg,
    Png,
    Webp,
}

impl Encoding {
    pub fn mime(self) -> &'static str {
        match self {
            Encoding::Jpeg => "image/jpeg",
            Encoding::Png => "image/png",
            Encoding::Webp => "image/webp",
        }
    }
}

/// Concrete encoding plus the extension the output file carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFormat {
    pub encoding: Encoding,
    pub extension: String,
}

impl ResolvedFormat {
    fn new(encoding: Encoding, extension: &str) -> Self {
        Self {
            encoding,
            extension: extension.to_string(),
        }
    }

    pub fn mime(&self) -> &'static str {
        self.encoding.mime()
    }
}

/// Resolve a requested format against the source filename.
///
/// Total: every combination yields an encoding and an extension.
pub fn resolve(requested: OutputFormat, original_filename: &str) -> ResolvedFormat {
    match requested {
        OutputFormat::Jpeg => ResolvedFormat::new(Encoding::Jpeg, "jpg"),
        OutputFormat::Png => ResolvedFormat::new(Encoding::Png, "png"),
        OutputFormat::Webp => ResolvedFormat::new(Encoding::Webp, "webp"),
        OutputFormat::Original => {
            let ext = original_filename
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_lowercase())
                .unwrap_or_default();
            match ext.as_str() {
                "jpg" | "jpeg" => ResolvedFormat::new(Encoding::Jpeg, &ext),
                "png" => ResolvedFormat::new(Encoding::Png, "png"),
                "webp" => ResolvedFormat::new(Encoding::Webp, "webp"),
                _ => ResolvedFormat::new(Encoding::Png, "png"),
            }
        }
    }
}

/// Encoding quality for a resolved format: 92 for JPEG, 80 otherwise.
///
/// PNG is lossless and ignores it.
pub fn quality_for(resolved: &ResolvedFormat) -> Quality {
    match resolved.encoding {
        Encoding::Jpeg => Quality::new(92),
        Encoding::Png | Encoding::Webp => Quality::new(80),
    }
}

/// Declared media type of a file, judged by its leading signature bytes.
///
/// Anything `infer` does not recognise as an image maps to
/// `application/octet-stream`, which the session rejects as a non-image.
pub fn media_type_of(bytes: &[u8]) -> &'static str {
    match infer::get(bytes) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => kind.mime_type(),
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_formats_ignore_filename() {
        for name in ["photo.png", "photo.JPG", "noext", ""] {
            let jpeg = resolve(OutputFormat::Jpeg, name);
            assert_eq!((jpeg.mime(), jpeg.extension.as_str()), ("image/jpeg", "jpg"));
            let png = resolve(OutputFormat::Png, name);
            assert_eq!((png.mime(), png.extension.as_str()), ("image/png", "png"));
            let webp = resolve(OutputFormat::Webp, name);
            assert_eq!((webp.mime(), webp.extension.as_str()), ("image/webp", "webp"));
        }
    }

    #[test]
    fn original_uppercase_jpg() {
        let r = resolve(OutputFormat::Original, "photo.JPG");
        assert_eq!(r.mime(), "image/jpeg");
        assert_eq!(r.extension, "jpg");
    }

    #[test]
    fn original_jpeg_keeps_extracted_extension() {
        let r = resolve(OutputFormat::Original, "scan.Jpeg");
        assert_eq!(r.mime(), "image/jpeg");
        assert_eq!(r.extension, "jpeg");
    }

    #[test]
    fn original_png_and_webp() {
        assert_eq!(
            resolve(OutputFormat::Original, "a.b.PNG"),
            ResolvedFormat::new(Encoding::Png, "png")
        );
        assert_eq!(
            resolve(OutputFormat::Original, "clip.webp"),
            ResolvedFormat::new(Encoding::Webp, "webp")
        );
    }

    #[test]
    fn original_without_extension_falls_back_to_png() {
        let r = resolve(OutputFormat::Original, "noext");
        assert_eq!(r.mime(), "image/png");
        assert_eq!(r.extension, "png");
    }

    #[test]
    fn original_unknown_extension_falls_back_to_png() {
        for name in ["anim.gif", "scan.tiff", "trailing.", ".hidden", ""] {
            let r = resolve(OutputFormat::Original, name);
            assert_eq!(r, ResolvedFormat::new(Encoding::Png, "png"), "{name}");
        }
    }

    #[test]
    fn quality_is_92_for_jpeg_only() {
        assert_eq!(quality_for(&resolve(OutputFormat::Jpeg, "x")).value(), 92);
        assert_eq!(quality_for(&resolve(OutputFormat::Original, "x.jpg")).value(), 92);
        assert_eq!(quality_for(&resolve(OutputFormat::Png, "x")).value(), 80);
        assert_eq!(quality_for(&resolve(OutputFormat::Webp, "x")).value(), 80);
    }

    #[test]
    fn parse_output_format() {
        assert_eq!("jpeg".parse::<OutputFormat>(), Ok(OutputFormat::Jpeg));
        assert_eq!("JPG".parse::<OutputFormat>(), Ok(OutputFormat::Jpeg));
        assert_eq!("png".parse::<OutputFormat>(), Ok(OutputFormat::Png));
        assert_eq!(" webp ".parse::<OutputFormat>(), Ok(OutputFormat::Webp));
        assert_eq!("Original".parse::<OutputFormat>(), Ok(OutputFormat::Original));
        assert!("gif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn default_format_is_original() {
        assert_eq!(OutputFormat::default(), OutputFormat::Original);
        assert_eq!(OutputFormat::Original.to_string(), "original");
    }

    #[test]
    fn media_type_from_signature() {
        assert_eq!(media_type_of(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0]), "image/jpeg");
        assert_eq!(media_type_of(b"\x89PNG\r\n\x1a\n\0\0"), "image/png");
        assert_eq!(media_type_of(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
        assert_eq!(media_type_of(b"GIF89a\0\0"), "image/gif");
    }

    #[test]
    fn non_images_are_octet_stream() {
        assert_eq!(media_type_of(b"hello, world"), "application/octet-stream");
        assert_eq!(media_type_of(b""), "application/octet-stream");
        // A zip is recognised, but it is not an image.
        assert_eq!(
            media_type_of(b"PK\x03\x04\x14\0\0\0"),
            "application/octet-stream"
        );
    }
}
