//! Display formatting for file metadata, notices and CLI results.
//!
//! # Derived Metadata
//!
//! Once an image is loaded, four read-only facts are shown about it:
//!
//! ```text
//! Name:       holiday-panorama-fin...
//! Size:       1.5 MB
//! Resolution: 4032 × 3024
//! Type:       JPEG
//! ```
//!
//! - names longer than 20 characters are cut to 20 and suffixed with `...`
//! - sizes are `B` below 1024 bytes, `KB` with one decimal below 1 MiB,
//!   `MB` with one decimal from 1 MiB up
//! - the type label is the uppercased subtype of the media type
//!
//! # Architecture
//!
//! Each display has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure and do no I/O.

use crate::config::Preset;
use crate::session::{Notice, NoticeLevel};
use crate::types::SourceImage;
use serde::Serialize;
use std::path::Path;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Names longer than this many characters are truncated for display.
const MAX_NAME_CHARS: usize = 20;

// ============================================================================
// Metadata helpers
// ============================================================================

/// Human-readable file size: `500 B`, `2.0 KB`, `1.5 MB`.
///
/// Ties round up (`1280` → `1.3 KB`).
pub fn format_file_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.1} KB", round_tenths(bytes as f64 / KIB as f64))
    } else {
        format!("{:.1} MB", round_tenths(bytes as f64 / MIB as f64))
    }
}

/// `{:.1}` alone rounds ties to even.
fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Truncate a filename to 20 characters, appending `...` if truncated.
pub fn truncate_filename(name: &str) -> String {
    if name.chars().count() <= MAX_NAME_CHARS {
        name.to_string()
    } else {
        let head: String = name.chars().take(MAX_NAME_CHARS).collect();
        format!("{}...", head)
    }
}

/// Resolution as `"{width} × {height}"`.
pub fn format_resolution(width: u32, height: u32) -> String {
    format!("{} × {}", width, height)
}

/// Uppercased media subtype: `image/jpeg` → `JPEG`.
pub fn format_type_label(media_type: &str) -> String {
    media_type
        .split_once('/')
        .map(|(_, subtype)| subtype)
        .unwrap_or(media_type)
        .to_uppercase()
}

/// The read-only facts shown for a loaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub name: String,
    pub size: String,
    pub resolution: String,
    pub format: String,
}

impl FileInfo {
    pub fn from_source(source: &SourceImage) -> Self {
        Self {
            name: truncate_filename(source.filename()),
            size: format_file_size(source.byte_size()),
            resolution: format_resolution(source.width(), source.height()),
            format: format_type_label(source.media_type()),
        }
    }
}

// ============================================================================
// Display blocks
// ============================================================================

/// Format the metadata block for a loaded image.
pub fn format_file_info(info: &FileInfo) -> Vec<String> {
    vec![
        format!("Name:       {}", info.name),
        format!("Size:       {}", info.size),
        format!("Resolution: {}", info.resolution),
        format!("Type:       {}", info.format),
    ]
}

/// Print the metadata block to stdout.
pub fn print_file_info(info: &FileInfo) {
    for line in format_file_info(info) {
        println!("{}", line);
    }
}

/// Format a notice as a single status line.
pub fn format_notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Success => format!("ok: {}", notice.message),
        NoticeLevel::Error => format!("error: {}", notice.message),
    }
}

/// Format the preset list, marking the active one with `*`.
///
/// ```text
/// * instagram   1080 × 1080
///   hd          1280 × 720
/// ```
pub fn format_presets(presets: &[Preset], active: Option<&str>) -> Vec<String> {
    let width = presets.iter().map(|p| p.name.len()).max().unwrap_or(0);
    presets
        .iter()
        .map(|p| {
            let marker = if active == Some(p.name.as_str()) { '*' } else { ' ' };
            format!(
                "{} {:<width$}  {}",
                marker,
                p.name,
                format_resolution(p.width, p.height),
                width = width
            )
        })
        .collect()
}

/// Print the preset list to stdout.
pub fn print_presets(presets: &[Preset], active: Option<&str>) {
    for line in format_presets(presets, active) {
        println!("{}", line);
    }
}

// ============================================================================
// Resize result
// ============================================================================

/// Summary of a completed resize, printed as text or JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResizeReport {
    pub source: FileInfo,
    pub output: String,
    pub mime: String,
    pub width: u32,
    pub height: u32,
    pub bytes: u64,
}

impl ResizeReport {
    pub fn new(source: FileInfo, output: &Path, mime: &str, width: u32, height: u32, bytes: u64) -> Self {
        Self {
            source,
            output: output.display().to_string(),
            mime: mime.to_string(),
            width,
            height,
            bytes,
        }
    }
}

/// Format a resize result: source facts, then the written artifact.
pub fn format_resize_report(report: &ResizeReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({}, {}, {})",
        report.source.name, report.source.format, report.source.resolution, report.source.size
    )];
    lines.push(format!(
        "    → {} ({}, {}, {})",
        report.output,
        report.mime,
        format_resolution(report.width, report.height),
        format_file_size(report.bytes)
    ));
    lines
}

/// Print a resize result to stdout.
pub fn print_resize_report(report: &ResizeReport) {
    for line in format_resize_report(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;

    // =========================================================================
    // Metadata helpers
    // =========================================================================

    #[test]
    fn file_size_bytes() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(500), "500 B");
        assert_eq!(format_file_size(1023), "1023 B");
    }

    #[test]
    fn file_size_kilobytes() {
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
    }

    #[test]
    fn file_size_megabytes() {
        assert_eq!(format_file_size(1_048_576), "1.0 MB");
        assert_eq!(format_file_size(1_572_864), "1.5 MB");
    }

    #[test]
    fn file_size_ties_round_up() {
        assert_eq!(format_file_size(1280), "1.3 KB");
        assert_eq!(format_file_size(1_310_720), "1.3 MB");
    }

    #[test]
    fn filename_short_is_unchanged() {
        assert_eq!(truncate_filename("pic.jpg"), "pic.jpg");
        assert_eq!(truncate_filename("exactly-twenty-chars"), "exactly-twenty-chars");
    }

    #[test]
    fn filename_long_is_truncated() {
        assert_eq!(
            truncate_filename("holiday-panorama-final-v2.jpg"),
            "holiday-panorama-fin..."
        );
    }

    #[test]
    fn filename_truncation_counts_characters() {
        let name = "ééééééééééééééééééééé.png";
        assert_eq!(truncate_filename(name), format!("{}...", "é".repeat(20)));
    }

    #[test]
    fn resolution_uses_times_sign() {
        assert_eq!(format_resolution(800, 600), "800 × 600");
    }

    #[test]
    fn type_label_uppercases_subtype() {
        assert_eq!(format_type_label("image/jpeg"), "JPEG");
        assert_eq!(format_type_label("image/webp"), "WEBP");
        assert_eq!(format_type_label("image/x-icon"), "X-ICON");
        assert_eq!(format_type_label("png"), "PNG");
    }

    #[test]
    fn file_info_from_source() {
        let source = SourceImage::new(
            DynamicImage::new_rgb8(800, 600),
            "pic.jpg",
            "image/jpeg",
            2048,
        );
        assert_eq!(
            FileInfo::from_source(&source),
            FileInfo {
                name: "pic.jpg".to_string(),
                size: "2.0 KB".to_string(),
                resolution: "800 × 600".to_string(),
                format: "JPEG".to_string(),
            }
        );
    }

    // =========================================================================
    // Display blocks
    // =========================================================================

    #[test]
    fn notice_levels() {
        assert_eq!(
            format_notice(&Notice::success("Image resized successfully")),
            "ok: Image resized successfully"
        );
        assert_eq!(
            format_notice(&Notice::error("Please enter valid dimensions")),
            "error: Please enter valid dimensions"
        );
    }

    #[test]
    fn presets_are_aligned_and_marked() {
        let presets = vec![Preset::new("hd", 1280, 720), Preset::new("instagram", 1080, 1080)];
        let lines = format_presets(&presets, Some("hd"));
        assert_eq!(
            lines,
            vec![
                "* hd         1280 × 720".to_string(),
                "  instagram  1080 × 1080".to_string(),
            ]
        );
    }

    #[test]
    fn presets_empty() {
        assert!(format_presets(&[], None).is_empty());
    }

    #[test]
    fn resize_report_lines() {
        let report = ResizeReport::new(
            FileInfo {
                name: "pic.jpg".to_string(),
                size: "2.0 KB".to_string(),
                resolution: "800 × 600".to_string(),
                format: "JPEG".to_string(),
            },
            Path::new("out/conv-400x300.jpg"),
            "image/jpeg",
            400,
            300,
            500,
        );
        assert_eq!(
            format_resize_report(&report),
            vec![
                "pic.jpg (JPEG, 800 × 600, 2.0 KB)".to_string(),
                "    → out/conv-400x300.jpg (image/jpeg, 400 × 300, 500 B)".to_string(),
            ]
        );
    }
}
