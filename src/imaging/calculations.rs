//! Pure calculation functions for target dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! Raw dimension fields are kept as text by the session, so parsing lives
//! here too: one integer parser for resize targets and one decimal parser
//! for the aspect-ratio link.

use serde::Serialize;

/// Width and height of an image or resize target, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both axes are at least one pixel.
    pub fn is_valid_target(self) -> bool {
        self.width >= 1 && self.height >= 1
    }
}

/// One of the two dimension fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl Axis {
    /// The paired axis.
    pub fn other(self) -> Self {
        match self {
            Axis::Width => Axis::Height,
            Axis::Height => Axis::Width,
        }
    }
}

/// Compute the paired axis after `changed` was set to `value`.
///
/// Returns `None` when the aspect lock is off, when either original axis is
/// zero, or when `value` is not a positive finite number. In all of those
/// cases the paired field must be left untouched.
///
/// # Examples
/// ```
/// # use image_conv::imaging::{Axis, Dimensions, derive_linked_axis};
/// let original = Dimensions::new(800, 600);
/// assert_eq!(derive_linked_axis(original, Axis::Width, 400.0, true), Some(300));
/// assert_eq!(derive_linked_axis(original, Axis::Height, 300.0, true), Some(400));
/// assert_eq!(derive_linked_axis(original, Axis::Width, 400.0, false), None);
/// ```
pub fn derive_linked_axis(
    original: Dimensions,
    changed: Axis,
    value: f64,
    lock_aspect: bool,
) -> Option<u32> {
    if !lock_aspect || original.width == 0 || original.height == 0 {
        return None;
    }
    if !value.is_finite() || value <= 0.0 {
        return None;
    }

    let (same, other) = match changed {
        Axis::Width => (original.width, original.height),
        Axis::Height => (original.height, original.width),
    };

    // f64::round rounds halves away from zero, which for positive values is
    // the usual round-half-up.
    let linked = (value * other as f64 / same as f64).round();
    Some(linked as u32)
}

/// Parse a dimension field the way an integer form input is read.
///
/// Leading whitespace and an optional sign are accepted, then the leading
/// run of ASCII digits is taken and anything after it is ignored:
/// `"400px"` → `Some(400)`, `"12.9"` → `Some(12)`, `"-3"` → `Some(-3)`.
/// Text without leading digits is unparsed (`None`). A digit run too large
/// for `i64` saturates, so it still reads as a (far too large) number.
pub fn parse_dimension_field(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    // All digits, so the only possible failure is overflow.
    let magnitude: i64 = rest[..end].parse().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse an edited field as the decimal value fed to [`derive_linked_axis`].
///
/// Only positive finite numbers qualify; anything else means "no update".
pub fn parse_linked_value(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // derive_linked_axis tests
    // =========================================================================

    #[test]
    fn width_change_links_height() {
        // 800x600 → width 400 → 400 * 600 / 800 = 300
        let linked = derive_linked_axis(Dimensions::new(800, 600), Axis::Width, 400.0, true);
        assert_eq!(linked, Some(300));
    }

    #[test]
    fn height_change_links_width() {
        // 800x600 → height 150 → 150 * 800 / 600 = 200
        let linked = derive_linked_axis(Dimensions::new(800, 600), Axis::Height, 150.0, true);
        assert_eq!(linked, Some(200));
    }

    #[test]
    fn linked_value_rounds_to_nearest() {
        // 1000x333 → width 500 → 166.5 → 167
        let linked = derive_linked_axis(Dimensions::new(1000, 333), Axis::Width, 500.0, true);
        assert_eq!(linked, Some(167));
        // 3x2 → width 1 → 0.666 → 1
        let linked = derive_linked_axis(Dimensions::new(3, 2), Axis::Width, 1.0, true);
        assert_eq!(linked, Some(1));
    }

    #[test]
    fn unlocked_returns_none() {
        let linked = derive_linked_axis(Dimensions::new(800, 600), Axis::Width, 400.0, false);
        assert_eq!(linked, None);
    }

    #[test]
    fn non_positive_value_returns_none() {
        let original = Dimensions::new(800, 600);
        assert_eq!(derive_linked_axis(original, Axis::Width, 0.0, true), None);
        assert_eq!(derive_linked_axis(original, Axis::Width, -10.0, true), None);
        assert_eq!(derive_linked_axis(original, Axis::Width, f64::NAN, true), None);
        assert_eq!(
            derive_linked_axis(original, Axis::Width, f64::INFINITY, true),
            None
        );
    }

    #[test]
    fn zero_original_returns_none() {
        let linked = derive_linked_axis(Dimensions::new(0, 600), Axis::Width, 400.0, true);
        assert_eq!(linked, None);
    }

    #[test]
    fn fractional_input_is_used_as_is() {
        // 800x600 → width 400.5 → 300.375 → 300
        let linked = derive_linked_axis(Dimensions::new(800, 600), Axis::Width, 400.5, true);
        assert_eq!(linked, Some(300));
    }

    #[test]
    fn round_trip_stays_within_one_pixel() {
        let originals = [(800, 600), (1920, 1080), (1000, 333), (7, 3), (4032, 3024), (1, 999)];
        for (w0, h0) in originals {
            let original = Dimensions::new(w0, h0);
            for w in [1u32, 2, 17, 100, 333, 640, 1024, 2999] {
                let h = derive_linked_axis(original, Axis::Width, w as f64, true).unwrap();
                if h == 0 {
                    continue;
                }
                let back = derive_linked_axis(original, Axis::Height, h as f64, true).unwrap();
                let ratio = w0 as f64 / h0 as f64;
                // One pixel of rounding on the height axis moves the width by
                // at most ratio/2 plus half a pixel of its own rounding.
                let tolerance = (ratio / 2.0 + 0.5).max(1.0);
                assert!(
                    (back as f64 - w as f64).abs() <= tolerance,
                    "{w0}x{h0}: width {w} → height {h} → width {back}"
                );
            }
        }
    }

    #[test]
    fn round_trip_exact_for_landscape_originals() {
        // For ratios at or below 2:1 the round trip lands within ±1.
        let original = Dimensions::new(800, 600);
        for w in 1..=1600u32 {
            let h = derive_linked_axis(original, Axis::Width, w as f64, true).unwrap();
            if h == 0 {
                continue;
            }
            let back = derive_linked_axis(original, Axis::Height, h as f64, true).unwrap();
            assert!(back.abs_diff(w) <= 1, "width {w} → {h} → {back}");
        }
    }

    #[test]
    fn axis_other_flips() {
        assert_eq!(Axis::Width.other(), Axis::Height);
        assert_eq!(Axis::Height.other(), Axis::Width);
    }

    // =========================================================================
    // field parsing tests
    // =========================================================================

    #[test]
    fn parse_plain_integer() {
        assert_eq!(parse_dimension_field("400"), Some(400));
        assert_eq!(parse_dimension_field("  400"), Some(400));
    }

    #[test]
    fn parse_ignores_trailing_text() {
        assert_eq!(parse_dimension_field("400px"), Some(400));
        assert_eq!(parse_dimension_field("12.9"), Some(12));
        assert_eq!(parse_dimension_field("300 "), Some(300));
    }

    #[test]
    fn parse_keeps_sign() {
        assert_eq!(parse_dimension_field("-3"), Some(-3));
        assert_eq!(parse_dimension_field("+7"), Some(7));
        assert_eq!(parse_dimension_field("0"), Some(0));
    }

    #[test]
    fn parse_saturates_overlong_digit_runs() {
        assert_eq!(parse_dimension_field("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_dimension_field("-99999999999999999999"), Some(-i64::MAX));
    }

    #[test]
    fn parse_rejects_non_numeric() {
        assert_eq!(parse_dimension_field(""), None);
        assert_eq!(parse_dimension_field("   "), None);
        assert_eq!(parse_dimension_field("abc"), None);
        assert_eq!(parse_dimension_field("-"), None);
        assert_eq!(parse_dimension_field(".5"), None);
    }

    #[test]
    fn parse_linked_accepts_decimals() {
        assert_eq!(parse_linked_value("400.5"), Some(400.5));
        assert_eq!(parse_linked_value(" 12 "), Some(12.0));
    }

    #[test]
    fn parse_linked_rejects_non_positive() {
        assert_eq!(parse_linked_value("0"), None);
        assert_eq!(parse_linked_value("-4"), None);
        assert_eq!(parse_linked_value(""), None);
        assert_eq!(parse_linked_value("12px"), None);
    }

    #[test]
    fn valid_target_requires_both_axes() {
        assert!(Dimensions::new(1, 1).is_valid_target());
        assert!(!Dimensions::new(0, 100).is_valid_target());
        assert!(!Dimensions::new(100, 0).is_valid_target());
    }
}
