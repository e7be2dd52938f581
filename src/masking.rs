//! Threshold binarization of raw probability masks

use crate::types::{BinaryMask, PipelineWarning, RawMask};
use log::warn;

/// Default threshold substituted when the caller-supplied value fails to parse
pub const DEFAULT_THRESHOLD: i32 = 0;

/// Parse a caller-supplied threshold string
///
/// The input typically comes from a text field, so surrounding ASCII
/// whitespace is tolerated. A value that does not parse as an integer is a
/// recoverable condition: the default of 0 is substituted and an
/// [`PipelineWarning::InvalidThreshold`] is returned for the caller to
/// surface. The run continues.
#[must_use]
pub fn parse_threshold(input: &str) -> (i32, Option<PipelineWarning>) {
    match input.trim().parse::<i32>() {
        Ok(threshold) => (threshold, None),
        Err(_) => {
            warn!(
                "invalid threshold '{}', substituting default {}",
                input, DEFAULT_THRESHOLD
            );
            (
                DEFAULT_THRESHOLD,
                Some(PipelineWarning::InvalidThreshold {
                    input: input.to_string(),
                }),
            )
        },
    }
}

/// Binarize a raw probability mask against a threshold
///
/// For every pixel `p`, the output is foreground (255) when
/// `raw[p] >= threshold`, else background (0). A pure per-element map with
/// no neighbor interaction or smoothing. Thresholds outside `[0, 255]` are
/// legal and are not clamped: values above 255 select no pixels, values
/// at or below 0 select all of them (raw values are unsigned).
#[must_use]
pub fn binarize(raw: &RawMask, threshold: i32) -> BinaryMask {
    let data = raw
        .data
        .iter()
        .map(|&value| {
            if i32::from(value) >= threshold {
                BinaryMask::FOREGROUND
            } else {
                BinaryMask::BACKGROUND
            }
        })
        .collect();

    BinaryMask::new(data, raw.dimensions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(data: Vec<u8>, w: u32, h: u32) -> RawMask {
        RawMask::new(data, (w, h)).unwrap()
    }

    #[test]
    fn test_parse_threshold_valid() {
        assert_eq!(parse_threshold("128"), (128, None));
        assert_eq!(parse_threshold("0"), (0, None));
        assert_eq!(parse_threshold("-5"), (-5, None));
        assert_eq!(parse_threshold("300"), (300, None));
        assert_eq!(parse_threshold("  42 "), (42, None));
    }

    #[test]
    fn test_parse_threshold_invalid_defaults_with_warning() {
        let (threshold, warning) = parse_threshold("abc");
        assert_eq!(threshold, DEFAULT_THRESHOLD);
        assert_eq!(
            warning,
            Some(PipelineWarning::InvalidThreshold {
                input: "abc".to_string()
            })
        );

        let (threshold, warning) = parse_threshold("12.5");
        assert_eq!(threshold, DEFAULT_THRESHOLD);
        assert!(warning.is_some());

        let (threshold, warning) = parse_threshold("");
        assert_eq!(threshold, DEFAULT_THRESHOLD);
        assert!(warning.is_some());
    }

    #[test]
    fn test_binarize_per_pixel_predicate() {
        let mask = binarize(&raw(vec![0, 127, 128, 255], 2, 2), 128);
        assert_eq!(mask.data, vec![0, 0, 255, 255]);
        assert_eq!(mask.dimensions, (2, 2));
    }

    #[test]
    fn test_binarize_threshold_zero_selects_all() {
        let mask = binarize(&raw(vec![0, 1, 254, 255], 2, 2), 0);
        assert_eq!(mask.foreground_count(), 4);
    }

    #[test]
    fn test_binarize_out_of_range_thresholds_not_clamped() {
        let values = raw(vec![0, 64, 128, 255], 2, 2);

        // Above the u8 range: selects nothing
        let none = binarize(&values, 256);
        assert_eq!(none.foreground_count(), 0);

        // Below the u8 range: selects everything
        let all = binarize(&values, -1);
        assert_eq!(all.foreground_count(), 4);
    }

    #[test]
    fn test_binarize_boundary_is_inclusive() {
        let mask = binarize(&raw(vec![199, 200, 201, 0], 2, 2), 200);
        assert_eq!(mask.data, vec![0, 255, 255, 0]);
    }

    #[test]
    fn test_binarize_monotonic_in_threshold() {
        let values = raw(vec![0, 10, 50, 90, 130, 170, 210, 250, 255], 3, 3);
        let mut previous = usize::MAX;
        for threshold in [-10, 0, 50, 128, 200, 255, 300] {
            let count = binarize(&values, threshold).foreground_count();
            assert!(
                count <= previous,
                "foreground count increased from {} to {} at threshold {}",
                previous,
                count,
                threshold
            );
            previous = count;
        }
    }
}
