//! Print-size normalization of composited images

use crate::{
    config::SizeSpec,
    error::{BgSwapError, Result},
};
use image::{imageops, RgbImage};

/// Resize an image to a target print size
///
/// [`SizeSpec::Original`] returns the input unchanged, pixel for pixel.
/// [`SizeSpec::Exact`] resizes to exactly the target dimensions with
/// bilinear resampling, letting the aspect ratio change freely (stretch,
/// never crop or letterbox). Resampling is deterministic and touches
/// colors only through interpolation.
///
/// # Errors
/// Returns [`BgSwapError::InvalidSizeSpec`] when the target width or height
/// is non-positive.
pub fn normalize(image: RgbImage, spec: &SizeSpec) -> Result<RgbImage> {
    match *spec {
        SizeSpec::Original => Ok(image),
        SizeSpec::Exact { width, height } => {
            if width <= 0 || height <= 0 {
                return Err(BgSwapError::InvalidSizeSpec { width, height });
            }

            let target_width = width as u32;
            let target_height = height as u32;
            if image.dimensions() == (target_width, target_height) {
                return Ok(image);
            }

            Ok(imageops::resize(
                &image,
                target_width,
                target_height,
                imageops::FilterType::Triangle,
            ))
        },
    }
}
