//! Background substitution guided by a binary mask

use crate::{
    config::BackgroundColor,
    error::{BgSwapError, Result},
    types::BinaryMask,
};
use image::RgbImage;

/// Merge an image with a solid-color background using a binary mask
///
/// Builds a canvas filled entirely with `color` and, for every pixel,
/// selects the source image where the mask is foreground and the canvas
/// where it is background. The selection is exact, with no alpha blending
/// or edge feathering; mask edges produce hard boundaries.
///
/// # Errors
/// Returns [`BgSwapError::DimensionMismatch`] when the mask and image
/// dimensions differ. This is fatal: it means the inference collaborator
/// and the source image are desynchronized, and the run must abort rather
/// than crop or resample to reconcile.
pub fn composite(
    image: &RgbImage,
    mask: &BinaryMask,
    color: BackgroundColor,
) -> Result<RgbImage> {
    let image_dimensions = image.dimensions();
    if image_dimensions != mask.dimensions {
        return Err(BgSwapError::dimension_mismatch(
            image_dimensions,
            mask.dimensions,
        ));
    }

    let (width, height) = image_dimensions;
    let mut output = RgbImage::from_pixel(width, height, color.to_pixel());

    for (x, y, pixel) in image.enumerate_pixels() {
        if mask.is_foreground(x, y) {
            output.put_pixel(x, y, *pixel);
        }
    }

    Ok(output)
}
