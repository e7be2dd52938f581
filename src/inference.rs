//! Inference collaborator abstraction
//!
//! The pipeline treats mask inference as an opaque, already-invoked
//! dependency behind a single-method trait. Implementations own model
//! loading, warm-up, and batching; the core never does.

use crate::{
    error::{BgSwapError, Result},
    types::RawMask,
};
use image::RgbImage;
use ndarray::Array4;

/// Capability that produces a raw probability mask for an image
///
/// The returned mask must have the same spatial dimensions as the input
/// image; the pipeline verifies this and aborts on mismatch.
pub trait InferenceBackend {
    /// Run inference on the image and return its probability mask
    ///
    /// # Errors
    /// - Backend-specific inference failures
    /// - Output shape or value conversion errors
    fn infer(&mut self, image: &RgbImage) -> Result<RawMask>;
}

/// Convert an RGB image to the float32 NCHW tensor a matting network consumes
///
/// Values are the raw 0-255 channel bytes cast to `f32`; no mean/std
/// normalization is applied.
#[must_use]
pub fn image_to_tensor(image: &RgbImage) -> Array4<f32> {
    let (width, height) = image.dimensions();
    let mut tensor = Array4::<f32>::zeros((1, 3, height as usize, width as usize));

    #[allow(clippy::indexing_slicing)]
    // Tensor dimensions pre-allocated to match the image
    for (x, y, pixel) in image.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        tensor[[0, 0, y, x]] = f32::from(pixel[0]);
        tensor[[0, 1, y, x]] = f32::from(pixel[1]);
        tensor[[0, 2, y, x]] = f32::from(pixel[2]);
    }

    tensor
}

/// Convert a single-channel float mask tensor to a [`RawMask`]
///
/// Expects a `(1, 1, height, width)` tensor whose values are already on the
/// native 0-255 scale; each value is clamped into range and rounded.
///
/// # Errors
/// Returns a processing error for tensors that are not single-batch,
/// single-channel.
pub fn tensor_to_raw_mask(tensor: &Array4<f32>) -> Result<RawMask> {
    let (batch, channels, height, width) = tensor.dim();
    if batch != 1 || channels != 1 {
        return Err(BgSwapError::processing(
            "Expected single-channel output tensor",
        ));
    }

    let mut data = Vec::with_capacity(height * width);
    #[allow(clippy::indexing_slicing)]
    // Loop bounds come from the tensor's own dimensions
    for y in 0..height {
        for x in 0..width {
            let value = tensor[[0, 0, y, x]].clamp(0.0, 255.0).round();
            data.push(value as u8);
        }
    }

    RawMask::new(data, (width as u32, height as u32))
}
