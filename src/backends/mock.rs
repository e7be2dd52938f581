//! Mock backend implementation for testing and debugging

use crate::{
    error::Result,
    inference::{image_to_tensor, tensor_to_raw_mask, InferenceBackend},
    types::RawMask,
};
use image::RgbImage;
use ndarray::Array4;

/// Mock backend for testing and debugging purposes
///
/// Produces a deterministic brightness-based probability mask so the
/// compositing pipeline can be exercised without a real matting model:
/// each output value is the mean of the pixel's RGB channels. Bright
/// pixels score as likely foreground, dark pixels as background.
#[derive(Debug, Default)]
pub struct MockBackend;

impl MockBackend {
    /// Create a new mock backend
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl InferenceBackend for MockBackend {
    fn infer(&mut self, image: &RgbImage) -> Result<RawMask> {
        let input = image_to_tensor(image);
        let (_, _, height, width) = input.dim();

        let mut output = Array4::<f32>::zeros((1, 1, height, width));
        #[allow(clippy::indexing_slicing)]
        // Loop bounds come from the tensor's own dimensions
        for y in 0..height {
            for x in 0..width {
                let mean = (input[[0, 0, y, x]] + input[[0, 1, y, x]] + input[[0, 2, y, x]]) / 3.0;
                output[[0, 0, y, x]] = mean;
            }
        }

        tensor_to_raw_mask(&output)
    }
}
