//! Core types for the background swap pipeline

use crate::{config::OutputFormat, error::Result};
use chrono::Utc;
use image::{DynamicImage, RgbImage};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Raw single-channel probability mask produced by the inference collaborator
///
/// Values are on the native 0-255 scale. Spatial dimensions must equal the
/// source image's; a mismatch is a hard error at composite time, never a
/// silent crop or resize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMask {
    /// Per-pixel probability scores (0-255), row-major
    pub data: Vec<u8>,

    /// Mask dimensions (width, height)
    pub dimensions: (u32, u32),
}

impl RawMask {
    /// Create a new raw mask
    ///
    /// # Errors
    /// Returns an error when the buffer length does not match the dimensions.
    pub fn new(data: Vec<u8>, dimensions: (u32, u32)) -> Result<Self> {
        let expected = dimensions.0 as usize * dimensions.1 as usize;
        if data.len() != expected {
            return Err(crate::error::BgSwapError::processing(format!(
                "raw mask buffer length {} does not match dimensions {}x{}",
                data.len(),
                dimensions.0,
                dimensions.1
            )));
        }
        Ok(Self { data, dimensions })
    }

    /// Create a raw mask from a grayscale image
    #[must_use]
    pub fn from_image(image: &image::GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            data: image.as_raw().clone(),
            dimensions: (width, height),
        }
    }

    /// Mask width in pixels
    #[must_use]
    pub fn width(&self) -> u32 {
        self.dimensions.0
    }

    /// Mask height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.dimensions.1
    }
}

/// Binary foreground mask derived from thresholding a [`RawMask`]
///
/// Each value is 0 (background) or 255 (foreground). Immutable once produced
/// within a single pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryMask {
    /// Per-pixel selection values (0 or 255), row-major
    pub data: Vec<u8>,

    /// Mask dimensions (width, height)
    pub dimensions: (u32, u32),
}

impl BinaryMask {
    /// Foreground sentinel value
    pub const FOREGROUND: u8 = 255;

    /// Background sentinel value
    pub const BACKGROUND: u8 = 0;

    /// Create a new binary mask
    #[must_use]
    pub fn new(data: Vec<u8>, dimensions: (u32, u32)) -> Self {
        Self { data, dimensions }
    }

    /// Mask width in pixels
    #[must_use]
    pub fn width(&self) -> u32 {
        self.dimensions.0
    }

    /// Mask height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.dimensions.1
    }

    /// Whether the pixel at (x, y) is foreground
    #[must_use]
    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        let idx = y as usize * self.dimensions.0 as usize + x as usize;
        self.data.get(idx).is_some_and(|&v| v != Self::BACKGROUND)
    }

    /// Number of foreground pixels in the mask
    #[must_use]
    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&v| v != Self::BACKGROUND).count()
    }

    /// Convert the mask to a grayscale image
    pub fn to_image(&self) -> Result<image::GrayImage> {
        let (width, height) = self.dimensions;
        image::GrayImage::from_raw(width, height, self.data.clone()).ok_or_else(|| {
            crate::error::BgSwapError::processing("Failed to create image from mask data")
        })
    }

    /// Get mask statistics
    #[must_use]
    pub fn statistics(&self) -> MaskStatistics {
        let total_pixels = self.data.len();
        let foreground_pixels = self.foreground_count();
        let background_pixels = total_pixels - foreground_pixels;

        MaskStatistics {
            total_pixels,
            foreground_pixels,
            background_pixels,
            foreground_ratio: foreground_pixels as f32 / total_pixels.max(1) as f32,
            background_ratio: background_pixels as f32 / total_pixels.max(1) as f32,
        }
    }
}

/// Statistics about a binary mask
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskStatistics {
    pub total_pixels: usize,
    pub foreground_pixels: usize,
    pub background_pixels: usize,
    pub foreground_ratio: f32,
    pub background_ratio: f32,
}

/// Recoverable conditions surfaced alongside a successful pipeline result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineWarning {
    /// Caller-supplied threshold was not parseable; the default of 0 was used
    InvalidThreshold {
        /// The raw input that failed to parse
        input: String,
    },
}

impl std::fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidThreshold { input } => {
                write!(f, "invalid threshold '{}', default 0 substituted", input)
            },
        }
    }
}

/// Detailed timing breakdown for one pipeline run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingTimings {
    /// Image loading and decoding from file (0 for in-memory entry points)
    pub image_decode_ms: u64,

    /// Inference collaborator execution
    pub inference_ms: u64,

    /// Threshold binarization
    pub masking_ms: u64,

    /// Background substitution
    pub compositing_ms: u64,

    /// Print-size normalization
    pub resize_ms: u64,

    /// Final image encoding (if saving to file)
    pub image_encode_ms: Option<u64>,

    /// Total end-to-end processing time
    pub total_ms: u64,
}

/// Metadata about one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    /// Detailed timing breakdown
    pub timings: ProcessingTimings,

    /// Background color label the run resolved
    pub color_name: String,

    /// Print-size label the run resolved
    pub size_name: String,

    /// Effective threshold after parsing (and fallback, if any)
    pub threshold: i32,
}

impl ProcessingMetadata {
    /// Create new processing metadata
    #[must_use]
    pub fn new(color_name: String, size_name: String, threshold: i32) -> Self {
        Self {
            timings: ProcessingTimings::default(),
            color_name,
            size_name,
            threshold,
        }
    }
}

/// Result of a background swap operation
///
/// Owned solely by the caller; the pipeline retains no reference.
#[derive(Debug, Clone)]
pub struct CompositeResult {
    /// The composited (and possibly resized) image
    pub image: RgbImage,

    /// The binary mask that drove the composite
    pub mask: BinaryMask,

    /// Original image dimensions before any resize
    pub original_dimensions: (u32, u32),

    /// Processing metadata
    pub metadata: ProcessingMetadata,

    /// Recoverable conditions encountered during the run
    pub warnings: Vec<PipelineWarning>,

    /// Original input path (for logging purposes)
    pub input_path: Option<String>,
}

impl CompositeResult {
    /// Create a new composite result
    #[must_use]
    pub fn new(
        image: RgbImage,
        mask: BinaryMask,
        original_dimensions: (u32, u32),
        metadata: ProcessingMetadata,
        warnings: Vec<PipelineWarning>,
    ) -> Self {
        Self {
            image,
            mask,
            original_dimensions,
            metadata,
            warnings,
            input_path: None,
        }
    }

    /// Create a new composite result with input path
    #[must_use]
    pub fn with_input_path(
        image: RgbImage,
        mask: BinaryMask,
        original_dimensions: (u32, u32),
        metadata: ProcessingMetadata,
        warnings: Vec<PipelineWarning>,
        input_path: String,
    ) -> Self {
        Self {
            image,
            mask,
            original_dimensions,
            metadata,
            warnings,
            input_path: Some(input_path),
        }
    }

    /// Get image dimensions
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Whether any recoverable conditions were recorded during the run
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get detailed timing breakdown
    #[must_use]
    pub fn timings(&self) -> &ProcessingTimings {
        &self.metadata.timings
    }

    /// Save the result as PNG
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    /// Save the result as JPEG
    pub fn save_jpeg<P: AsRef<Path>>(&self, path: P, quality: u8) -> Result<()> {
        let mut jpeg_encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
            std::fs::File::create(path)?,
            quality,
        );
        jpeg_encoder.encode_image(&self.image)?;
        Ok(())
    }

    /// Save in the specified format
    pub fn save<P: AsRef<Path>>(&self, path: P, format: OutputFormat, quality: u8) -> Result<()> {
        match format {
            OutputFormat::Png => self.save_png(path),
            OutputFormat::Jpeg => self.save_jpeg(path, quality),
        }
    }

    /// Get the image as encoded bytes in the specified format
    pub fn to_bytes(&self, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        match format {
            OutputFormat::Png => {
                DynamicImage::ImageRgb8(self.image.clone())
                    .write_to(&mut cursor, image::ImageFormat::Png)?;
            },
            OutputFormat::Jpeg => {
                let mut jpeg_encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality);
                jpeg_encoder.encode_image(&self.image)?;
            },
        }
        Ok(buffer)
    }

    /// Save and measure encoding time (updates internal timing)
    pub fn save_with_timing<P: AsRef<Path>>(
        &mut self,
        path: P,
        format: OutputFormat,
        quality: u8,
    ) -> Result<()> {
        let path_str = path.as_ref().display().to_string();
        let encode_start = std::time::Instant::now();
        self.save(&path, format, quality)?;
        let encode_ms = encode_start.elapsed().as_millis() as u64;

        self.metadata.timings.image_encode_ms = Some(encode_ms);

        let total_time_s = self.metadata.timings.total_ms as f64 / 1000.0;
        let input_path = self.input_path.as_deref().unwrap_or("input");
        info!(
            "[{}Z INFO bgswap] Processed: {} -> {} in {:.2}s",
            Utc::now().format("%Y-%m-%dT%H:%M:%S"),
            input_path,
            path_str,
            total_time_s
        );

        Ok(())
    }
}
