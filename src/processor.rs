//! Unified background swap processor
//!
//! This module provides the main `BackgroundSwapProcessor` that sequences
//! the pipeline stages (inference, binarization, compositing, size
//! normalization) and consolidates all business logic for one run, so
//! every frontend gets identical behavior.

use crate::{
    compositing::composite,
    config::{OutputFormat, StudioConfig},
    error::{BgSwapError, Result},
    inference::InferenceBackend,
    masking::{binarize, parse_threshold},
    services::ImageIOService,
    sizing::normalize,
    types::{CompositeResult, PipelineWarning, ProcessingMetadata, ProcessingTimings, RawMask},
};
use image::RgbImage;
use instant::Instant;
use log::{debug, info};
use std::path::{Path, PathBuf};
use tracing::{instrument, span, Level};

/// Per-run request: the caller-supplied labels driving one swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    /// Threshold input as typed by the caller (parse failures are
    /// recoverable and fall back to the default)
    pub threshold: String,

    /// Background color label, resolved against the palette
    pub color: String,

    /// Print-size label, resolved against the size chart
    pub size: String,
}

impl SwapRequest {
    /// Create a new request
    pub fn new<T, C, S>(threshold: T, color: C, size: S) -> Self
    where
        T: Into<String>,
        C: Into<String>,
        S: Into<String>,
    {
        Self {
            threshold: threshold.into(),
            color: color.into(),
            size: size.into(),
        }
    }
}

/// Unified configuration for the background swap processor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Output format used when saving results
    pub output_format: OutputFormat,

    /// JPEG quality (0-100)
    pub jpeg_quality: u8,
}

impl ProcessorConfig {
    /// Create a new processor configuration builder
    #[must_use]
    pub fn builder() -> ProcessorConfigBuilder {
        ProcessorConfigBuilder::new()
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::default(),
            jpeg_quality: 90,
        }
    }
}

/// Builder for `ProcessorConfig`
pub struct ProcessorConfigBuilder {
    config: ProcessorConfig,
}

impl ProcessorConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ProcessorConfig::default(),
        }
    }

    #[must_use]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    #[must_use]
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality;
        self
    }

    /// Build the processor configuration
    ///
    /// # Errors
    ///
    /// Returns `BgSwapError` for invalid quality values (> 100)
    pub fn build(self) -> Result<ProcessorConfig> {
        if self.config.jpeg_quality > 100 {
            return Err(BgSwapError::invalid_config("JPEG quality must be 0-100"));
        }

        Ok(self.config)
    }
}

impl Default for ProcessorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Background swap processor that sequences the full pipeline
///
/// Owns the inference collaborator and the configuration mappings, both
/// supplied at construction. All buffers are created fresh per run and the
/// result is returned by value; nothing is shared across invocations.
pub struct BackgroundSwapProcessor {
    backend: Box<dyn InferenceBackend>,
    studio: StudioConfig,
    config: ProcessorConfig,
}

impl BackgroundSwapProcessor {
    /// Create a new processor with the default output configuration
    #[must_use]
    pub fn new(studio: StudioConfig, backend: Box<dyn InferenceBackend>) -> Self {
        Self::with_config(studio, backend, ProcessorConfig::default())
    }

    /// Create a new processor with an explicit output configuration
    #[must_use]
    pub fn with_config(
        studio: StudioConfig,
        backend: Box<dyn InferenceBackend>,
        config: ProcessorConfig,
    ) -> Self {
        Self {
            backend,
            studio,
            config,
        }
    }

    /// The configuration mappings this processor resolves labels against
    #[must_use]
    pub fn studio(&self) -> &StudioConfig {
        &self.studio
    }

    /// The output configuration
    #[must_use]
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Process an image file for background swap
    ///
    /// # Errors
    ///
    /// Returns `BgSwapError` for:
    /// - File I/O errors when reading input
    /// - Image format parsing failures
    /// - Pipeline errors (see [`Self::process_image`])
    pub fn process_file<P: AsRef<Path>>(
        &mut self,
        input_path: P,
        request: &SwapRequest,
    ) -> Result<CompositeResult> {
        let input_path_ref = input_path.as_ref();
        let input_path_str = input_path_ref.display().to_string();

        let decode_start = Instant::now();
        let image = ImageIOService::load_image(input_path_ref)?.to_rgb8();
        let decode_ms = decode_start.elapsed().as_millis() as u64;

        debug!(
            "Image decoded: {}x{} in {}ms",
            image.width(),
            image.height(),
            decode_ms
        );

        let mut result = self.process_image(&image, request)?;
        result.metadata.timings.image_decode_ms = decode_ms;
        result.metadata.timings.total_ms += decode_ms;
        result.input_path = Some(input_path_str);
        Ok(result)
    }

    /// Process image data from bytes
    ///
    /// # Errors
    ///
    /// Returns `BgSwapError` for:
    /// - Image decoding failures
    /// - Pipeline errors (see [`Self::process_image`])
    pub fn process_bytes(&mut self, image_bytes: &[u8], request: &SwapRequest) -> Result<CompositeResult> {
        let image = ImageIOService::load_from_bytes(image_bytes)?.to_rgb8();
        self.process_image(&image, request)
    }

    /// Process image data from an async reader stream
    ///
    /// # Errors
    ///
    /// Returns `BgSwapError` for:
    /// - Stream reading failures
    /// - Image decoding failures
    /// - Pipeline errors (see [`Self::process_image`])
    pub async fn process_reader<R: tokio::io::AsyncRead + Unpin>(
        &mut self,
        reader: R,
        request: &SwapRequest,
    ) -> Result<CompositeResult> {
        let image = ImageIOService::load_from_reader(reader).await?.to_rgb8();
        self.process_image(&image, request)
    }

    /// Save a processed result next to its input under the derived name
    ///
    /// Output format and JPEG quality come from the processor's
    /// configuration. Returns the path written to.
    ///
    /// # Errors
    ///
    /// Returns `BgSwapError` when the result carries no input path or when
    /// encoding fails.
    pub fn save_result(&self, result: &mut CompositeResult) -> Result<PathBuf> {
        ImageIOService::save_composite_derived(
            result,
            self.config.output_format,
            self.config.jpeg_quality,
        )
    }

    /// Run the full pipeline on an in-memory image
    ///
    /// Stages: inference -> mask dimension validation -> threshold parse ->
    /// binarize -> color resolution -> composite -> size resolution ->
    /// normalize. The first fatal error aborts the run; an unparseable
    /// threshold is the one recoverable condition and is reported as a
    /// warning on the successful result.
    ///
    /// # Errors
    ///
    /// Returns `BgSwapError` for:
    /// - Inference collaborator failures
    /// - Mask/image dimension mismatches
    /// - Unknown color or size labels
    /// - Non-positive resolved target sizes
    #[instrument(
        skip(self, image),
        fields(
            dimensions = %format!("{}x{}", image.width(), image.height()),
            color = %request.color,
            size = %request.size,
        )
    )]
    pub fn process_image(
        &mut self,
        image: &RgbImage,
        request: &SwapRequest,
    ) -> Result<CompositeResult> {
        let total_start = Instant::now();
        let original_dimensions = image.dimensions();

        info!(
            "Starting background swap: {}x{} -> color '{}', size '{}'",
            original_dimensions.0, original_dimensions.1, request.color, request.size
        );

        // Inference collaborator produces the raw probability mask
        let (raw_mask, inference_ms) = {
            let _span = span!(Level::INFO, "inference").entered();
            let inference_start = Instant::now();
            let raw_mask = self.backend.infer(image)?;
            (raw_mask, inference_start.elapsed().as_millis() as u64)
        };

        let mut result = self.process_with_mask(image, &raw_mask, request)?;
        result.metadata.timings.inference_ms = inference_ms;
        result.metadata.timings.total_ms = total_start.elapsed().as_millis() as u64;
        Ok(result)
    }

    /// Run the compositing pipeline with an already-computed raw mask
    ///
    /// Skips inference entirely; useful when the mask comes from elsewhere
    /// or when the same mask is reused with several colors or sizes.
    ///
    /// # Errors
    ///
    /// Returns `BgSwapError` for:
    /// - Mask/image dimension mismatches
    /// - Unknown color or size labels
    /// - Non-positive resolved target sizes
    pub fn process_with_mask(
        &self,
        image: &RgbImage,
        raw_mask: &RawMask,
        request: &SwapRequest,
    ) -> Result<CompositeResult> {
        let total_start = Instant::now();
        let mut timings = ProcessingTimings::default();
        let mut warnings: Vec<PipelineWarning> = Vec::new();
        let original_dimensions = image.dimensions();

        // A mask that disagrees with the image means inference and source
        // are desynchronized. Abort; never crop or resample to reconcile.
        if raw_mask.dimensions != original_dimensions {
            return Err(BgSwapError::dimension_mismatch(
                original_dimensions,
                raw_mask.dimensions,
            ));
        }

        let (threshold, threshold_warning) = parse_threshold(&request.threshold);
        if let Some(warning) = threshold_warning {
            warnings.push(warning);
        }

        let mask = {
            let _span = span!(Level::DEBUG, "binarize", threshold).entered();
            let masking_start = Instant::now();
            let mask = binarize(raw_mask, threshold);
            timings.masking_ms = masking_start.elapsed().as_millis() as u64;
            mask
        };

        debug!(
            "Binarized mask at threshold {}: {} of {} pixels foreground",
            threshold,
            mask.foreground_count(),
            mask.data.len()
        );

        let color = self.studio.colors.resolve(&request.color)?;
        let composited = {
            let _span = span!(Level::DEBUG, "composite").entered();
            let compositing_start = Instant::now();
            let composited = composite(image, &mask, color)?;
            timings.compositing_ms = compositing_start.elapsed().as_millis() as u64;
            composited
        };

        let size_spec = self.studio.sizes.resolve(&request.size)?;
        let final_image = {
            let _span = span!(Level::DEBUG, "normalize").entered();
            let resize_start = Instant::now();
            let final_image = normalize(composited, &size_spec)?;
            timings.resize_ms = resize_start.elapsed().as_millis() as u64;
            final_image
        };

        timings.total_ms = total_start.elapsed().as_millis() as u64;

        info!(
            "Background swap completed: {}x{} -> {}x{} in {}ms",
            original_dimensions.0,
            original_dimensions.1,
            final_image.width(),
            final_image.height(),
            timings.total_ms
        );

        let mut metadata =
            ProcessingMetadata::new(request.color.clone(), request.size.clone(), threshold);
        metadata.timings = timings;

        Ok(CompositeResult::new(
            final_image,
            mask,
            original_dimensions,
            metadata,
            warnings,
        ))
    }
}
