#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # ID-Photo Background Swap Library
//!
//! A Rust library that replaces the background of a portrait photograph
//! with a solid color and normalizes the result to a standard print size,
//! driven by a pre-computed foreground/background probability mask.
//!
//! The pipeline has three stages, invoked once per image:
//!
//! - **Masking**: binarize the raw probability mask against a threshold
//! - **Compositing**: merge the portrait with a solid-color canvas using
//!   the binary mask (an exact per-pixel cut, no blending)
//! - **Sizing**: resize to a named print size, or leave unchanged
//!
//! Mask inference itself is an external collaborator behind the
//! [`InferenceBackend`] trait; the library ships a deterministic
//! [`MockBackend`] so the pipeline can be exercised and tested without a
//! model. Color and size labels are resolved against an explicit
//! [`StudioConfig`] passed in at construction.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use idphoto_bgswap::{
//!     BackgroundSwapProcessor, MockBackend, StudioConfig, SwapRequest,
//! };
//!
//! # fn example() -> anyhow::Result<()> {
//! let mut processor = BackgroundSwapProcessor::new(
//!     StudioConfig::builtin(),
//!     Box::new(MockBackend::new()),
//! );
//!
//! let request = SwapRequest::new("128", "blue", "two_inch");
//! let result = processor.process_file("portrait.jpg", &request)?;
//!
//! for warning in &result.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//! result.save_jpeg("portrait_blue.jpg", 90)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom configuration
//!
//! ```rust,no_run
//! use idphoto_bgswap::StudioConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! // name -> [r, g, b] and name -> [width, height] | "none"
//! let config = StudioConfig::from_json_file("studio.json")?;
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod compositing;
pub mod config;
pub mod error;
pub mod inference;
pub mod masking;
pub mod processor;
pub mod services;
pub mod sizing;
pub mod types;

// Internal imports for lib functions
use tokio::io::AsyncRead;

// Public API exports
pub use backends::MockBackend;
pub use compositing::composite;
pub use config::{
    BackgroundColor, ColorPalette, OutputFormat, SizeChart, SizeSpec, StudioConfig, SIZE_NONE,
};
pub use error::{BgSwapError, Result};
pub use inference::{image_to_tensor, tensor_to_raw_mask, InferenceBackend};
pub use masking::{binarize, parse_threshold, DEFAULT_THRESHOLD};
pub use processor::{
    BackgroundSwapProcessor, ProcessorConfig, ProcessorConfigBuilder, SwapRequest,
};
pub use services::ImageIOService;
pub use sizing::normalize;
pub use types::{
    BinaryMask, CompositeResult, MaskStatistics, PipelineWarning, ProcessingMetadata,
    ProcessingTimings, RawMask,
};

/// Swap the background of an in-memory image
///
/// Constructs a single-use processor around the given collaborators and
/// runs the full pipeline once.
///
/// # Examples
///
/// ```rust,no_run
/// use idphoto_bgswap::{swap_background_from_image, MockBackend, StudioConfig, SwapRequest};
///
/// # fn example(image: image::RgbImage) -> anyhow::Result<()> {
/// let result = swap_background_from_image(
///     &image,
///     Box::new(MockBackend::new()),
///     &StudioConfig::builtin(),
///     &SwapRequest::new("128", "red", "one_inch"),
/// )?;
/// # Ok(())
/// # }
/// ```
pub fn swap_background_from_image(
    image: &image::RgbImage,
    backend: Box<dyn InferenceBackend>,
    config: &StudioConfig,
    request: &SwapRequest,
) -> Result<CompositeResult> {
    let mut processor = BackgroundSwapProcessor::new(config.clone(), backend);
    processor.process_image(image, request)
}

/// Swap the background of an image provided as encoded bytes
///
/// Suitable for web servers and memory-based processing where no file is
/// available. The bytes may be any format the `image` crate decodes
/// (JPEG, PNG, BMP).
pub fn swap_background_from_bytes(
    image_bytes: &[u8],
    backend: Box<dyn InferenceBackend>,
    config: &StudioConfig,
    request: &SwapRequest,
) -> Result<CompositeResult> {
    let mut processor = BackgroundSwapProcessor::new(config.clone(), backend);
    processor.process_bytes(image_bytes, request)
}

/// Swap the background of an image read from an async stream
///
/// Accepts any async readable stream, making it suitable for processing
/// images from network connections or large files without buffering them
/// beforehand.
///
/// # Examples
///
/// ```rust,no_run
/// use idphoto_bgswap::{swap_background_from_reader, MockBackend, StudioConfig, SwapRequest};
/// use tokio::fs::File;
///
/// # async fn example() -> anyhow::Result<()> {
/// let file = File::open("portrait.jpg").await?;
/// let result = swap_background_from_reader(
///     file,
///     Box::new(MockBackend::new()),
///     &StudioConfig::builtin(),
///     &SwapRequest::new("128", "white", "none"),
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn swap_background_from_reader<R: AsyncRead + Unpin>(
    reader: R,
    backend: Box<dyn InferenceBackend>,
    config: &StudioConfig,
    request: &SwapRequest,
) -> Result<CompositeResult> {
    let mut processor = BackgroundSwapProcessor::new(config.clone(), backend);
    processor.process_reader(reader, request).await
}
