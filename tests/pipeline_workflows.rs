//! Integration tests for complete background swap workflows
//!
//! These tests verify end-to-end pipeline behavior without a real matting
//! model, using synthetic masks and the mock inference backend.

use idphoto_bgswap::{
    BackgroundSwapProcessor, BgSwapError, BinaryMask, InferenceBackend, MockBackend, OutputFormat,
    RawMask, Result, SizeSpec, StudioConfig, SwapRequest,
};
use image::{Rgb, RgbImage};
use tempfile::TempDir;

/// Backend that returns a pre-computed mask, regardless of the input image
///
/// Stands in for an inference engine whose output the test controls
/// exactly, including deliberately desynchronized dimensions.
struct FixedMaskBackend {
    mask: RawMask,
}

impl FixedMaskBackend {
    fn new(data: Vec<u8>, dimensions: (u32, u32)) -> Self {
        Self {
            mask: RawMask::new(data, dimensions).unwrap(),
        }
    }
}

impl InferenceBackend for FixedMaskBackend {
    fn infer(&mut self, _image: &RgbImage) -> Result<RawMask> {
        Ok(self.mask.clone())
    }
}

fn uniform_image(width: u32, height: u32, value: u8) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb([value, value, value]))
}

#[test]
fn test_masked_color_fill_end_to_end() {
    // 2x2 gray image; raw mask selects the bottom row at threshold 128
    let image = uniform_image(2, 2, 10);
    let backend = FixedMaskBackend::new(vec![0, 0, 255, 255], (2, 2));

    let mut processor = BackgroundSwapProcessor::new(StudioConfig::builtin(), Box::new(backend));
    let result = processor
        .process_image(&image, &SwapRequest::new("128", "blue", "none"))
        .unwrap();

    assert_eq!(result.mask, BinaryMask::new(vec![0, 0, 255, 255], (2, 2)));
    assert_eq!(*result.image.get_pixel(0, 0), Rgb([0, 0, 255]));
    assert_eq!(*result.image.get_pixel(1, 0), Rgb([0, 0, 255]));
    assert_eq!(*result.image.get_pixel(0, 1), Rgb([10, 10, 10]));
    assert_eq!(*result.image.get_pixel(1, 1), Rgb([10, 10, 10]));
    assert!(!result.has_warnings());
}

#[test]
fn test_unparseable_threshold_warns_and_completes() {
    let image = uniform_image(2, 2, 10);
    let backend = FixedMaskBackend::new(vec![0, 0, 255, 255], (2, 2));

    let mut processor = BackgroundSwapProcessor::new(StudioConfig::builtin(), Box::new(backend));
    let result = processor
        .process_image(&image, &SwapRequest::new("abc", "red", "none"))
        .unwrap();

    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.metadata.threshold, 0);
    // Threshold 0 selects every raw value, so no background remains
    assert_eq!(result.mask.foreground_count(), 4);
    assert_eq!(*result.image.get_pixel(0, 0), Rgb([10, 10, 10]));
}

#[test]
fn test_desynchronized_mask_aborts() {
    let image = uniform_image(100, 100, 10);
    let backend = FixedMaskBackend::new(vec![255; 100 * 99], (100, 99));

    let mut processor = BackgroundSwapProcessor::new(StudioConfig::builtin(), Box::new(backend));
    let err = processor
        .process_image(&image, &SwapRequest::new("128", "red", "none"))
        .unwrap_err();

    assert!(matches!(err, BgSwapError::DimensionMismatch { .. }));
}

#[test]
fn test_print_size_overrides_aspect_ratio() {
    // 300x300 square input, two_inch is 626x413
    let image = uniform_image(300, 300, 230);

    let mut processor =
        BackgroundSwapProcessor::new(StudioConfig::builtin(), Box::new(MockBackend::new()));
    let result = processor
        .process_image(&image, &SwapRequest::new("128", "white", "two_inch"))
        .unwrap();

    assert_eq!(result.dimensions(), (626, 413));
    assert_eq!(result.original_dimensions, (300, 300));
    // The mask is kept at the pre-resize dimensions
    assert_eq!(result.mask.dimensions, (300, 300));
}

#[test]
fn test_custom_config_end_to_end() {
    let json = r#"{
        "colors": { "corporate_teal": [0, 128, 128] },
        "sizes": { "badge": [64, 96] }
    }"#;
    let config = StudioConfig::from_json_str(json).unwrap();
    assert_eq!(config.sizes.resolve("badge").unwrap(), SizeSpec::exact(64, 96));

    let image = uniform_image(10, 10, 20);
    let backend = FixedMaskBackend::new(vec![0; 100], (10, 10));

    let mut processor = BackgroundSwapProcessor::new(config, Box::new(backend));
    let result = processor
        .process_image(&image, &SwapRequest::new("200", "corporate_teal", "badge"))
        .unwrap();

    assert_eq!(result.dimensions(), (64, 96));
    // Dark image, high threshold: everything is background fill
    assert!(result.image.pixels().all(|p| *p == Rgb([0, 128, 128])));
}

#[test]
fn test_unknown_labels_abort_before_output() {
    let image = uniform_image(4, 4, 100);

    let mut processor =
        BackgroundSwapProcessor::new(StudioConfig::builtin(), Box::new(MockBackend::new()));

    let err = processor
        .process_image(&image, &SwapRequest::new("0", "mauve", "none"))
        .unwrap_err();
    assert!(matches!(err, BgSwapError::UnknownColorName(_)));

    let err = processor
        .process_image(&image, &SwapRequest::new("0", "red", "wallet"))
        .unwrap_err();
    assert!(matches!(err, BgSwapError::UnknownSizeName(_)));
}

#[test]
fn test_non_positive_chart_entry_aborts() {
    let json = r#"{
        "colors": { "red": [255, 0, 0] },
        "sizes": { "broken": [0, 413] }
    }"#;
    let config = StudioConfig::from_json_str(json).unwrap();

    let image = uniform_image(4, 4, 100);
    let mut processor = BackgroundSwapProcessor::new(config, Box::new(MockBackend::new()));

    let err = processor
        .process_image(&image, &SwapRequest::new("0", "red", "broken"))
        .unwrap_err();
    assert!(matches!(err, BgSwapError::InvalidSizeSpec { .. }));
}

#[test]
fn test_raising_threshold_never_grows_foreground() {
    // Gradient image through the mock backend: brightness-driven mask
    let mut image = RgbImage::new(16, 16);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let value = (x * 16 + y) as u8;
        *pixel = Rgb([value, value, value]);
    }

    let mut processor =
        BackgroundSwapProcessor::new(StudioConfig::builtin(), Box::new(MockBackend::new()));

    let mut previous = usize::MAX;
    for threshold in ["-50", "0", "64", "128", "192", "255", "300"] {
        let result = processor
            .process_image(&image, &SwapRequest::new(threshold, "white", "none"))
            .unwrap();
        let count = result.mask.foreground_count();
        assert!(
            count <= previous,
            "foreground grew from {} to {} at threshold {}",
            previous,
            count,
            threshold
        );
        previous = count;
    }
}

#[test]
fn test_process_file_and_derived_save() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("portrait.png");
    uniform_image(8, 8, 240).save(&input_path).unwrap();

    let mut processor =
        BackgroundSwapProcessor::new(StudioConfig::builtin(), Box::new(MockBackend::new()));
    let mut result = processor
        .process_file(&input_path, &SwapRequest::new("128", "red", "none"))
        .unwrap();

    assert_eq!(result.input_path.as_deref(), Some(input_path.to_str().unwrap()));

    let written = idphoto_bgswap::ImageIOService::save_composite_derived(
        &mut result,
        OutputFormat::Jpeg,
        90,
    )
    .unwrap();
    assert_eq!(written, temp_dir.path().join("portrait_mask.jpg"));
    assert!(written.exists());
}

#[test]
fn test_process_bytes_round_trip() {
    let image = uniform_image(6, 6, 250);
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();

    let mut processor =
        BackgroundSwapProcessor::new(StudioConfig::builtin(), Box::new(MockBackend::new()));
    let result = processor
        .process_bytes(&bytes, &SwapRequest::new("128", "black", "none"))
        .unwrap();

    // Bright everywhere: the source survives untouched
    assert_eq!(result.mask.foreground_count(), 36);
    assert!(result.image.pixels().all(|p| *p == Rgb([250, 250, 250])));

    let encoded = result.to_bytes(OutputFormat::Png, 90).unwrap();
    let reloaded = image::load_from_memory(&encoded).unwrap().to_rgb8();
    assert_eq!(reloaded, result.image);
}

#[tokio::test]
async fn test_process_reader_stream() {
    let image = uniform_image(5, 4, 245);
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();

    let mut processor =
        BackgroundSwapProcessor::new(StudioConfig::builtin(), Box::new(MockBackend::new()));
    let result = processor
        .process_reader(
            std::io::Cursor::new(bytes),
            &SwapRequest::new("128", "blue", "none"),
        )
        .await
        .unwrap();

    assert_eq!(result.dimensions(), (5, 4));
}

#[tokio::test]
async fn test_stream_out_round_trip() {
    let image = uniform_image(3, 3, 255);
    let mut processor =
        BackgroundSwapProcessor::new(StudioConfig::builtin(), Box::new(MockBackend::new()));
    let result = processor
        .process_image(&image, &SwapRequest::new("1", "white", "none"))
        .unwrap();

    let mut buffer = Vec::new();
    let written = idphoto_bgswap::ImageIOService::save_to_writer(
        &result,
        &mut buffer,
        OutputFormat::Png,
        90,
    )
    .await
    .unwrap();

    assert_eq!(written as usize, buffer.len());
    let reloaded = image::load_from_memory(&buffer).unwrap().to_rgb8();
    assert_eq!(reloaded.dimensions(), (3, 3));
}
