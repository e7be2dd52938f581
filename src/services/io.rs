//! Image I/O operations service
//!
//! This module separates file I/O operations from pipeline logic. The
//! pipeline core consumes and produces in-memory images only; reading
//! inputs, writing results, and the derived-name policy all live here.

use crate::{
    config::OutputFormat,
    error::{BgSwapError, Result},
    types::CompositeResult,
};
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// Tag appended to an input file's stem when deriving the output path
const OUTPUT_TAG: &str = "_mask";

/// Service for handling image file input/output operations
pub struct ImageIOService;

impl ImageIOService {
    /// Load an image from a file path
    ///
    /// Tries extension-based format detection first and falls back to
    /// content-based detection for misnamed files.
    ///
    /// # Errors
    /// Returns `BgSwapError` when the file is missing or undecodable.
    pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(BgSwapError::file_io_error(
                "read image file",
                path_ref,
                &std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
            ));
        }

        match image::open(path_ref) {
            Ok(img) => Ok(img),
            Err(e) => {
                log::debug!(
                    "Extension-based loading failed for {}: {}. Attempting content-based detection.",
                    path_ref.display(),
                    e
                );

                let data = std::fs::read(path_ref).map_err(|io_err| {
                    BgSwapError::file_io_error("read image data", path_ref, &io_err)
                })?;

                image::load_from_memory(&data).map_err(|content_err| {
                    BgSwapError::processing(format!(
                        "Failed to load image '{}' with both extension-based ({}) and content-based detection ({})",
                        path_ref.display(),
                        e,
                        content_err
                    ))
                })
            },
        }
    }

    /// Load an image from bytes
    ///
    /// # Errors
    /// Returns `BgSwapError` when the bytes do not decode as an image.
    pub fn load_from_bytes(bytes: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory(bytes).map_err(|e| {
            BgSwapError::processing(format!("Failed to decode image from bytes: {}", e))
        })
    }

    /// Load an image from an async reader
    ///
    /// # Errors
    /// Returns `BgSwapError` for stream reading or decoding failures.
    pub async fn load_from_reader<R: tokio::io::AsyncRead + Unpin>(
        mut reader: R,
    ) -> Result<DynamicImage> {
        use tokio::io::AsyncReadExt;

        let mut buffer = Vec::new();
        AsyncReadExt::read_to_end(&mut reader, &mut buffer)
            .await
            .map_err(|e| {
                BgSwapError::processing(format!("Failed to read from stream: {}", e))
            })?;

        Self::load_from_bytes(&buffer)
    }

    /// Save an image to a file with the specified format
    ///
    /// Creates missing parent directories.
    ///
    /// # Errors
    /// Returns `BgSwapError` for directory creation or encoding failures.
    pub fn save_image<P: AsRef<Path>>(
        image: &image::RgbImage,
        path: P,
        format: OutputFormat,
        quality: u8,
    ) -> Result<()> {
        let path_ref = path.as_ref();

        if let Some(parent) = path_ref.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                BgSwapError::file_io_error("create output directory", parent, &e)
            })?;
        }

        match format {
            OutputFormat::Png => {
                image.save_with_format(path_ref, image::ImageFormat::Png)?;
            },
            OutputFormat::Jpeg => {
                let file = std::fs::File::create(path_ref)
                    .map_err(|e| BgSwapError::file_io_error("create output file", path_ref, &e))?;
                let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, quality);
                encoder.encode_image(image)?;
            },
        }

        Ok(())
    }

    /// Save encoded image bytes to an async writer
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    /// Returns `BgSwapError` for encoding or stream writing failures.
    pub async fn save_to_writer<W: tokio::io::AsyncWrite + Unpin>(
        result: &CompositeResult,
        mut writer: W,
        format: OutputFormat,
        quality: u8,
    ) -> Result<u64> {
        use tokio::io::AsyncWriteExt;

        let bytes = result.to_bytes(format, quality)?;

        AsyncWriteExt::write_all(&mut writer, &bytes)
            .await
            .map_err(|e| BgSwapError::processing(format!("Failed to write to stream: {}", e)))?;
        AsyncWriteExt::flush(&mut writer)
            .await
            .map_err(|e| BgSwapError::processing(format!("Failed to flush stream: {}", e)))?;

        Ok(bytes.len() as u64)
    }

    /// Derive the output path for an input image
    ///
    /// Appends the fixed output tag to the file stem and always uses the
    /// `.jpg` extension: `photo.png` becomes `photo_mask.jpg` next to the
    /// input.
    #[must_use]
    pub fn derive_output_path<P: AsRef<Path>>(input_path: P) -> PathBuf {
        let input_ref = input_path.as_ref();
        let stem = input_ref
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        input_ref.with_file_name(format!("{}{}.jpg", stem, OUTPUT_TAG))
    }

    /// Save a result next to its input under the derived name
    ///
    /// Returns the path written to.
    ///
    /// # Errors
    /// Returns `BgSwapError` when the result has no recorded input path or
    /// when encoding fails.
    pub fn save_composite_derived(
        result: &mut CompositeResult,
        format: OutputFormat,
        quality: u8,
    ) -> Result<PathBuf> {
        let input_path = result.input_path.clone().ok_or_else(|| {
            BgSwapError::processing("Cannot derive output path: result has no input path")
        })?;

        let output_path = Self::derive_output_path(&input_path);
        result.save_with_timing(&output_path, format, quality)?;
        Ok(output_path)
    }

    /// Check if a file path has a supported image extension
    #[must_use]
    pub fn is_supported_format<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                matches!(
                    ext.to_lowercase().as_str(),
                    "jpg" | "jpeg" | "png" | "bmp"
                )
            })
    }
}
