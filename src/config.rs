//! Configuration types for background swap operations
//!
//! The color palette and size chart are the two read-only mappings the
//! pipeline resolves caller-supplied labels against. They are loaded once
//! and passed to the processor at construction; there are no hidden
//! process-wide defaults.

use crate::error::{BgSwapError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Label that selects no resize in a size chart lookup
pub const SIZE_NONE: &str = "none";

/// Output image format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// PNG (lossless)
    Png,
    /// JPEG (lossy, the default for saved results)
    Jpeg,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Jpeg
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Png => write!(f, "png"),
            Self::Jpeg => write!(f, "jpeg"),
        }
    }
}

/// Solid background fill color (RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct BackgroundColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl BackgroundColor {
    /// Create a new background color with RGB values
    #[must_use]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a white background color (255, 255, 255)
    #[must_use]
    pub fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// Create a black background color (0, 0, 0)
    #[must_use]
    pub fn black() -> Self {
        Self::new(0, 0, 0)
    }

    /// Create a red background color (255, 0, 0)
    #[must_use]
    pub fn red() -> Self {
        Self::new(255, 0, 0)
    }

    /// Create a blue background color (0, 0, 255)
    #[must_use]
    pub fn blue() -> Self {
        Self::new(0, 0, 255)
    }

    /// The color as an `image` crate pixel
    #[must_use]
    pub fn to_pixel(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }
}

impl From<[u8; 3]> for BackgroundColor {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<BackgroundColor> for [u8; 3] {
    fn from(color: BackgroundColor) -> Self {
        [color.r, color.g, color.b]
    }
}

/// Target print size for the normalizer
///
/// Dimensions are signed so that non-positive values configured in a size
/// chart survive to the normalizer, which rejects them with
/// [`BgSwapError::InvalidSizeSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SizeSpecRepr", into = "SizeSpecRepr")]
pub enum SizeSpec {
    /// No resize; the composited image is returned unchanged
    Original,
    /// Resize to exactly width x height, aspect ratio free to change
    Exact { width: i32, height: i32 },
}

impl SizeSpec {
    /// Create an exact target size
    #[must_use]
    pub fn exact(width: i32, height: i32) -> Self {
        Self::Exact { width, height }
    }
}

/// Serialized form of [`SizeSpec`]: the `"none"` sentinel or a `[w, h]` pair
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SizeSpecRepr {
    Sentinel(String),
    Pair([i32; 2]),
}

impl TryFrom<SizeSpecRepr> for SizeSpec {
    type Error = String;

    fn try_from(repr: SizeSpecRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            SizeSpecRepr::Sentinel(s) if s == SIZE_NONE => Ok(Self::Original),
            SizeSpecRepr::Sentinel(s) => Err(format!("unknown size sentinel '{}'", s)),
            SizeSpecRepr::Pair([width, height]) => Ok(Self::Exact { width, height }),
        }
    }
}

impl From<SizeSpec> for SizeSpecRepr {
    fn from(spec: SizeSpec) -> Self {
        match spec {
            SizeSpec::Original => Self::Sentinel(SIZE_NONE.to_string()),
            SizeSpec::Exact { width, height } => Self::Pair([width, height]),
        }
    }
}

/// Read-only mapping from color labels to background colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorPalette {
    colors: HashMap<String, BackgroundColor>,
}

impl ColorPalette {
    /// Create a palette from explicit entries
    #[must_use]
    pub fn new(colors: HashMap<String, BackgroundColor>) -> Self {
        Self { colors }
    }

    /// Resolve a color label
    ///
    /// # Errors
    /// Returns [`BgSwapError::UnknownColorName`] when the label is absent.
    pub fn resolve(&self, name: &str) -> Result<BackgroundColor> {
        self.colors
            .get(name)
            .copied()
            .ok_or_else(|| BgSwapError::UnknownColorName(name.to_string()))
    }

    /// Labels available in this palette
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.colors.keys().map(String::as_str)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Read-only mapping from print-size labels to target sizes
///
/// The [`SIZE_NONE`] label always resolves to [`SizeSpec::Original`], whether
/// or not the chart carries an entry for it; the sentinel is checked before
/// the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeChart {
    sizes: HashMap<String, SizeSpec>,
}

impl SizeChart {
    /// Create a chart from explicit entries
    #[must_use]
    pub fn new(sizes: HashMap<String, SizeSpec>) -> Self {
        Self { sizes }
    }

    /// Resolve a size label
    ///
    /// # Errors
    /// Returns [`BgSwapError::UnknownSizeName`] when the label is absent.
    pub fn resolve(&self, name: &str) -> Result<SizeSpec> {
        if name == SIZE_NONE {
            return Ok(SizeSpec::Original);
        }
        self.sizes
            .get(name)
            .copied()
            .ok_or_else(|| BgSwapError::UnknownSizeName(name.to_string()))
    }

    /// Labels available in this chart
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sizes.keys().map(String::as_str)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Whether the chart has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// The two configuration mappings the pipeline resolves labels against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Color label -> background color
    pub colors: ColorPalette,

    /// Size label -> target print size
    pub sizes: SizeChart,
}

impl StudioConfig {
    /// Create a config from explicit mappings
    #[must_use]
    pub fn new(colors: ColorPalette, sizes: SizeChart) -> Self {
        Self { colors, sizes }
    }

    /// The built-in studio tables
    ///
    /// Colors: red, black, blue, white. Sizes: `one_inch` 413x295,
    /// `two_inch` 626x413, `five_inch` 1200x840.
    #[must_use]
    pub fn builtin() -> Self {
        let mut colors = HashMap::new();
        colors.insert("red".to_string(), BackgroundColor::red());
        colors.insert("black".to_string(), BackgroundColor::black());
        colors.insert("blue".to_string(), BackgroundColor::blue());
        colors.insert("white".to_string(), BackgroundColor::white());

        let mut sizes = HashMap::new();
        sizes.insert("one_inch".to_string(), SizeSpec::exact(413, 295));
        sizes.insert("two_inch".to_string(), SizeSpec::exact(626, 413));
        sizes.insert("five_inch".to_string(), SizeSpec::exact(1200, 840));

        Self {
            colors: ColorPalette::new(colors),
            sizes: SizeChart::new(sizes),
        }
    }

    /// Parse a config from a JSON string
    ///
    /// # Errors
    /// Returns [`BgSwapError::InvalidConfig`] on malformed JSON or entries.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| BgSwapError::invalid_config(format!("Failed to parse config: {}", e)))
    }

    /// Load a config from a JSON file
    ///
    /// # Errors
    /// Returns I/O errors for unreadable files and
    /// [`BgSwapError::InvalidConfig`] for malformed content.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let content = std::fs::read_to_string(path_ref)
            .map_err(|e| BgSwapError::file_io_error("read config file", path_ref, &e))?;
        Self::from_json_str(&content)
    }

    /// Serialize the config to a JSON string
    ///
    /// # Errors
    /// Returns [`BgSwapError::InvalidConfig`] on serialization failures.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BgSwapError::invalid_config(format!("Failed to serialize config: {}", e)))
    }
}
