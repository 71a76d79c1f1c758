//! Image embedding: raw bytes in, data-URI ready figures out
//!
//! The builder does not know how an image was produced. Plotting happens
//! elsewhere and hands over encoded bytes, either directly or through a
//! [`PlotSource`] that may report it is unavailable.

use crate::error::CapabilityUnavailable;
use crate::Theme;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Image formats that can be embedded as data URIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
    Gif,
    Svg,
}

impl ImageFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Svg => "image/svg+xml",
        }
    }
}

/// Base64 image payload tagged with its format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub format: ImageFormat,
    pub base64: String,
}

impl EncodedImage {
    /// Encode raw image bytes
    pub fn from_bytes(bytes: &[u8], format: ImageFormat) -> Self {
        Self {
            format,
            base64: STANDARD.encode(bytes),
        }
    }

    /// Wrap an already base64-encoded payload
    pub fn from_base64(base64: impl Into<String>, format: ImageFormat) -> Self {
        Self {
            format,
            base64: base64.into(),
        }
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.format.mime_type(), self.base64)
    }
}

/// A figure block: one image, or one image per theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Figure {
    pub light: EncodedImage,
    /// Shown instead of `light` while the dark theme is active
    pub dark: Option<EncodedImage>,
    pub title: Option<String>,
}

/// Produces image bytes for a theme.
///
/// Implementations backed by an optional plotting stack return
/// [`CapabilityUnavailable`] when that stack is missing; the builder then
/// records a warning line instead of a figure.
pub trait PlotSource {
    fn format(&self) -> ImageFormat {
        ImageFormat::Png
    }

    fn render(&self, theme: Theme) -> Result<Vec<u8>, CapabilityUnavailable>;
}

impl<F> PlotSource for F
where
    F: Fn(Theme) -> Result<Vec<u8>, CapabilityUnavailable>,
{
    fn render(&self, theme: Theme) -> Result<Vec<u8>, CapabilityUnavailable> {
        self(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_bytes() {
        let img = EncodedImage::from_bytes(b"Hello", ImageFormat::Png);
        assert_eq!(img.base64, "SGVsbG8=");
        assert_eq!(img.data_uri(), "data:image/png;base64,SGVsbG8=");
    }

    #[test]
    fn test_svg_mime() {
        let img = EncodedImage::from_base64("PHN2Zz4=", ImageFormat::Svg);
        assert!(img.data_uri().starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn test_closure_plot_source() {
        let source = |theme: Theme| -> Result<Vec<u8>, CapabilityUnavailable> {
            Ok(theme.as_str().as_bytes().to_vec())
        };
        assert_eq!(source.render(Theme::Dark).unwrap(), b"dark".to_vec());
        assert_eq!(source.format(), ImageFormat::Png);
    }
}
