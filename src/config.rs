//! Rendering options and the fixed codec constants.
//!
//! The codec constants (error correction level, charset, margin) are shared by
//! the encoder and the decoder and are not caller configurable: changing them
//! on one side only breaks round trips.

use image::Rgb;
use qrcode::EcLevel;

/// Error correction level used for every generated symbol (~30% recoverable).
pub const ERROR_CORRECTION: EcLevel = EcLevel::H;

/// Character set the content is encoded with and decoded as.
pub const CHARSET: &str = "UTF-8";

/// ECI assignment number announcing UTF-8 content inside a symbol.
pub const UTF8_ECI: u32 = 26;

/// Quiet zone around the symbol, in modules.
pub const MARGIN: u32 = 1;

/// Extension of generated file names.
pub const IMAGE_EXTENSION: &str = "jpg";

/// Upper bound (exclusive) of the random number used for generated file names.
pub const RANDOM_NAME_BOUND: u32 = 99_999_999;

/// Rendering options for [`Encoder`](crate::encoder::Encoder).
///
/// The defaults reproduce the reference deployment: a 300×300 canvas, logos
/// compressed to at most 80×80 and a 3px white rounded border.
#[derive(Debug, Clone, PartialEq)]
pub struct QrConfig {
    /// Side of the square output image, in pixels.
    pub canvas_size: u32,
    /// Widest a logo may be when compression is requested.
    pub logo_max_width: u32,
    /// Tallest a logo may be when compression is requested.
    pub logo_max_height: u32,
    /// Diameter of the arc rounding each border corner, in pixels.
    pub border_arc: u32,
    /// Width of the border stroke, in pixels.
    pub border_stroke: u32,
    /// Colour of the border stroke.
    pub border_color: Rgb<u8>,
    /// JPEG quality, 1..=100.
    pub jpeg_quality: u8,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            canvas_size: 300,
            logo_max_width: 80,
            logo_max_height: 80,
            border_arc: 6,
            border_stroke: 3,
            border_color: Rgb([255, 255, 255]),
            jpeg_quality: 75,
        }
    }
}

impl QrConfig {
    /// Sets the side of the output image.
    pub fn with_canvas_size(mut self, size: u32) -> Self {
        self.canvas_size = size;
        self
    }

    /// Sets the per-axis logo cap applied when compression is requested.
    pub fn with_logo_max(mut self, width: u32, height: u32) -> Self {
        self.logo_max_width = width;
        self.logo_max_height = height;
        self
    }

    /// Sets the corner arc diameter, stroke width and colour of the logo border.
    pub fn with_border(mut self, arc: u32, stroke: u32, color: Rgb<u8>) -> Self {
        self.border_arc = arc;
        self.border_stroke = stroke;
        self.border_color = color;
        self
    }

    /// Sets the JPEG quality, clamped to the encoder's accepted 1..=100 range.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_constants() {
        let config = QrConfig::default();
        assert_eq!(config.canvas_size, 300);
        assert_eq!((config.logo_max_width, config.logo_max_height), (80, 80));
        assert_eq!((config.border_arc, config.border_stroke), (6, 3));
        assert_eq!(MARGIN, 1);
        assert_eq!(ERROR_CORRECTION, EcLevel::H);
    }

    #[test]
    fn test_jpeg_quality_is_clamped() {
        assert_eq!(QrConfig::default().with_jpeg_quality(0).jpeg_quality, 1);
        assert_eq!(QrConfig::default().with_jpeg_quality(200).jpeg_quality, 100);
    }
}
