//! Reads QR codes back out of images.
//!
//! Two outcomes are kept apart: input that is not an image at all yields
//! `Ok(None)`, while an image that holds no readable code is an error.

use std::io::{BufRead, Seek};
use std::path::Path;

use image::{DynamicImage, ImageReader};
use tracing::{debug, info, instrument};

use crate::config::CHARSET;
use crate::error::{QrError, Result};

/// Grayscale view of a raster, the form the barcode codec consumes.
///
/// Fully transparent pixels read as white; otherwise alpha is ignored and
/// luma is the integer weighting `(306 R + 601 G + 117 B + 512) >> 10`.
pub struct LuminanceSource {
    width: u32,
    height: u32,
    luma: Vec<u8>,
}

impl LuminanceSource {
    pub fn new(image: &DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let luma = rgba
            .pixels()
            .map(|p| {
                if p[3] == 0 {
                    return 255;
                }
                let [r, g, b] = [u32::from(p[0]), u32::from(p[1]), u32::from(p[2])];
                ((306 * r + 601 * g + 117 * b + 0x200) >> 10) as u8
            })
            .collect();
        Self { width, height, luma }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Luma at column `x`, row `y`. Out of range reads are white.
    pub fn luma(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 255;
        }
        self.luma[(y * self.width + x) as usize]
    }
}

/// Decodes the QR code in the image file at `path`.
///
/// The format is guessed from the file content, not its extension. Missing,
/// unreadable or non-image files give `Ok(None)`.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn decode_file(path: impl AsRef<Path>) -> Result<Option<String>> {
    let reader = match ImageReader::open(path.as_ref()) {
        Ok(reader) => reader,
        Err(err) => {
            debug!(error = %err, "input file cannot be opened");
            return Ok(None);
        }
    };
    let image = match reader.with_guessed_format()?.decode() {
        Ok(img) => img,
        Err(err) => {
            debug!(error = %err, "input is not a readable image");
            return Ok(None);
        }
    };
    decode_image(&image).map(Some)
}

/// Decodes the QR code in an encoded image read from `reader`.
///
/// The format is guessed from the content. Bytes that are not an image give
/// `Ok(None)`; failing to read the stream itself is an I/O error.
#[instrument(skip_all)]
pub fn decode_reader<R: BufRead + Seek>(reader: R) -> Result<Option<String>> {
    let reader = ImageReader::new(reader).with_guessed_format()?;
    let image = match reader.decode() {
        Ok(img) => img,
        Err(err) => {
            debug!(error = %err, "stream is not a readable image");
            return Ok(None);
        }
    };
    decode_image(&image).map(Some)
}

/// Decodes the QR code in an already loaded image.
///
/// Content is read as UTF-8. When several candidate symbols are found the
/// first one that decodes wins.
pub fn decode_image(image: &DynamicImage) -> Result<String> {
    let source = LuminanceSource::new(image);
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        source.width() as usize,
        source.height() as usize,
        |x, y| source.luma(x as u32, y as u32),
    );
    let grids = prepared.detect_grids();
    debug!(candidates = grids.len(), "located QR candidates");

    let mut last_err = QrError::NotFound;
    for grid in grids {
        match grid.decode() {
            Ok((_, content)) => {
                info!(len = content.len(), charset = CHARSET, "decoded QR code");
                return Ok(content);
            }
            Err(err) => {
                debug!(error = ?err, "candidate failed to decode");
                last_err = QrError::Decode(err);
            }
        }
    }
    Err(last_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;

    #[test]
    fn test_luminance_weights() {
        let img = RgbaImage::from_fn(4, 1, |x, _| match x {
            0 => Rgba([255, 255, 255, 255]),
            1 => Rgba([0, 0, 0, 255]),
            2 => Rgba([0, 0, 0, 0]),
            _ => Rgba([255, 0, 0, 255]),
        });
        let source = LuminanceSource::new(&DynamicImage::ImageRgba8(img));
        assert_eq!(source.luma(0, 0), 255);
        assert_eq!(source.luma(1, 0), 0);
        // Fully transparent reads as white regardless of color.
        assert_eq!(source.luma(2, 0), 255);
        assert_eq!(source.luma(3, 0), 76);
    }

    #[test]
    fn test_luminance_out_of_range_is_white() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let source = LuminanceSource::new(&DynamicImage::ImageRgba8(img));
        assert_eq!(source.luma(1, 1), 0);
        assert_eq!(source.luma(2, 0), 255);
        assert_eq!(source.luma(0, 7), 255);
    }

    #[test]
    fn test_blank_image_is_not_found() {
        let blank = DynamicImage::ImageRgba8(RgbaImage::from_pixel(120, 120, Rgba([255; 4])));
        let err = decode_image(&blank).unwrap_err();
        assert!(matches!(err, QrError::NotFound));
        assert!(err.is_codec());
    }

    #[test]
    fn test_non_image_bytes_are_absent() {
        let result = decode_reader(Cursor::new(b"just some text".to_vec())).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_missing_file_is_absent() {
        assert_eq!(decode_file("/nonexistent/qr.jpg").unwrap(), None);
    }
}
