//! Logo compositing: scale, center and frame a logo on a rendered code.
//!
//! A logo that cannot be loaded is not an error. The compositor logs a warning
//! and leaves the code untouched, so encoding degrades to a plain QR image.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage, RgbaImage};
use tracing::{debug, instrument, warn};

use crate::config::QrConfig;

/// Where a logo ended up on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoPlacement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Clamps each axis to its maximum on its own; aspect ratio is not kept.
///
/// A 200×50 logo under an 80×80 cap becomes 80×50.
pub fn clamp_size(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    (width.min(max_width), height.min(max_height))
}

/// Top-left corner that centers a `width`×`height` box on a `canvas_w`×`canvas_h` canvas.
pub fn center_offset(canvas_w: u32, canvas_h: u32, width: u32, height: u32) -> (i64, i64) {
    let x = (i64::from(canvas_w) - i64::from(width)).div_euclid(2);
    let y = (i64::from(canvas_h) - i64::from(height)).div_euclid(2);
    (x, y)
}

/// Loads the logo at `logo_path` and draws it centered on `base`.
///
/// With `compress` the logo is first clamped to the configured maximum size
/// and resampled smoothly; otherwise it is drawn at its natural size. Returns
/// `None`, after logging a warning, when the logo cannot be read.
#[instrument(skip(base, logo_path, config), fields(path = %logo_path.display()))]
pub fn composite(
    base: &mut RgbImage,
    logo_path: &Path,
    compress: bool,
    config: &QrConfig,
) -> Option<LogoPlacement> {
    if !logo_path.is_file() {
        warn!(path = %logo_path.display(), "logo file does not exist, rendering without logo");
        return None;
    }
    let logo = match image::open(logo_path) {
        Ok(img) => img.to_rgba8(),
        Err(err) => {
            warn!(path = %logo_path.display(), error = %err, "logo is not a readable image, rendering without logo");
            return None;
        }
    };
    Some(composite_image(base, &logo, compress, config))
}

/// Draws an already loaded logo centered on `base` and frames it.
pub fn composite_image(
    base: &mut RgbImage,
    logo: &RgbaImage,
    compress: bool,
    config: &QrConfig,
) -> LogoPlacement {
    let (mut width, mut height) = logo.dimensions();
    let scaled;
    let logo = if compress {
        (width, height) = clamp_size(width, height, config.logo_max_width, config.logo_max_height);
        scaled = imageops::resize(logo, width, height, FilterType::Triangle);
        &scaled
    } else {
        logo
    };

    let (x, y) = center_offset(base.width(), base.height(), width, height);
    debug!(x, y, width, height, compress, "placing logo");
    blend_over(base, logo, x, y);

    // The frame is a square sized by the logo width, even for non-square logos.
    stroke_round_rect(
        base,
        (x as f32, y as f32, width as f32, width as f32),
        config.border_arc as f32,
        config.border_stroke as f32,
        config.border_color,
    );

    LogoPlacement { x, y, width, height }
}

/// Source-over blend of `top` onto `base` at (`x`, `y`), clipped to `base`.
fn blend_over(base: &mut RgbImage, top: &RgbaImage, x: i64, y: i64) {
    let (bw, bh) = (i64::from(base.width()), i64::from(base.height()));
    for (tx, ty, src) in top.enumerate_pixels() {
        let (px, py) = (x + i64::from(tx), y + i64::from(ty));
        if px < 0 || py < 0 || px >= bw || py >= bh {
            continue;
        }
        let alpha = u32::from(src[3]);
        let dst = base.get_pixel_mut(px as u32, py as u32);
        for c in 0..3 {
            let mixed = u32::from(src[c]) * alpha + u32::from(dst[c]) * (255 - alpha);
            dst[c] = ((mixed + 127) / 255) as u8;
        }
    }
}

/// Strokes the outline of a rounded rectangle.
///
/// `rect` is `(x, y, width, height)` in pixel-edge coordinates and `arc` the
/// diameter of the corner arcs. A pixel is painted when its center lies
/// within half the stroke width of the outline.
fn stroke_round_rect(
    img: &mut RgbImage,
    rect: (f32, f32, f32, f32),
    arc: f32,
    stroke: f32,
    color: Rgb<u8>,
) {
    let (x, y, w, h) = rect;
    let (hw, hh) = (w / 2.0, h / 2.0);
    let (cx, cy) = (x + hw, y + hh);
    let radius = (arc / 2.0).min(hw).min(hh).max(0.0);
    let half = stroke / 2.0;

    let x0 = (x - half - 1.0).floor().max(0.0) as u32;
    let y0 = (y - half - 1.0).floor().max(0.0) as u32;
    let x1 = ((x + w + half + 1.0).ceil().max(0.0) as u32).min(img.width());
    let y1 = ((y + h + half + 1.0).ceil().max(0.0) as u32).min(img.height());

    for py in y0..y1 {
        for px in x0..x1 {
            let d = round_rect_distance(
                px as f32 + 0.5 - cx,
                py as f32 + 0.5 - cy,
                hw,
                hh,
                radius,
            );
            if d.abs() <= half {
                img.put_pixel(px, py, color);
            }
        }
    }
}

/// Signed distance from a point (relative to the center) to a rounded rectangle outline.
fn round_rect_distance(px: f32, py: f32, hw: f32, hh: f32, radius: f32) -> f32 {
    let qx = px.abs() - (hw - radius);
    let qy = py.abs() - (hh - radius);
    let outside = qx.max(0.0).hypot(qy.max(0.0));
    let inside = qx.max(qy).min(0.0);
    outside + inside - radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painter::{BLACK, WHITE};
    use image::Rgba;

    #[test]
    fn test_clamp_size_is_per_axis() {
        assert_eq!(clamp_size(200, 50, 80, 80), (80, 50));
        assert_eq!(clamp_size(50, 200, 80, 80), (50, 80));
        assert_eq!(clamp_size(40, 30, 80, 80), (40, 30));
    }

    #[test]
    fn test_center_offset_floors() {
        assert_eq!(center_offset(300, 300, 80, 80), (110, 110));
        assert_eq!(center_offset(300, 300, 79, 50), (110, 125));
        assert_eq!(center_offset(300, 300, 401, 300), (-51, 0));
    }

    #[test]
    fn test_composite_image_clamps_independently() {
        let mut base = RgbImage::from_pixel(300, 300, BLACK);
        let logo = RgbaImage::from_pixel(200, 50, Rgba([255, 0, 0, 255]));
        let placement = composite_image(&mut base, &logo, true, &QrConfig::default());

        assert_eq!(placement, LogoPlacement { x: 110, y: 125, width: 80, height: 50 });
        assert_eq!(*base.get_pixel(150, 150), Rgb([255, 0, 0]));
        // Left and right of the logo the code is untouched.
        assert_eq!(*base.get_pixel(100, 150), BLACK);
        assert_eq!(*base.get_pixel(200, 150), BLACK);
    }

    #[test]
    fn test_composite_image_without_compress_keeps_natural_size() {
        let mut base = RgbImage::from_pixel(300, 300, WHITE);
        let logo = RgbaImage::from_pixel(120, 100, Rgba([0, 0, 255, 255]));
        let placement = composite_image(&mut base, &logo, false, &QrConfig::default());
        assert_eq!((placement.width, placement.height), (120, 100));
        assert_eq!((placement.x, placement.y), (90, 100));
    }

    #[test]
    fn test_border_is_square_of_logo_width() {
        let mut base = RgbImage::from_pixel(300, 300, BLACK);
        let logo = RgbaImage::from_pixel(80, 40, Rgba([0, 0, 0, 255]));
        let config = QrConfig::default().with_border(6, 3, Rgb([0, 255, 0]));
        let placement = composite_image(&mut base, &logo, true, &config);
        assert_eq!((placement.x, placement.y), (110, 130));

        let green = Rgb([0, 255, 0]);
        // Top edge of the frame runs along the logo's top.
        assert_eq!(*base.get_pixel(150, 130), green);
        // Bottom edge sits at y + width, well below the 40px tall logo.
        assert_eq!(*base.get_pixel(150, 210), green);
        assert_eq!(*base.get_pixel(150, 170), BLACK);
        // Corners are rounded, so the exact corner pixel outside the arc stays clear.
        assert_eq!(*base.get_pixel(108, 128), BLACK);
    }

    #[test]
    fn test_transparent_logo_leaves_code_visible() {
        let mut base = RgbImage::from_pixel(300, 300, BLACK);
        let logo = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 0]));
        composite_image(&mut base, &logo, false, &QrConfig::default());
        assert_eq!(*base.get_pixel(150, 150), BLACK);
    }

    #[test]
    fn test_missing_logo_is_soft() {
        let mut base = RgbImage::from_pixel(300, 300, WHITE);
        let before = base.clone();
        let placement = composite(
            &mut base,
            Path::new("/nonexistent/logo.png"),
            true,
            &QrConfig::default(),
        );
        assert!(placement.is_none());
        assert_eq!(base, before);
    }
}
