//! Maps a module matrix onto a square RGB canvas.

use image::{Rgb, RgbImage};

use crate::matrix::ModuleMatrix;

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Integer scaling of the matrix onto the canvas.
///
/// Every module becomes a `block`×`block` square; what is left over after the
/// largest whole block size is split evenly on both sides as white padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Side of the output image.
    pub output: u32,
    /// Pixels per module.
    pub block: u32,
    /// Offset of the first quiet-zone module from the image edge.
    pub padding: u32,
}

impl Layout {
    /// Lays out `side` modules plus `margin` quiet modules per edge on `canvas` pixels.
    ///
    /// The output never shrinks below one pixel per module, so a canvas smaller
    /// than the symbol yields an image of exactly `side + 2 * margin` pixels.
    pub fn new(side: u32, margin: u32, canvas: u32) -> Self {
        let input = side + 2 * margin;
        let output = canvas.max(input);
        let block = output / input;
        let padding = (output - input * block) / 2;
        Self { output, block, padding }
    }
}

/// Paints `matrix` onto a fresh canvas: dark modules black, everything else white.
pub fn paint(matrix: &ModuleMatrix, margin: u32, canvas: u32) -> RgbImage {
    let layout = Layout::new(matrix.side(), margin, canvas);
    let origin = layout.padding + margin * layout.block;
    let mut img = RgbImage::from_pixel(layout.output, layout.output, WHITE);

    for y in 0..matrix.side() {
        for x in 0..matrix.side() {
            if !matrix.get(x, y) {
                continue;
            }
            let left = origin + x * layout.block;
            let top = origin + y * layout.block;
            for dy in 0..layout.block {
                for dx in 0..layout.block {
                    img.put_pixel(left + dx, top + dy, BLACK);
                }
            }
        }
    }

    img
}
