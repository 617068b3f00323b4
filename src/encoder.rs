use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::{QrConfig, IMAGE_EXTENSION, MARGIN, RANDOM_NAME_BOUND};
use crate::error::Result;
use crate::logo;
use crate::matrix::ModuleMatrix;
use crate::painter;

/// Renders QR codes, optionally with a centered logo, and writes them as JPEG.
///
/// # Example
///
/// ```no_run
/// use qrmark::Encoder;
///
/// let encoder = Encoder::default();
/// let path = encoder
///     .encode_to_dir("https://example.com", Some("logo.png"), "output", Some("qr.jpg"), true)
///     .unwrap();
/// println!("wrote {}", path.display());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    config: QrConfig,
}

impl Encoder {
    /// Creates an encoder with the given rendering options.
    pub fn new(config: QrConfig) -> Self {
        Self { config }
    }

    /// The rendering options in use.
    pub fn config(&self) -> &QrConfig {
        &self.config
    }

    /// Renders `content` to an in-memory image of the configured canvas size.
    ///
    /// # Arguments
    ///
    /// * `content` - The text to encode.
    /// * `logo` - Optional. Path of a logo to draw in the center. A missing or unreadable logo is skipped with a warning.
    /// * `compress` - Whether to shrink the logo to the configured maximum size.
    ///
    /// # Logo coverage
    ///
    /// The logo is drawn over the code and relies on level H error correction
    /// to be read past. Short content gives a version 1 symbol (21 modules),
    /// where an 80×80 logo on a 300px canvas hides about 7×7 modules and its
    /// frame clips more. Some such codes, e.g. `"Hello"`, no longer decode.
    /// Longer content, a smaller [`QrConfig::with_logo_max`] or no logo avoids
    /// this.
    ///
    /// # Errors
    ///
    /// Returns a codec error if the content does not fit a level H symbol.
    #[instrument(skip(self, content, logo), fields(len = content.len()))]
    pub fn render(&self, content: &str, logo: Option<&Path>, compress: bool) -> Result<RgbImage> {
        let matrix = ModuleMatrix::encode(content)?;
        debug!(side = matrix.side(), "encoded module matrix");

        let mut img = painter::paint(&matrix, MARGIN, self.config.canvas_size);
        if let Some(path) = logo {
            logo::composite(&mut img, path, compress, &self.config);
        }
        Ok(img)
    }

    /// Renders `content` and saves it as a JPEG file in `directory`.
    ///
    /// The directory is created, with any missing parents, if it does not
    /// exist. Without a `filename` (or with an empty one) the file is named
    /// after a random number below 99999999, e.g. `4821337.jpg`.
    ///
    /// See [`Encoder::render`] for how far a logo can cover short content.
    ///
    /// Returns the path of the written file.
    pub fn encode_to_dir(
        &self,
        content: &str,
        logo: Option<impl AsRef<Path>>,
        directory: impl AsRef<Path>,
        filename: Option<&str>,
        compress: bool,
    ) -> Result<PathBuf> {
        let img = self.render(content, logo.as_ref().map(AsRef::<Path>::as_ref), compress)?;

        let directory = directory.as_ref();
        if !directory.exists() {
            fs::create_dir_all(directory)?;
        }

        let filename = match filename {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => random_filename(),
        };
        let file_path = directory.join(filename);

        let mut writer = BufWriter::new(File::create(&file_path)?);
        self.write_jpeg(&img, &mut writer)?;
        writer.flush()?;

        info!(path = %file_path.display(), "saved QR code");
        Ok(file_path)
    }

    /// Renders `content` and writes the JPEG bytes to `output`.
    pub fn encode_to_writer<W: Write>(
        &self,
        content: &str,
        logo: Option<impl AsRef<Path>>,
        output: &mut W,
        compress: bool,
    ) -> Result<()> {
        let img = self.render(content, logo.as_ref().map(AsRef::<Path>::as_ref), compress)?;
        self.write_jpeg(&img, output)?;
        output.flush()?;
        Ok(())
    }

    /// Renders `content` without a logo and writes the JPEG bytes to `output`.
    pub fn encode_plain_to_writer<W: Write>(&self, content: &str, output: &mut W) -> Result<()> {
        self.encode_to_writer(content, None::<&Path>, output, false)
    }

    /// Renders `content` without a logo and saves it in `directory`.
    pub fn encode_plain_to_dir(
        &self,
        content: &str,
        directory: impl AsRef<Path>,
        filename: Option<&str>,
    ) -> Result<PathBuf> {
        self.encode_to_dir(content, None::<&Path>, directory, filename, false)
    }

    fn write_jpeg<W: Write>(&self, img: &RgbImage, output: &mut W) -> Result<()> {
        let mut encoder = JpegEncoder::new_with_quality(output, self.config.jpeg_quality);
        encoder.encode_image(img)?;
        Ok(())
    }
}

/// `<n>.jpg` with `n` drawn uniformly below 99999999 from OS entropy.
fn random_filename() -> String {
    let n = Uuid::new_v4().as_u128() % u128::from(RANDOM_NAME_BOUND);
    format!("{}.{}", n, IMAGE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painter::{BLACK, WHITE};

    #[test]
    fn test_render_dimensions() {
        let img = Encoder::default().render("Hello, world!", None, false).unwrap();
        assert_eq!(img.dimensions(), (300, 300));
        assert!(img.pixels().all(|p| *p == BLACK || *p == WHITE));
    }

    #[test]
    fn test_render_custom_canvas() {
        let encoder = Encoder::new(QrConfig::default().with_canvas_size(150));
        let img = encoder.render("Hello, world!", None, false).unwrap();
        assert_eq!(img.dimensions(), (150, 150));
    }

    #[test]
    fn test_render_rejects_oversized_content() {
        let content = "a".repeat(4000);
        let err = Encoder::default().render(&content, None, false).unwrap_err();
        assert!(err.is_codec());
    }

    #[test]
    fn test_random_filename_shape() {
        let name = random_filename();
        let (stem, ext) = name.split_once('.').unwrap();
        assert_eq!(ext, "jpg");
        assert!(stem.parse::<u32>().unwrap() < RANDOM_NAME_BOUND);
    }

    #[test]
    fn test_encode_to_writer_emits_jpeg() {
        let mut buf = Vec::new();
        Encoder::default().encode_plain_to_writer("stream me", &mut buf).unwrap();
        // JPEG SOI marker.
        assert_eq!(&buf[..2], &[0xFF, 0xD8]);
    }
}
