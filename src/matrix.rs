//! The module matrix: a QR symbol as a square grid of dark/light cells.

use qrcode::bits::Bits;
use qrcode::types::{QrError as CodecError, QrResult};
use qrcode::{Color, QrCode, Version};
use tracing::debug;

use crate::config::{CHARSET, ERROR_CORRECTION, UTF8_ECI};
use crate::error::{QrError, Result};

/// A square grid of modules (`true` = dark), immutable once built.
///
/// The grid holds the symbol only; the quiet zone is added by the painter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    side: u32,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    /// Encodes `content` as UTF-8 bytes at error correction level H.
    ///
    /// The smallest version that holds the data is used, with optimal segment
    /// modes. Non-ASCII content is prefixed with the UTF-8 ECI designator so
    /// readers do not fall back to ISO-8859-1.
    pub fn encode(content: &str) -> Result<Self> {
        let eci = !content.is_ascii();
        debug!(charset = CHARSET, eci, "encoding content");
        for v in 1..=40 {
            let mut bits = Bits::new(Version::Normal(v));
            match push_content(&mut bits, content.as_bytes(), eci) {
                Ok(()) => {}
                Err(CodecError::DataTooLong) => continue,
                Err(other) => return Err(QrError::Encode(other)),
            }
            let code = QrCode::with_bits(bits, ERROR_CORRECTION).map_err(QrError::Encode)?;
            return Ok(Self::from_code(&code));
        }
        Err(QrError::DataTooLong { len: content.len() })
    }

    fn from_code(code: &QrCode) -> Self {
        let side = code.width() as u32;
        let modules = code
            .to_colors()
            .into_iter()
            .map(|color| color == Color::Dark)
            .collect();
        Self { side, modules }
    }

    /// Builds a matrix from row-major cells.
    ///
    /// Returns `None` unless `modules` describes a non-empty square.
    pub fn from_modules(side: u32, modules: Vec<bool>) -> Option<Self> {
        if side == 0 || modules.len() != (side as usize) * (side as usize) {
            return None;
        }
        Some(Self { side, modules })
    }

    /// Number of modules along one edge.
    pub fn side(&self) -> u32 {
        self.side
    }

    /// Whether the module at column `x`, row `y` is dark. Out of range reads are light.
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.side || y >= self.side {
            return false;
        }
        self.modules[(y * self.side + x) as usize]
    }
}

fn push_content(bits: &mut Bits, data: &[u8], eci: bool) -> QrResult<()> {
    if eci {
        bits.push_eci_designator(UTF8_ECI)?;
    }
    bits.push_optimal_data(data)?;
    bits.push_terminator(ERROR_CORRECTION)
}
