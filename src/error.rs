//! Error types shared by the encoder and the decoder.

use thiserror::Error;

/// Everything that can go wrong while producing or reading a QR image.
///
/// Variants fall into two families. Codec errors ([`QrError::is_codec`]) mean
/// the barcode codec refused the content or found no valid symbol. I/O errors
/// come from the filesystem, the output stream or the image codec.
#[derive(Debug, Error)]
pub enum QrError {
    // -- Codec --
    #[error("content of {len} bytes does not fit a QR symbol at level H")]
    DataTooLong { len: usize },

    #[error("QR encoding failed: {0}")]
    Encode(qrcode::types::QrError),

    #[error("no QR code found in image")]
    NotFound,

    #[error("QR decoding failed: {0:?}")]
    Decode(rqrr::DeQRError),

    // -- I/O --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),
}

impl QrError {
    /// True when the barcode codec rejected the input or found no readable symbol.
    pub fn is_codec(&self) -> bool {
        matches!(
            self,
            QrError::DataTooLong { .. } | QrError::Encode(_) | QrError::NotFound | QrError::Decode(_)
        )
    }
}

/// Alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_family() {
        assert!(QrError::NotFound.is_codec());
        assert!(QrError::DataTooLong { len: 5000 }.is_codec());
        let io = QrError::from(std::io::Error::new(std::io::ErrorKind::Other, "broken pipe"));
        assert!(!io.is_codec());
    }

    #[test]
    fn test_display() {
        let err = QrError::DataTooLong { len: 4000 };
        assert_eq!(
            err.to_string(),
            "content of 4000 bytes does not fit a QR symbol at level H"
        );
    }
}
