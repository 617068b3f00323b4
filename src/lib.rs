//! # qrmark
//!
//! QR code images with an optional logo in the center.
//!
//! `qrmark` renders text as a QR code on a fixed-size RGB canvas, draws a
//! framed logo over its center, and writes the result as JPEG to a directory
//! or any `std::io::Write`. It also reads codes back from image files or
//! streams. Symbol encoding and decoding are delegated to the `qrcode` and
//! `rqrr` crates; image I/O and scaling to `image`.
//!
//! ## Features
//!
//! - Error correction level H, UTF-8 content, one module of quiet zone.
//! - Square canvas of configurable size (300px by default).
//! - Logo compression: each axis clamped independently (80×80 by default).
//! - Missing logos are skipped with a warning instead of failing.
//! - Decoding distinguishes "not an image" (`Ok(None)`) from "no code" (`Err`).
//!
//! ## Example
//!
//! Generate a code with a logo, then read it back:
//!
//! ```no_run
//! use qrmark::{decode_file, Encoder};
//!
//! let encoder = Encoder::default();
//! let path = encoder
//!     .encode_to_dir("https://example.com", Some("logo.png"), "output", None, true)
//!     .unwrap();
//! assert_eq!(decode_file(&path).unwrap().as_deref(), Some("https://example.com"));
//! ```
//!
//! Stream a plain code into memory:
//!
//! ```
//! use qrmark::Encoder;
//!
//! let mut jpeg = Vec::new();
//! Encoder::default().encode_plain_to_writer("Hello, World!", &mut jpeg).unwrap();
//! assert!(!jpeg.is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`encoder`]: rendering and JPEG output.
//! - [`decoder`]: reading codes from images.
//! - [`logo`]: logo scaling, placement and framing.
//! - [`painter`] and [`matrix`]: module grid to pixels.

#![forbid(unsafe_code)]

pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod logo;
pub mod matrix;
pub mod painter;

pub use config::QrConfig;
pub use decoder::{decode_file, decode_image, decode_reader};
pub use encoder::Encoder;
pub use error::{QrError, Result};
