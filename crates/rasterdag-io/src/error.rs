//! Errors for reading/writing the raw pixel-array formats this crate
//! supports.

use std::io;
use thiserror::Error as ThisError;

/// Result type alias using [`IoError`] as the error type.
pub type Result<T> = std::result::Result<T, IoError>;

/// Errors raised decoding or encoding a PPM or headerless raw buffer.
#[derive(Debug, ThisError)]
pub enum IoError {
    /// Underlying file or stream I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Propagated from `rasterdag-image` — buffer construction failure.
    #[error(transparent)]
    Image(#[from] rasterdag_image::ImageError),

    /// Propagated from `rasterdag-formats` — pack/unpack failure.
    #[error(transparent)]
    Format(#[from] rasterdag_formats::FormatError),

    /// A PPM file's magic number was not `P6`.
    #[error("not a binary PPM (P6) file: magic was {0:?}")]
    BadMagic(String),

    /// A PPM header declared a maxval other than 255 (the only depth
    /// this reader supports).
    #[error("unsupported PPM maxval {0}, only 255 is supported")]
    UnsupportedMaxval(u32),

    /// The file ended before the declared pixel data was fully read.
    #[error("truncated pixel data: expected {expected} bytes, found {actual}")]
    Truncated {
        /// Bytes the header/shape promised.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// A raw interleaved buffer's byte length did not match
    /// `width * height * bytes_per_pixel`.
    #[error("raw buffer size {actual} does not match {width}x{height} at {bytes_per_pixel} bytes/pixel (expected {expected})")]
    SizeMismatch {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// Bytes per pixel for the declared format.
        bytes_per_pixel: u32,
        /// Expected total byte length.
        expected: usize,
        /// Actual byte length supplied.
        actual: usize,
    },
}
