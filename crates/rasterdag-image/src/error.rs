//! Errors raised constructing or operating on image buffers and views.

use thiserror::Error as ThisError;

/// Result type alias using [`ImageError`] as the error type.
pub type Result<T> = std::result::Result<T, ImageError>;

/// Errors raised by [`crate::buffer::ImageBuffer`] and
/// [`crate::viewport`] operations.
#[derive(Debug, ThisError)]
pub enum ImageError {
    /// `stride` is smaller than `width * bytes_per_pixel`.
    #[error("stride {stride} is less than the minimum {min_stride} for width {width}")]
    InvalidStride {
        /// Provided stride.
        stride: usize,
        /// Minimum required stride.
        min_stride: usize,
        /// Image width.
        width: u32,
    },

    /// The backing byte buffer is too small for `stride * height`.
    #[error("buffer of {actual} bytes is too small for stride {stride} * height {height}")]
    BufferTooSmall {
        /// Bytes actually supplied.
        actual: usize,
        /// Row stride in bytes.
        stride: usize,
        /// Image height.
        height: u32,
    },

    /// A requested sub-rectangle does not fit within the source extent.
    #[error("rect ({rx}, {ry}, {rw}x{rh}) exceeds bounds {width}x{height}")]
    RectOutOfBounds {
        /// Rect x origin.
        rx: u32,
        /// Rect y origin.
        ry: u32,
        /// Rect width.
        rw: u32,
        /// Rect height.
        rh: u32,
        /// Source width.
        width: u32,
        /// Source height.
        height: u32,
    },

    /// Propagated from [`rasterdag_core`].
    #[error(transparent)]
    Core(#[from] rasterdag_core::Error),

    /// Propagated from [`rasterdag_formats`].
    #[error(transparent)]
    Format(#[from] rasterdag_formats::FormatError),
}
