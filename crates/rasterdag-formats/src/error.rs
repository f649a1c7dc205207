//! Errors produced while describing, converting, or blending pixel
//! formats.

use thiserror::Error as ThisError;

/// Result type alias using [`FormatError`] as the error type.
pub type Result<T> = std::result::Result<T, FormatError>;

/// Errors raised by format description, conversion, and blend dispatch.
#[derive(Debug, ThisError)]
pub enum FormatError {
    /// A paletted format was asked to unpack without a palette.
    #[error("format {0:?} requires a palette but none was supplied")]
    MissingPalette(crate::descriptor::PixelFormat),

    /// A palette index exceeded the palette's length.
    #[error("palette index {index} out of range for a palette of length {len}")]
    PaletteIndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The palette's length.
        len: usize,
    },

    /// A conversion or pack operation was asked of a format pair or
    /// direction that has no implementation (e.g. packing into a
    /// paletted format from arbitrary RGBA8 colors).
    #[error("unsupported operation for format {0:?}: {1}")]
    Unsupported(crate::descriptor::PixelFormat, &'static str),

    /// Source and destination row lengths (in pixels) did not match.
    #[error("row length mismatch: src has {src} pixels, dst has {dst} pixels")]
    LengthMismatch {
        /// Source row length.
        src: usize,
        /// Destination row length.
        dst: usize,
    },

    /// Propagated from [`rasterdag_core`].
    #[error(transparent)]
    Core(#[from] rasterdag_core::Error),
}

impl FormatError {
    /// Returns `true` if this is a palette-related error.
    #[inline]
    pub fn is_palette_error(&self) -> bool {
        matches!(
            self,
            Self::MissingPalette(_) | Self::PaletteIndexOutOfRange { .. }
        )
    }
}
