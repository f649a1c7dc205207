//! Errors raised by filter and composite kernels.

use thiserror::Error as ThisError;

/// Result type alias using [`KernelError`] as the error type.
pub type Result<T> = std::result::Result<T, KernelError>;

/// Errors raised constructing or running a kernel.
#[derive(Debug, ThisError)]
pub enum KernelError {
    /// A brightness or alpha factor was negative or non-finite.
    #[error("invalid scale factor {0}")]
    InvalidFactor(f32),

    /// A box-blur radius of zero was requested (a no-op better expressed
    /// by omitting the filter).
    #[error("box-blur radius must be at least 1")]
    InvalidRadius,

    /// A row or image buffer's length did not match the expected pixel
    /// count for its declared format.
    #[error("row length {actual} does not match expected {expected}")]
    LengthMismatch {
        /// Bytes actually supplied.
        actual: usize,
        /// Bytes expected for the declared pixel count and format.
        expected: usize,
    },

    /// Propagated from [`rasterdag_formats`].
    #[error(transparent)]
    Format(#[from] rasterdag_formats::FormatError),

    /// Propagated from [`rasterdag_image`].
    #[error(transparent)]
    Image(#[from] rasterdag_image::ImageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_factor_displays_the_value() {
        let err = KernelError::InvalidFactor(-1.0);
        assert_eq!(err.to_string(), "invalid scale factor -1");
    }
}
