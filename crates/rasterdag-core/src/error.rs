//! Error type shared across the rasterdag pipeline.
//!
//! # Overview
//!
//! The [`Error`] enum covers failure modes common to every layer of the
//! pipeline: invalid construction arguments and protocol violations (see
//! the error taxonomy below). Resource exhaustion — a pool allocator miss
//! — is deliberately *not* represented here: it is carried as an invalid
//! [`RenderResult`](https://docs.rs/rasterdag-image) rather than an
//! `Err`, so that a failed tile can be recovered from without unwinding.
//!
//! # Taxonomy
//!
//! - **Invalid argument**: [`SingularMatrix`](Error::SingularMatrix),
//!   [`UnknownFormatId`](Error::UnknownFormatId),
//!   [`ZeroDimension`](Error::ZeroDimension).
//! - **Protocol violation**: [`DoubleFree`](Error::DoubleFree),
//!   [`DoubleRelease`](Error::DoubleRelease),
//!   [`GraphTooDeep`](Error::GraphTooDeep).

use thiserror::Error as ThisError;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared across rasterdag crates.
#[derive(Debug, ThisError)]
pub enum Error {
    /// An affine matrix's determinant is too close to zero to invert.
    ///
    /// Returned by a node's `prepare` when `|det| < epsilon`; the pipeline
    /// cannot compute an `InvMatrix` for a degenerate transform.
    ///
    /// # Example
    ///
    /// ```
    /// use rasterdag_core::Error;
    ///
    /// let err = Error::singular_matrix(1.0e-9);
    /// assert!(err.to_string().contains("singular"));
    /// ```
    #[error("singular affine matrix: |det| = {det} is below the invertibility threshold")]
    SingularMatrix {
        /// The determinant that was too small to invert.
        det: f64,
    },

    /// A pixel format ID has no registered descriptor.
    #[error("unknown pixel format id: {0}")]
    UnknownFormatId(u16),

    /// A buffer or request was constructed with a zero width or height.
    #[error("zero-dimension buffer: {width}x{height}")]
    ZeroDimension {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// A pointer was released from the bitmap pool allocator twice, or
    /// does not correspond to a live allocation.
    ///
    /// This is a protocol violation: fatal, and should never occur for a
    /// correctly written node. Detection is best-effort past this point.
    #[error("double free or invalid pointer in pool allocator")]
    DoubleFree,

    /// A buffer-set slot was released twice.
    #[error("double release of buffer-set slot {slot}")]
    DoubleRelease {
        /// Index of the slot that was released twice.
        slot: usize,
    },

    /// The node graph exceeds the maximum supported pull-recursion depth.
    #[error("node graph exceeds maximum depth of {max}")]
    GraphTooDeep {
        /// The configured maximum depth.
        max: usize,
    },

    /// Catch-all for errors that don't fit another variant.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates an [`Error::SingularMatrix`] error.
    #[inline]
    pub fn singular_matrix(det: f64) -> Self {
        Self::SingularMatrix { det }
    }

    /// Creates an [`Error::UnknownFormatId`] error.
    #[inline]
    pub fn unknown_format_id(id: u16) -> Self {
        Self::UnknownFormatId(id)
    }

    /// Creates an [`Error::ZeroDimension`] error.
    #[inline]
    pub fn zero_dimension(width: u32, height: u32) -> Self {
        Self::ZeroDimension { width, height }
    }

    /// Creates an [`Error::DoubleRelease`] error.
    #[inline]
    pub fn double_release(slot: usize) -> Self {
        Self::DoubleRelease { slot }
    }

    /// Creates an [`Error::GraphTooDeep`] error.
    #[inline]
    pub fn graph_too_deep(max: usize) -> Self {
        Self::GraphTooDeep { max }
    }

    /// Creates an [`Error::Other`] error.
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns `true` if this is a pool/allocator protocol violation.
    #[inline]
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            Self::DoubleFree | Self::DoubleRelease { .. } | Self::GraphTooDeep { .. }
        )
    }

    /// Returns `true` if this is an invalid-argument error.
    #[inline]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::SingularMatrix { .. } | Self::UnknownFormatId(_) | Self::ZeroDimension { .. }
        )
    }
}
