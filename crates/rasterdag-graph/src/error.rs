//! Errors raised building or evaluating a node graph.

use thiserror::Error as ThisError;

/// Result type alias using [`GraphError`] as the error type.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised by [`crate::node::Node`] construction, `prepare`, or
/// evaluation.
#[derive(Debug, ThisError)]
pub enum GraphError {
    /// Propagated from `rasterdag-core` — covers singular matrices,
    /// graph-depth overflow, and pool protocol violations surfaced
    /// through the crates below it.
    #[error(transparent)]
    Core(#[from] rasterdag_core::Error),

    /// Propagated from `rasterdag-image` — buffer construction and
    /// copy-clipping failures.
    #[error(transparent)]
    Image(#[from] rasterdag_image::ImageError),

    /// Propagated from `rasterdag-formats` — format conversion failures
    /// during composite or sink copy-out.
    #[error(transparent)]
    Format(#[from] rasterdag_formats::FormatError),

    /// Propagated from `rasterdag-kernels` — filter kernel argument
    /// validation failures.
    #[error(transparent)]
    Kernel(#[from] rasterdag_kernels::KernelError),

    /// Propagated from `rasterdag-pool` — double-release, unknown
    /// handle, or other scratch-slot protocol violations.
    #[error(transparent)]
    Pool(#[from] rasterdag_pool::PoolError),

    /// A composite node was built with no inputs.
    #[error("composite node requires at least one input")]
    EmptyComposite,

    /// A sink node was asked to render with no target viewport attached.
    #[error("sink node has no render target")]
    NoRenderTarget,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_composite_has_readable_message() {
        let err = GraphError::EmptyComposite;
        assert!(err.to_string().contains("at least one input"));
    }
}
