//! # rasterdag-graph
//!
//! The node graph and tile scheduler: operator nodes (`Source`,
//! `Affine`, `Filter`, `Composite`, `Sink`) implementing a
//! pull-evaluation protocol over `rasterdag-dda`'s sampler and
//! `rasterdag-kernels`' per-row math, plus the [`renderer::Renderer`]
//! that drives a sink tile by tile into a caller-supplied target.
//!
//! ## Crate Structure
//!
//! ```text
//! rasterdag-core, rasterdag-formats, rasterdag-pool,
//! rasterdag-image, rasterdag-dda, rasterdag-kernels
//!    ^
//!    |
//! rasterdag-graph (this crate)
//!    ^
//!    |
//! rasterdag-cli
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod node;
pub mod pool_scratch;
pub mod renderer;

pub use error::{GraphError, Result};
pub use node::{AffineNode, CompositeNode, FilterKind, FilterNode, Node, SinkNode, SourceNode, MAX_GRAPH_DEPTH};
pub use pool_scratch::PoolScratch;
pub use renderer::{Renderer, RendererOptions};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{GraphError, Result};
    pub use crate::node::{AffineNode, CompositeNode, FilterKind, FilterNode, Node, SinkNode, SourceNode};
    pub use crate::pool_scratch::PoolScratch;
    pub use crate::renderer::{Renderer, RendererOptions};
}
