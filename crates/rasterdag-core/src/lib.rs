//! # rasterdag-core
//!
//! Foundational types shared across the rasterdag pipeline: integer
//! fixed-point scalars, affine geometry, and the error type used at every
//! crate boundary above this one.
//!
//! ## Design Philosophy
//!
//! All coordinate arithmetic inside the rendering pipeline happens in
//! fixed-point, not floating point. Floats only appear at graph-setup
//! boundaries (e.g. a user-supplied [`AffineMatrix`]) and are converted to
//! fixed-point once, at `prepare` time, never per-pixel.
//!
//! ## Crate Structure
//!
//! This crate has no internal dependencies. Every other rasterdag crate
//! depends on it:
//!
//! ```text
//! rasterdag-core (this crate)
//!    ^
//!    |
//!    +-- rasterdag-formats
//!    +-- rasterdag-pool
//!    +-- rasterdag-image
//!    +-- rasterdag-dda
//!    +-- rasterdag-kernels
//!    +-- rasterdag-graph
//!    +-- rasterdag-io
//!    +-- rasterdag-cli
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod fixed;
pub mod geom;

pub use error::{Error, Result};
pub use fixed::{Fixed16, Fixed8};
pub use geom::{AffineMatrix, InvMatrix, Point};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use rasterdag_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::fixed::{Fixed16, Fixed8};
    pub use crate::geom::{AffineMatrix, InvMatrix, Point};
}
