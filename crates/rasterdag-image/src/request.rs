//! The request/result pair nodes exchange during tile-scheduled pull
//! evaluation.

use crate::buffer::ImageBuffer;
use rasterdag_core::Point;

/// A request for a tile extent, issued by a node to its single upstream
/// (or, for composite nodes, to each input in turn).
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest {
    /// Requested width in pixels.
    pub width: u32,
    /// Requested height in pixels.
    pub height: u32,
    /// Position of the external scene origin within the requested tile,
    /// in tile-local fixed8 coordinates.
    pub origin: Point,
}

impl RenderRequest {
    /// Creates a new request.
    pub fn new(width: u32, height: u32, origin: Point) -> Self {
        RenderRequest {
            width,
            height,
            origin,
        }
    }
}

/// The result of pulling a node: a buffer (of any size ≥ the request's
/// coverage) plus the position of the scene origin within it.
///
/// A node that could not produce output — most commonly because the
/// buffer pool had no fit for the requested intermediate — returns an
/// *invalid* result (`image: None`) rather than an `Err`. Resource
/// exhaustion is a value, per the pipeline's error-handling design;
/// propagating it as emptiness lets the scheduler short-circuit just
/// the affected tile instead of aborting the whole render.
#[derive(Debug)]
pub struct RenderResult {
    image: Option<ImageBuffer>,
    origin: Point,
}

impl RenderResult {
    /// Builds a valid result wrapping `image`.
    pub fn valid(image: ImageBuffer, origin: Point) -> Self {
        RenderResult {
            image: Some(image),
            origin,
        }
    }

    /// Builds an invalid (empty) result, e.g. after a pool allocation
    /// miss.
    pub fn empty(origin: Point) -> Self {
        RenderResult {
            image: None,
            origin,
        }
    }

    /// `true` if this result carries a usable image.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.image.is_some()
    }

    /// The position of the scene origin within the result's buffer.
    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Borrows the underlying image, if valid.
    #[inline]
    pub fn image(&self) -> Option<&ImageBuffer> {
        self.image.as_ref()
    }

    /// Consumes the result, returning the underlying image if valid.
    #[inline]
    pub fn into_image(self) -> Option<ImageBuffer> {
        self.image
    }
}
