//! Input region (AABB) computation: projects a destination request
//! rectangle through the inverse matrix to find the source rectangle
//! that covers every pixel the DDA could sample.

use crate::util::{ceil_div, floor_div};
use rasterdag_core::{Fixed16, InvMatrix};

/// A source-space axis-aligned bounding box, in integer pixel
/// coordinates. May have a negative `x`/`y` when the inverse transform
/// maps part of the destination request outside the source extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputRegion {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl InputRegion {
    /// Pixel count covered by this region.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Projects the four corners of a `dst_width x dst_height` request at
/// `(dst_x, dst_y)` through `inv`, and returns the smallest integer
/// rectangle containing all four projected points, floored/ceiled
/// outward. This always covers every sample the DDA can take for the
/// request, since every sampled point lies on the line segments
/// between opposing corners' extremes per axis (the transform is
/// affine).
pub fn compute_input_region(
    inv: &InvMatrix,
    dst_x: i32,
    dst_y: i32,
    dst_width: u32,
    dst_height: u32,
) -> InputRegion {
    let corners = [
        (dst_x, dst_y),
        (dst_x + dst_width as i32, dst_y),
        (dst_x, dst_y + dst_height as i32),
        (dst_x + dst_width as i32, dst_y + dst_height as i32),
    ];

    let mut min_sx = i64::MAX;
    let mut max_sx = i64::MIN;
    let mut min_sy = i64::MAX;
    let mut max_sy = i64::MIN;
    for &(cx, cy) in &corners {
        let sx = (inv.a * cx + inv.b * cy + inv.tx).raw() as i64;
        let sy = (inv.c * cx + inv.d * cy + inv.ty).raw() as i64;
        min_sx = min_sx.min(sx);
        max_sx = max_sx.max(sx);
        min_sy = min_sy.min(sy);
        max_sy = max_sy.max(sy);
    }

    let one = Fixed16::ONE as i64;
    let x0 = floor_div(min_sx, one);
    let x1 = ceil_div(max_sx, one);
    let y0 = floor_div(min_sy, one);
    let y1 = ceil_div(max_sy, one);

    InputRegion {
        x: x0,
        y: y0,
        width: (x1 - x0).max(0) as u32,
        height: (y1 - y0).max(0) as u32,
    }
}
