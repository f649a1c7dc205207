//! Strip splitting: subdividing a destination request along rows or
//! columns to shrink the input-region AABB a rotated affine transform
//! would otherwise over-request.

use crate::region::{compute_input_region, InputRegion};
use rasterdag_core::InvMatrix;

/// Below this size (in either axis), splitting is never worthwhile —
/// the per-strip bookkeeping cost would outweigh the AABB saving.
pub const MIN_SPLIT_SIZE: u32 = 32;

/// Upper bound on the number of strips a single request is divided
/// into, regardless of how large the saving would be.
pub const MAX_SPLIT_COUNT: u32 = 8;

/// One strip of a (possibly split) destination request, with its own
/// independently computed input region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strip {
    /// Destination x origin of this strip.
    pub dst_x: i32,
    /// Destination y origin of this strip.
    pub dst_y: i32,
    /// Strip width in destination pixels.
    pub width: u32,
    /// Strip height in destination pixels.
    pub height: u32,
    /// This strip's own input region.
    pub region: InputRegion,
}

fn linear_det(inv: &InvMatrix) -> f64 {
    inv.a.to_f64() * inv.d.to_f64() - inv.b.to_f64() * inv.c.to_f64()
}

fn row_strips(inv: &InvMatrix, dst_x: i32, dst_y: i32, dst_width: u32, dst_height: u32, count: u32) -> Vec<Strip> {
    let count = count.max(1);
    let base = dst_height / count;
    let remainder = dst_height % count;
    let mut strips = Vec::with_capacity(count as usize);
    let mut y = dst_y;
    for i in 0..count {
        let h = base + if i < remainder { 1 } else { 0 };
        if h == 0 {
            continue;
        }
        let region = compute_input_region(inv, dst_x, y, dst_width, h);
        strips.push(Strip {
            dst_x,
            dst_y: y,
            width: dst_width,
            height: h,
            region,
        });
        y += h as i32;
    }
    strips
}

fn column_strips(inv: &InvMatrix, dst_x: i32, dst_y: i32, dst_width: u32, dst_height: u32, count: u32) -> Vec<Strip> {
    let count = count.max(1);
    let base = dst_width / count;
    let remainder = dst_width % count;
    let mut strips = Vec::with_capacity(count as usize);
    let mut x = dst_x;
    for i in 0..count {
        let w = base + if i < remainder { 1 } else { 0 };
        if w == 0 {
            continue;
        }
        let region = compute_input_region(inv, x, dst_y, w, dst_height);
        strips.push(Strip {
            dst_x: x,
            dst_y,
            width: w,
            height: dst_height,
            region,
        });
        x += w as i32;
    }
    strips
}

fn total_requested_pixels(strips: &[Strip]) -> u64 {
    strips.iter().map(|s| s.region.pixel_count()).sum()
}

/// Splits a destination request into strips when doing so meaningfully
/// shrinks the total source pixels the DDA would need to touch.
///
/// Returns a single strip spanning the whole request unchanged when
/// splitting would not help — callers never need to special-case the
/// unsplit case.
pub fn plan_strips(
    inv: &InvMatrix,
    dst_x: i32,
    dst_y: i32,
    dst_width: u32,
    dst_height: u32,
) -> Vec<Strip> {
    let whole_region = compute_input_region(inv, dst_x, dst_y, dst_width, dst_height);
    let larger_axis = dst_width.max(dst_height);

    let parallelogram_pixels =
        dst_width as f64 * dst_height as f64 * linear_det(inv).abs();
    let aabb_pixels = whole_region.pixel_count() as f64;

    if larger_axis < MIN_SPLIT_SIZE || parallelogram_pixels <= 0.0 || aabb_pixels <= 1.5 * parallelogram_pixels {
        return vec![Strip {
            dst_x,
            dst_y,
            width: dst_width,
            height: dst_height,
            region: whole_region,
        }];
    }

    let count = MAX_SPLIT_COUNT.min((larger_axis / MIN_SPLIT_SIZE).max(2));

    let rows = row_strips(inv, dst_x, dst_y, dst_width, dst_height, count);
    let cols = column_strips(inv, dst_x, dst_y, dst_width, dst_height, count);

    let rows_total = total_requested_pixels(&rows);
    let cols_total = total_requested_pixels(&cols);

    if rows_total <= cols_total {
        tracing::debug!(strips = rows.len(), axis = "rows", "splitting affine request");
        rows
    } else {
        tracing::debug!(strips = cols.len(), axis = "columns", "splitting affine request");
        cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rasterdag_core::AffineMatrix;

    #[test]
    fn small_requests_are_never_split() {
        let m = AffineMatrix::rotation_scale(0.7, 1.0);
        let inv = m.invert().unwrap();
        let strips = plan_strips(&inv, 0, 0, 16, 16);
        assert_eq!(strips.len(), 1);
    }

    #[test]
    fn identity_large_request_is_never_split() {
        let inv = AffineMatrix::IDENTITY.invert().unwrap();
        let strips = plan_strips(&inv, 0, 0, 256, 256);
        assert_eq!(strips.len(), 1);
        assert_eq!(strips[0].region.width, 256);
    }

    #[test]
    fn rotated_large_request_splits_and_covers_full_extent() {
        let m = AffineMatrix::rotation_scale(std::f64::consts::FRAC_PI_4, 1.0);
        let inv = m.invert().unwrap();
        let strips = plan_strips(&inv, 0, 0, 256, 64);
        assert!(strips.len() > 1);
        assert!(strips.len() as u32 <= MAX_SPLIT_COUNT);
        let is_row_split = strips.iter().any(|s| s.dst_y != strips[0].dst_y);
        if is_row_split {
            let covered: u32 = strips.iter().map(|s| s.height).sum();
            assert_eq!(covered, 64);
        } else {
            let covered: u32 = strips.iter().map(|s| s.width).sum();
            assert_eq!(covered, 256);
        }
    }
}
