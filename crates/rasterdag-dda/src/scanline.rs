//! Per-row DDA: row-constant accumulators, pixel-center correction, and
//! nearest-neighbor sample lookup for one destination scanline.

use crate::valid_range::calc_valid_range;
use rasterdag_core::{Fixed16, InvMatrix};

/// Half of a fixed16 coefficient's own magnitude, used for pixel-center
/// correction (`invA >> 1`, not the fixed-point unit's half).
#[inline]
fn half_of(coeff: Fixed16) -> Fixed16 {
    Fixed16::from_raw(coeff.raw() >> 1)
}

/// Precomputed per-row state for sampling one destination scanline `dy`.
///
/// `srcX = dx*invA + base_x`, `srcY = dx*invC + base_y`, both already
/// folded in the pixel-center correction terms `invA>>1` / `invC>>1` so
/// that sampling at integer `dx` reads the source at the destination
/// pixel's center rather than its top-left corner.
#[derive(Debug, Clone, Copy)]
pub struct RowSampler {
    inv_a: Fixed16,
    inv_c: Fixed16,
    base_x: Fixed16,
    base_y: Fixed16,
}

impl RowSampler {
    /// Builds the row-constant state for destination row `dy`.
    pub fn new(inv: &InvMatrix, dy: i32) -> Self {
        let row_base_x = inv.row_base_x(dy) + half_of(inv.b);
        let row_base_y = inv.row_base_y(dy) + half_of(inv.d);
        RowSampler {
            inv_a: inv.a,
            inv_c: inv.c,
            base_x: row_base_x + half_of(inv.a),
            base_y: row_base_y + half_of(inv.c),
        }
    }

    /// The `[start, end]` inclusive range of destination columns `dx` in
    /// `[0, dst_width)` whose sampled `(srcX, srcY)` both stay inside the
    /// source extent, or `None` if the row never samples the source.
    pub fn valid_dx_range(
        &self,
        dst_width: u32,
        src_width: u32,
        src_height: u32,
    ) -> Option<(u32, u32)> {
        let x_range = calc_valid_range(self.inv_a, self.base_x, src_width, dst_width)?;
        let y_range = calc_valid_range(self.inv_c, self.base_y, src_height, dst_width)?;
        let start = x_range.0.max(y_range.0);
        let end = x_range.1.min(y_range.1);
        if start > end {
            None
        } else {
            Some((start, end))
        }
    }

    /// Nearest-neighbor source pixel coordinates for destination column
    /// `dx`. Only meaningful for `dx` inside the row's
    /// [`Self::valid_dx_range`] — outside it the shifted index may be an
    /// arbitrary out-of-bounds value (see [`Fixed16::shift_to_index`]).
    #[inline]
    pub fn sample(&self, dx: i32) -> (i32, i32) {
        let src_x = (self.inv_a * dx + self.base_x).shift_to_index();
        let src_y = (self.inv_c * dx + self.base_y).shift_to_index();
        (src_x, src_y)
    }
}
