//! `calcValidRange`: the inclusive range of destination indices whose
//! sampled source coordinate stays inside the source extent.

use crate::util::{ceil_div, floor_div};
use rasterdag_core::Fixed16;

/// Smallest integer `x` satisfying `a*x >= b` (`a != 0`).
#[inline]
fn solve_ge(a: i64, b: i64) -> i64 {
    if a > 0 {
        ceil_div(b, a)
    } else {
        floor_div(b, a)
    }
}

/// Largest integer `x` satisfying `a*x <= b` (`a != 0`).
#[inline]
fn solve_le(a: i64, b: i64) -> i64 {
    if a > 0 {
        floor_div(b, a)
    } else {
        ceil_div(b, a)
    }
}

/// Computes the inclusive `[start, end]` range of `dx` in `[0, dst_extent)`
/// for which `base + dx*step` lands in `[0, src_extent*ONE)`, i.e. the
/// sampled coordinate stays on the source bitmap.
///
/// Returns `None` if no `dx` in range satisfies the condition.
pub fn calc_valid_range(
    step: Fixed16,
    base: Fixed16,
    src_extent: u32,
    dst_extent: u32,
) -> Option<(u32, u32)> {
    if src_extent == 0 || dst_extent == 0 {
        return None;
    }
    let step_raw = step.raw() as i64;
    let base_raw = base.raw() as i64;
    let upper = src_extent as i64 * Fixed16::ONE as i64;
    let last_dst = dst_extent as i64 - 1;

    if step_raw == 0 {
        return if base_raw >= 0 && base_raw < upper {
            Some((0, dst_extent - 1))
        } else {
            None
        };
    }

    // 0 <= base + dx*step  =>  step*dx >= -base
    let lo = solve_ge(step_raw, -base_raw);
    // base + dx*step < upper  =>  step*dx <= upper - 1 - base
    let hi = solve_le(step_raw, upper - 1 - base_raw);

    let lo = lo.max(0);
    let hi = hi.min(last_dst);
    if lo > hi {
        None
    } else {
        Some((lo as u32, hi as u32))
    }
}
