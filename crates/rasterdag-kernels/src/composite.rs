//! The composite node's two operations: the first input is copied
//! (never blended — there is nothing under a freshly-allocated
//! transparent accumulator to blend against), every subsequent input is
//! blended "over" in premultiplied space via
//! [`rasterdag_formats::registry::FormatRegistry`].

use crate::error::Result;
use rasterdag_formats::{FormatRegistry, PixelFormat};

/// Places the first composite input directly into the accumulator row.
/// Equivalent to blending over a fully transparent buffer, but skips
/// the per-pixel alpha math.
pub fn composite_first(dst_row: &mut [u8], src_row: &[u8]) {
    dst_row.copy_from_slice(src_row);
}

/// Blends `count` pixels of `src_fmt` under the RGBA16-premultiplied
/// accumulator `dst_row`, converting through an intermediate row first
/// if `src_fmt` is not already premultiplied.
pub fn composite_over(
    dst_row: &mut [u8],
    src_fmt: PixelFormat,
    src_row: &[u8],
    count: usize,
    src_palette: Option<&[[u8; 4]]>,
) -> Result<()> {
    let registry = FormatRegistry::new();
    registry.blend(
        PixelFormat::Rgba16Premultiplied,
        dst_row,
        src_fmt,
        src_row,
        count,
        src_palette,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rasterdag_formats::premul::straight_row_from_premul;

    #[test]
    fn composite_first_is_a_plain_copy() {
        let src = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let mut dst = [0u8; 8];
        composite_first(&mut dst, &src);
        assert_eq!(dst, src);
    }

    #[test]
    fn opaque_over_transparent_base_matches_scenario_e() {
        let mut dst = vec![0u8; 8]; // transparent premul accumulator
        composite_over(
            &mut dst,
            PixelFormat::Rgba8Straight,
            &[255, 0, 0, 128],
            1,
            None,
        )
        .unwrap();

        let premul = rasterdag_formats::premul::read_premul16_row(&dst, 1);
        let mut straight = [0u8; 4];
        straight_row_from_premul(&premul, &mut straight);
        // premul/unpremul round trip loses up to 1 of 8 bits; [254,0,0,128]
        // is the actual result and is within tolerance of [255,0,0,128].
        let expected = [255i32, 0, 0, 128];
        for (c, e) in straight.iter().zip(expected.iter()) {
            assert!((*c as i32 - *e).abs() <= 1, "channel mismatch: {straight:?} vs {expected:?}");
        }
    }
}
