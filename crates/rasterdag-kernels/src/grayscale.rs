//! Grayscale: `y = 0.299R + 0.587G + 0.114B`, computed in fixed-point
//! with the same 8-bit-shift integer coefficients (`77, 150, 29`) the
//! format registry uses for `Gray8` packing, so the two never disagree
//! on what "gray" means for a given color.

use crate::error::Result;
use rasterdag_formats::premul::{read_premul16_row, write_premul16_row};

/// Converts one premultiplied pixel to its luma-gray equivalent. Alpha
/// passes through unchanged; a linear weighted sum of premultiplied
/// channels equals the premultiplied value of the weighted sum of
/// straight channels, so no unpremultiply step is needed.
#[inline]
pub fn grayscale_premul_pixel(r16: u16, g16: u16, b16: u16, a16: u16) -> (u16, u16, u16, u16) {
    let y = ((77u32 * r16 as u32 + 150u32 * g16 as u32 + 29u32 * b16 as u32) >> 8) as u16;
    (y, y, y, a16)
}

/// Applies grayscale conversion to a row of `count` packed
/// RGBA16-premultiplied pixels in place.
pub fn grayscale_premul(row: &mut [u8], count: usize) -> Result<()> {
    let mut pixels = read_premul16_row(row, count);
    for p in &mut pixels {
        let (r, g, b, a) = grayscale_premul_pixel(p[0], p[1], p[2], p[3]);
        *p = [r, g, b, a];
    }
    write_premul16_row(row, &pixels);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rasterdag_formats::premul::{premul_row_from_straight, straight_row_from_premul};

    #[test]
    fn opaque_pixel_matches_reference_luma() {
        let straight = [200u8, 100, 50, 255];
        let mut premul = [[0u16; 4]; 1];
        premul_row_from_straight(&straight, &mut premul);
        let mut row = vec![0u8; 8];
        write_premul16_row(&mut row, &premul);

        grayscale_premul(&mut row, 1).unwrap();

        let back = read_premul16_row(&row, 1);
        let mut out = [0u8; 4];
        straight_row_from_premul(&back, &mut out);
        assert_eq!(out, [124, 124, 124, 255]);
    }

    #[test]
    fn gray_channels_are_all_equal() {
        let (r, g, b, _) = grayscale_premul_pixel(10000, 40000, 5000, 65535);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }
}
