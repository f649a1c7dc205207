//! Brightness scaling: `c' = clamp(c * factor)` applied to the color
//! channels, alpha untouched.
//!
//! Working in premultiplied space, scaling only the premultiplied RGB
//! channels and leaving alpha alone is equivalent to scaling straight
//! RGB and re-premultiplying: `(R*f)*A == (R*A)*f`, so the kernel never
//! needs to unpremultiply first.

use crate::error::{KernelError, Result};
use rasterdag_formats::premul::{read_premul16_row, write_premul16_row};

#[inline]
fn scale_channel(c: u16, factor: f32) -> u16 {
    (c as f32 * factor).round().clamp(0.0, u16::MAX as f32) as u16
}

/// Scales one premultiplied pixel's RGB channels by `factor`, clamping
/// to the representable range. Alpha passes through unchanged.
#[inline]
pub fn scale_brightness_premul_pixel(r16: u16, g16: u16, b16: u16, a16: u16, factor: f32) -> (u16, u16, u16, u16) {
    (
        scale_channel(r16, factor),
        scale_channel(g16, factor),
        scale_channel(b16, factor),
        a16,
    )
}

/// Applies brightness scaling to a row of `count` packed
/// RGBA16-premultiplied pixels in place.
pub fn scale_brightness_premul(row: &mut [u8], count: usize, factor: f32) -> Result<()> {
    if !factor.is_finite() || factor < 0.0 {
        return Err(KernelError::InvalidFactor(factor));
    }
    let expected = count * 8;
    if row.len() != expected {
        return Err(KernelError::LengthMismatch {
            actual: row.len(),
            expected,
        });
    }
    let mut pixels = read_premul16_row(row, count);
    for p in &mut pixels {
        let (r, g, b, a) = scale_brightness_premul_pixel(p[0], p[1], p[2], p[3], factor);
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
    fn identity_factor_leaves_pixels_unchanged() {
        let straight = [128u8, 128, 128, 128];
        let mut premul = [[0u16; 4]; 1];
        premul_row_from_straight(&straight, &mut premul);
        let mut row = vec![0u8; 8];
        rasterdag_formats::premul::write_premul16_row(&mut row, &premul);

        scale_brightness_premul(&mut row, 1, 1.0).unwrap();

        let back = rasterdag_formats::premul::read_premul16_row(&row, 1);
        assert_eq!(back, premul);
    }

    #[test]
    fn doubling_clamps_rgb_but_preserves_alpha() {
        let straight = [128u8, 128, 128, 128];
        let mut premul = [[0u16; 4]; 1];
        premul_row_from_straight(&straight, &mut premul);
        let mut row = vec![0u8; 8];
        write_premul16_row(&mut row, &premul);

        scale_brightness_premul(&mut row, 1, 2.0).unwrap();

        let back = read_premul16_row(&row, 1);
        let mut out = [0u8; 4];
        straight_row_from_premul(&back, &mut out);
        assert_eq!(out, [255, 255, 255, 128]);
    }

    #[test]
    fn negative_factor_is_rejected() {
        let mut row = vec![0u8; 8];
        let err = scale_brightness_premul(&mut row, 1, -0.5).unwrap_err();
        assert!(matches!(err, KernelError::InvalidFactor(_)));
    }
}
