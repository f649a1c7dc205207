//! Alpha scaling: `a' = clamp(a * factor)`. In premultiplied space this
//! scales RGB and A together, since `A' = A*f` and premultiplied RGB
//! must scale by the same factor to stay premultiplied by the new
//! alpha: `(R*A)*f == R*(A*f)`.

use crate::error::{KernelError, Result};
use rasterdag_formats::premul::{read_premul16_row, write_premul16_row};

#[inline]
fn scale_channel(c: u16, factor: f32) -> u16 {
    (c as f32 * factor).round().clamp(0.0, u16::MAX as f32) as u16
}

/// Scales one premultiplied pixel's RGB and alpha by `factor`.
#[inline]
pub fn scale_alpha_premul_pixel(r16: u16, g16: u16, b16: u16, a16: u16, factor: f32) -> (u16, u16, u16, u16) {
    (
        scale_channel(r16, factor),
        scale_channel(g16, factor),
        scale_channel(b16, factor),
        scale_channel(a16, factor),
    )
}

/// Applies alpha scaling to a row of `count` packed RGBA16-premultiplied
/// pixels in place.
pub fn scale_alpha_premul(row: &mut [u8], count: usize, factor: f32) -> Result<()> {
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
        let (r, g, b, a) = scale_alpha_premul_pixel(p[0], p[1], p[2], p[3], factor);
        *p = [r, g, b, a];
    }
    write_premul16_row(row, &pixels);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rasterdag_formats::premul::premul_row_from_straight;

    #[test]
    fn halving_alpha_halves_straight_alpha_too() {
        let straight = [200u8, 100, 50, 200];
        let mut premul = [[0u16; 4]; 1];
        premul_row_from_straight(&straight, &mut premul);
        let mut row = vec![0u8; 8];
        write_premul16_row(&mut row, &premul);

        scale_alpha_premul(&mut row, 1, 0.5).unwrap();

        let back = read_premul16_row(&row, 1);
        let mut out = [0u8; 4];
        rasterdag_formats::premul::straight_row_from_premul(&back, &mut out);
        assert!((out[3] as i32 - 100).abs() <= 1);
    }
}
