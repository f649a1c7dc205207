//! Separable box blur over a premultiplied intermediate.
//!
//! Averaging premultiplied channels directly (rather than unpremultiplying,
//! averaging, and re-premultiplying) is equivalent: the per-pixel straight
//! output is `ΣcA / ΣA` and the output alpha is `ΣA / kernelArea`, so the
//! *premultiplied* output channel `(ΣcA/ΣA) * (ΣA/kernelArea)` reduces to
//! `ΣcA / kernelArea` — a plain box average of the premultiplied channel.
//! Out-of-bounds source pixels contribute a transparent (all-zero premul)
//! sample, which is what gives the output its transparent padding.

use crate::error::{KernelError, Result};
use rasterdag_formats::PixelFormat;
use rasterdag_image::ImageBuffer;

#[inline]
fn sample(buf: &ImageBuffer, width: u32, height: u32, x: i64, y: i64) -> [u64; 4] {
    if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
        return [0; 4];
    }
    let row = buf.row(y as u32);
    let p = &row[x as usize * 8..x as usize * 8 + 8];
    [
        u16::from_le_bytes([p[0], p[1]]) as u64,
        u16::from_le_bytes([p[2], p[3]]) as u64,
        u16::from_le_bytes([p[4], p[5]]) as u64,
        u16::from_le_bytes([p[6], p[7]]) as u64,
    ]
}

/// Horizontal pass: for each source row, a sliding-window sum over the
/// `2*radius+1`-wide window centered on the corresponding output column.
/// Returns one row of (unaveraged) channel sums per source row, `out_w`
/// columns wide.
fn horizontal_pass(buf: &ImageBuffer, width: u32, height: u32, radius: u32, out_w: u32) -> Vec<Vec<[u64; 4]>> {
    let r = radius as i64;
    let mut rows = Vec::with_capacity(height as usize);
    for y in 0..height as i64 {
        let mut sum = [0u64; 4];
        for x in (-2 * r)..=0 {
            let px = sample(buf, width, height, x, y);
            for c in 0..4 {
                sum[c] += px[c];
            }
        }
        let mut row_out = Vec::with_capacity(out_w as usize);
        row_out.push(sum);
        for ox in 1..out_w as i64 {
            let add = sample(buf, width, height, ox, y);
            let rem = sample(buf, width, height, ox - 2 * r - 1, y);
            for c in 0..4 {
                sum[c] = sum[c] + add[c] - rem[c];
            }
            row_out.push(sum);
        }
        rows.push(row_out);
    }
    rows
}

/// Vertical pass over the horizontal sums, writing the final averaged
/// result directly into a new premultiplied [`ImageBuffer`].
fn vertical_pass(
    rows: &[Vec<[u64; 4]>],
    height: u32,
    out_w: u32,
    out_h: u32,
    radius: u32,
) -> Result<ImageBuffer> {
    let r = radius as i64;
    let out_w_us = out_w as usize;
    let zero_row = vec![[0u64; 4]; out_w_us];
    let get_row = |y: i64| -> &Vec<[u64; 4]> {
        if y < 0 || y >= height as i64 {
            &zero_row
        } else {
            &rows[y as usize]
        }
    };

    let mut sums = vec![[0u64; 4]; out_w_us];
    for y in (-2 * r)..=0 {
        let row = get_row(y);
        for ox in 0..out_w_us {
            for c in 0..4 {
                sums[ox][c] += row[ox][c];
            }
        }
    }

    let kernel_size = 2 * radius as u64 + 1;
    let area = kernel_size * kernel_size;

    let mut out = ImageBuffer::new(out_w, out_h, PixelFormat::Rgba16Premultiplied)?;
    for oy in 0..out_h {
        {
            let dst = out.row_mut(oy);
            for ox in 0..out_w_us {
                let s = sums[ox];
                let base = ox * 8;
                dst[base..base + 2].copy_from_slice(&((s[0] / area) as u16).to_le_bytes());
                dst[base + 2..base + 4].copy_from_slice(&((s[1] / area) as u16).to_le_bytes());
                dst[base + 4..base + 6].copy_from_slice(&((s[2] / area) as u16).to_le_bytes());
                dst[base + 6..base + 8].copy_from_slice(&((s[3] / area) as u16).to_le_bytes());
            }
        }
        if oy + 1 < out_h {
            let add_y = oy as i64 + 1;
            let rem_y = add_y - 2 * r - 1;
            let add_row = get_row(add_y);
            let rem_row = get_row(rem_y);
            for ox in 0..out_w_us {
                for c in 0..4 {
                    sums[ox][c] = sums[ox][c] + add_row[ox][c] - rem_row[ox][c];
                }
            }
        }
    }
    Ok(out)
}

/// Applies a separable box blur of the given `radius` to a
/// [`PixelFormat::Rgba16Premultiplied`] buffer, returning a new buffer
/// expanded by `radius` pixels on every side (transparent padding).
pub fn box_blur_premul(buf: &ImageBuffer, radius: u32) -> Result<ImageBuffer> {
    if radius == 0 {
        return Err(KernelError::InvalidRadius);
    }
    if buf.format() != PixelFormat::Rgba16Premultiplied {
        return Err(KernelError::Format(rasterdag_formats::FormatError::Unsupported(
            buf.format(),
            "box blur requires a premultiplied intermediate",
        )));
    }
    let width = buf.width();
    let height = buf.height();
    let out_w = width + 2 * radius;
    let out_h = height + 2 * radius;

    let rows = horizontal_pass(buf, width, height, radius, out_w);
    vertical_pass(&rows, height, out_w, out_h, radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque_pixel_buffer() -> ImageBuffer {
        let mut buf = ImageBuffer::new(1, 1, PixelFormat::Rgba16Premultiplied).unwrap();
        let row = buf.row_mut(0);
        row[0..2].copy_from_slice(&10000u16.to_le_bytes());
        row[2..4].copy_from_slice(&20000u16.to_le_bytes());
        row[4..6].copy_from_slice(&30000u16.to_le_bytes());
        row[6..8].copy_from_slice(&u16::MAX.to_le_bytes());
        buf
    }

    #[test]
    fn expands_by_radius_on_every_side() {
        let buf = opaque_pixel_buffer();
        let out = box_blur_premul(&buf, 2).unwrap();
        assert_eq!(out.width(), 5);
        assert_eq!(out.height(), 5);
    }

    #[test]
    fn zero_radius_is_rejected() {
        let buf = opaque_pixel_buffer();
        let err = box_blur_premul(&buf, 0).unwrap_err();
        assert!(matches!(err, KernelError::InvalidRadius));
    }

    #[test]
    fn corner_of_padding_is_fully_transparent() {
        let buf = opaque_pixel_buffer();
        let out = box_blur_premul(&buf, 2).unwrap();
        let corner = out.row(0);
        let a16 = u16::from_le_bytes([corner[6], corner[7]]);
        assert_eq!(a16, 0);
    }

    #[test]
    fn center_alpha_falls_off_smoothly_towards_edges() {
        let buf = opaque_pixel_buffer();
        let out = box_blur_premul(&buf, 2).unwrap();
        let center_row = out.row(2);
        let center_a = u16::from_le_bytes([center_row[2 * 8 + 6], center_row[2 * 8 + 7]]);
        let edge_a = u16::from_le_bytes([center_row[6], center_row[7]]);
        assert!(center_a > edge_a);
    }
}
