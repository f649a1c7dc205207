//! Clipped row-copy between views, with format conversion when source
//! and destination formats differ.
//!
//! This is the operation the scheduler uses to place a node's result
//! into the sink's target viewport at the tile position (§4.3's tile
//! stitching), and the operation a pipeline uses at its sink boundary
//! when the sink's format differs from the working format.

use crate::error::Result;
use crate::viewport::{ViewPort, ViewPortMut};
use rasterdag_formats::convert::{pack_from_rgba8, unpack_to_rgba8};

/// Copies a `width x height` region from `src` at `(src_x, src_y)` to
/// `dst` at `(dst_x, dst_y)`, clipping to both views' extents.
///
/// Negative destination or source offsets are folded into the copied
/// region rather than rejected: the region shrinks and the opposite
/// offset advances by the same amount, matching how a tile's result can
/// legitimately start before the tile's left/top edge (an upstream
/// returning a result that overshoots its request).
#[allow(clippy::too_many_arguments)]
pub fn copy(
    dst: &mut ViewPortMut,
    dst_x: i64,
    dst_y: i64,
    src: &ViewPort,
    src_x: i64,
    src_y: i64,
    width: i64,
    height: i64,
    src_palette: Option<&[[u8; 4]]>,
) -> Result<()> {
    let (mut dst_x, mut dst_y, mut src_x, mut src_y, mut width, mut height) =
        (dst_x, dst_y, src_x, src_y, width, height);

    if dst_x < 0 {
        width += dst_x;
        src_x -= dst_x;
        dst_x = 0;
    }
    if dst_y < 0 {
        height += dst_y;
        src_y -= dst_y;
        dst_y = 0;
    }
    if src_x < 0 {
        width += src_x;
        dst_x -= src_x;
        src_x = 0;
    }
    if src_y < 0 {
        height += src_y;
        dst_y -= src_y;
        src_y = 0;
    }

    width = width
        .min(dst.width() as i64 - dst_x)
        .min(src.width() as i64 - src_x);
    height = height
        .min(dst.height() as i64 - dst_y)
        .min(src.height() as i64 - src_y);

    if width <= 0 || height <= 0 {
        return Ok(());
    }
    let (dst_x, dst_y, src_x, src_y, width, height) = (
        dst_x as u32,
        dst_y as u32,
        src_x as u32,
        src_y as u32,
        width as u32,
        height as u32,
    );

    let same_format = dst.format() == src.format();
    let dst_bpp = dst.format().bytes_per_pixel_ceil() as usize;
    let src_bpp = src.format().bytes_per_pixel_ceil() as usize;

    for row in 0..height {
        let src_row = src.row(src_y + row);
        let src_slice = &src_row[src_x as usize * src_bpp..(src_x as usize + width as usize) * src_bpp];

        if same_format {
            let dst_row = dst.row_mut(dst_y + row);
            let dst_slice =
                &mut dst_row[dst_x as usize * dst_bpp..(dst_x as usize + width as usize) * dst_bpp];
            dst_slice.copy_from_slice(src_slice);
        } else {
            let mut straight = vec![[0u8; 4]; width as usize];
            unpack_to_rgba8(src.format(), src_slice, width as usize, &mut straight, src_palette)?;
            let dst_row = dst.row_mut(dst_y + row);
            let dst_slice =
                &mut dst_row[dst_x as usize * dst_bpp..(dst_x as usize + width as usize) * dst_bpp];
            pack_from_rgba8(dst.format(), &straight, dst_slice)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ImageBuffer;
    use rasterdag_formats::PixelFormat;

    #[test]
    fn same_format_copy_is_exact() {
        let mut src = ImageBuffer::new(2, 2, PixelFormat::Gray8).unwrap();
        src.row_mut(0).copy_from_slice(&[10, 20]);
        src.row_mut(1).copy_from_slice(&[30, 40]);
        let mut dst = ImageBuffer::new(2, 2, PixelFormat::Gray8).unwrap();
        copy(
            &mut dst.as_view_mut(),
            0,
            0,
            &src.as_view(),
            0,
            0,
            2,
            2,
            None,
        )
        .unwrap();
        assert_eq!(dst.row(0), &[10, 20]);
        assert_eq!(dst.row(1), &[30, 40]);
    }

    #[test]
    fn negative_dst_offset_clips_correctly() {
        let mut src = ImageBuffer::new(2, 1, PixelFormat::Gray8).unwrap();
        src.row_mut(0).copy_from_slice(&[10, 20]);
        let mut dst = ImageBuffer::new(1, 1, PixelFormat::Gray8).unwrap();
        copy(
            &mut dst.as_view_mut(),
            -1,
            0,
            &src.as_view(),
            0,
            0,
            2,
            1,
            None,
        )
        .unwrap();
        assert_eq!(dst.row(0), &[20]);
    }

    #[test]
    fn cross_format_copy_converts() {
        let mut src = ImageBuffer::new(1, 1, PixelFormat::Rgb888).unwrap();
        src.row_mut(0).copy_from_slice(&[200, 100, 50]);
        let mut dst = ImageBuffer::new(1, 1, PixelFormat::Rgba8Straight).unwrap();
        copy(
            &mut dst.as_view_mut(),
            0,
            0,
            &src.as_view(),
            0,
            0,
            1,
            1,
            None,
        )
        .unwrap();
        assert_eq!(dst.row(0), &[200, 100, 50, 255]);
    }
}
