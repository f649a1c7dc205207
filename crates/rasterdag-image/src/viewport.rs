//! Non-owning rectangular views into an [`crate::buffer::ImageBuffer`].

use crate::rect::Rect;
use rasterdag_formats::PixelFormat;

/// A read-only rectangular view into a live [`crate::buffer::ImageBuffer`].
///
/// Lifetime-bound to the buffer it was sliced from — a `ViewPort` cannot
/// outlive its backing storage, enforced by the borrow checker rather
/// than a runtime check.
///
/// Sub-rectangle slicing assumes at least one byte per pixel; it is not
/// meaningful for [`PixelFormat::BitPackedIndex`], whose pixels do not
/// start on byte boundaries in general. Bit-packed rows are addressed
/// whole, never sub-sliced along x.
#[derive(Debug, Clone, Copy)]
pub struct ViewPort<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
}

impl<'a> ViewPort<'a> {
    /// Wraps a byte slice as a view. `data` must be at least
    /// `stride * height` bytes.
    pub fn new(data: &'a [u8], width: u32, height: u32, stride: usize, format: PixelFormat) -> Self {
        debug_assert!(data.len() >= stride * height as usize);
        ViewPort {
            data,
            width,
            height,
            stride,
            format,
        }
    }

    /// View width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// View height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The view's pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Borrows one row of raw bytes.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.stride]
    }

    /// A narrower view into a sub-rectangle of this view, in
    /// view-local coordinates.
    pub fn sub_rect(&self, rect: Rect) -> ViewPort<'a> {
        let bpp = self.format.bytes_per_pixel_ceil() as usize;
        let row_start = rect.y as usize * self.stride;
        let col_start = rect.x as usize * bpp;
        let sub_len = (rect.height as usize).saturating_sub(1) * self.stride
            + rect.width as usize * bpp;
        let slice = &self.data[row_start + col_start..row_start + col_start + sub_len.max(0)];
        ViewPort {
            data: slice,
            width: rect.width,
            height: rect.height,
            stride: self.stride,
            format: self.format,
        }
    }
}

/// A mutable rectangular view into a live [`crate::buffer::ImageBuffer`].
#[derive(Debug)]
pub struct ViewPortMut<'a> {
    data: &'a mut [u8],
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
}

impl<'a> ViewPortMut<'a> {
    /// Wraps a mutable byte slice as a view.
    pub fn new(
        data: &'a mut [u8],
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
    ) -> Self {
        debug_assert!(data.len() >= stride * height as usize);
        ViewPortMut {
            data,
            width,
            height,
            stride,
            format,
        }
    }

    /// View width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// View height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The view's pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Borrows one row of raw bytes, read-only.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.stride]
    }

    /// Mutably borrows one row of raw bytes.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        &mut self.data[start..start + self.stride]
    }

    /// Zeroes every row of this view (used to clear a sink buffer before
    /// a retried `execute()`, per the error-handling design: a failed
    /// tile leaves pre-existing sink content, and callers that need a
    /// guaranteed-clean output must clear first).
    pub fn clear(&mut self) {
        for y in 0..self.height {
            self.row_mut(y).iter_mut().for_each(|b| *b = 0);
        }
    }

    /// Re-borrows this view immutably.
    pub fn as_view(&self) -> ViewPort<'_> {
        ViewPort::new(self.data, self.width, self.height, self.stride, self.format)
    }

    /// A narrower mutable view into a sub-rectangle, in view-local
    /// coordinates.
    pub fn sub_rect(self, rect: Rect) -> ViewPortMut<'a> {
        let bpp = self.format.bytes_per_pixel_ceil() as usize;
        let row_start = rect.y as usize * self.stride;
        let col_start = rect.x as usize * bpp;
        let sub_len =
            (rect.height as usize).saturating_sub(1) * self.stride + rect.width as usize * bpp;
        let slice = &mut self.data[row_start + col_start..row_start + col_start + sub_len];
        ViewPortMut {
            data: slice,
            width: rect.width,
            height: rect.height,
            stride: self.stride,
            format: self.format,
        }
    }
}
