//! Owning rectangular pixel storage.

use crate::error::{ImageError, Result};
use crate::rect::Rect;
use crate::viewport::{ViewPort, ViewPortMut};
use rasterdag_formats::PixelFormat;

/// An owning rectangular pixel buffer.
///
/// Invariants: `stride >= width * bytes_per_pixel_ceil(format)`;
/// `data.len() >= stride * height`. Both are checked at construction.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl ImageBuffer {
    /// Allocates a zero-filled buffer with the minimum stride for
    /// `format`.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(rasterdag_core::Error::zero_dimension(width, height).into());
        }
        let stride = width as usize * format.bytes_per_pixel_ceil() as usize;
        let data = vec![0u8; stride * height as usize];
        Ok(ImageBuffer {
            width,
            height,
            stride,
            format,
            data,
        })
    }

    /// Wraps caller-supplied bytes with an explicit stride, validating
    /// both the stride and buffer-size invariants.
    pub fn from_raw(
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(rasterdag_core::Error::zero_dimension(width, height).into());
        }
        let min_stride = width as usize * format.bytes_per_pixel_ceil() as usize;
        if stride < min_stride {
            return Err(ImageError::InvalidStride {
                stride,
                min_stride,
                width,
            });
        }
        if data.len() < stride * height as usize {
            return Err(ImageError::BufferTooSmall {
                actual: data.len(),
                stride,
                height,
            });
        }
        Ok(ImageBuffer {
            width,
            height,
            stride,
            format,
            data,
        })
    }

    /// Buffer width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The buffer's pixel format.
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

    /// Mutably borrows one row of raw bytes.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        &mut self.data[start..start + self.stride]
    }

    /// A read-only view of the entire buffer.
    pub fn as_view(&self) -> ViewPort<'_> {
        ViewPort::new(&self.data, self.width, self.height, self.stride, self.format)
    }

    /// A mutable view of the entire buffer.
    pub fn as_view_mut(&mut self) -> ViewPortMut<'_> {
        ViewPortMut::new(
            &mut self.data,
            self.width,
            self.height,
            self.stride,
            self.format,
        )
    }

    /// A read-only view of a sub-rectangle.
    pub fn sub_view(&self, rect: Rect) -> Result<ViewPort<'_>> {
        self.validate_rect(rect)?;
        Ok(self.as_view().sub_rect(rect))
    }

    /// A mutable view of a sub-rectangle.
    pub fn sub_view_mut(&mut self, rect: Rect) -> Result<ViewPortMut<'_>> {
        self.validate_rect(rect)?;
        Ok(self.as_view_mut().sub_rect(rect))
    }

    fn validate_rect(&self, rect: Rect) -> Result<()> {
        if rect.right() > self.width || rect.bottom() > self.height {
            return Err(ImageError::RectOutOfBounds {
                rx: rect.x,
                ry: rect.y,
                rw: rect.width,
                rh: rect.height,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_zero_filled() {
        let buf = ImageBuffer::new(4, 4, PixelFormat::Rgba8Straight).unwrap();
        assert!(buf.row(0).iter().all(|&b| b == 0));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let err = ImageBuffer::new(0, 4, PixelFormat::Gray8).unwrap_err();
        assert!(matches!(err, ImageError::Core(_)));
    }

    #[test]
    fn from_raw_rejects_short_stride() {
        let err =
            ImageBuffer::from_raw(4, 4, 1, PixelFormat::Rgba8Straight, vec![0u8; 16]).unwrap_err();
        assert!(matches!(err, ImageError::InvalidStride { .. }));
    }

    #[test]
    fn sub_view_rejects_out_of_bounds_rect() {
        let buf = ImageBuffer::new(4, 4, PixelFormat::Gray8).unwrap();
        let err = buf.sub_view(Rect::new(0, 0, 8, 8)).unwrap_err();
        assert!(matches!(err, ImageError::RectOutOfBounds { .. }));
    }
}
