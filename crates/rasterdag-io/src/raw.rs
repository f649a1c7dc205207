//! Headerless raw pixel-array ingestion: exactly `width * height *
//! bytes_per_pixel` bytes of a caller-declared [`PixelFormat`], no
//! header at all.
//!
//! This is the literal reading of §6's "core accepts raw pixel arrays
//! tagged with a format ID" — the caller already knows the shape and
//! format out of band (a fixture file's name, a capture pipeline's own
//! negotiated format) and just needs the bytes validated and wrapped.

use crate::error::{IoError, Result};
use rasterdag_formats::PixelFormat;
use rasterdag_image::ImageBuffer;
use std::io::{Read, Write};

/// Reads exactly `width * height * bytes_per_pixel_ceil(format)` bytes
/// from `reader` and wraps them as an [`ImageBuffer`] of `format`, with
/// no padding between rows (minimum stride).
pub fn read<R: Read>(mut reader: R, width: u32, height: u32, format: PixelFormat) -> Result<ImageBuffer> {
    let stride = width as usize * format.bytes_per_pixel_ceil() as usize;
    let expected = stride * height as usize;
    let mut data = vec![0u8; expected];
    let read = reader.read(&mut data)?;
    if read < expected {
        // Distinguish a genuinely short stream from one that happened
        // to read in fewer syscalls by trying to fill the remainder.
        let mut filled = read;
        loop {
            match reader.read(&mut data[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        if filled < expected {
            return Err(IoError::Truncated {
                expected,
                actual: filled,
            });
        }
    }
    Ok(ImageBuffer::from_raw(width, height, stride, format, data)?)
}

/// Writes `img`'s pixel bytes to `writer` verbatim, row by row
/// (minimum-stride rows, no padding, no header).
pub fn write<W: Write>(mut writer: W, img: &ImageBuffer) -> Result<()> {
    for y in 0..img.height() {
        writer.write_all(img.row(y))?;
    }
    Ok(())
}

/// Validates that `data`'s length matches `width * height *
/// bytes_per_pixel_ceil(format)` before wrapping it as an
/// [`ImageBuffer`], for callers that already hold the bytes in memory
/// (e.g. a memory-mapped capture buffer) rather than behind a
/// [`Read`].
pub fn from_bytes(data: Vec<u8>, width: u32, height: u32, format: PixelFormat) -> Result<ImageBuffer> {
    let stride = width as usize * format.bytes_per_pixel_ceil() as usize;
    let expected = stride * height as usize;
    if data.len() != expected {
        return Err(IoError::SizeMismatch {
            width,
            height,
            bytes_per_pixel: format.bytes_per_pixel_ceil(),
            expected,
            actual: data.len(),
        });
    }
    Ok(ImageBuffer::from_raw(width, height, stride, format, data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_bytes() {
        let mut img = ImageBuffer::new(2, 1, PixelFormat::Rgba8Straight).unwrap();
        img.row_mut(0).copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);

        let mut bytes = Vec::new();
        write(&mut bytes, &img).unwrap();
        assert_eq!(bytes, vec![1, 2, 3, 4, 5, 6, 7, 8]);

        let decoded = read(std::io::Cursor::new(bytes), 2, 1, PixelFormat::Rgba8Straight).unwrap();
        assert_eq!(decoded.row(0), img.row(0));
    }

    #[test]
    fn short_stream_is_reported_as_truncated() {
        let err = read(std::io::Cursor::new(vec![1, 2, 3]), 2, 1, PixelFormat::Rgba8Straight).unwrap_err();
        assert!(matches!(err, IoError::Truncated { expected: 8, actual: 3 }));
    }

    #[test]
    fn from_bytes_rejects_mismatched_length() {
        let err = from_bytes(vec![0u8; 7], 2, 1, PixelFormat::Rgba8Straight).unwrap_err();
        assert!(matches!(err, IoError::SizeMismatch { .. }));
    }
}
