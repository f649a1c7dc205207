//! Binary PPM (P6) reader/writer.
//!
//! PPM is the minimal realistic raw-pixel-array ingestion format for
//! this pipeline: no compression, no color management, a 3-line ASCII
//! header followed by raw big-endian-irrelevant 8-bit RGB triplets.
//! The pipeline's own canonical external format is
//! [`PixelFormat::Rgba8Straight`] (see §6), so [`read`] decodes into
//! [`PixelFormat::Rgb888`] (PPM carries no alpha) and [`write`] accepts
//! any buffer format, unpacking through the shared RGBA8-straight
//! conversion path and dropping alpha.

use crate::error::{IoError, Result};
use rasterdag_formats::convert::unpack_to_rgba8;
use rasterdag_formats::PixelFormat;
use rasterdag_image::ImageBuffer;
use std::io::{BufRead, BufReader, Read, Write};

fn read_token<R: BufRead>(r: &mut R) -> Result<String> {
    let mut token = String::new();
    loop {
        let mut byte = [0u8; 1];
        if r.read(&mut byte)? == 0 {
            break;
        }
        let c = byte[0] as char;
        if c == '#' {
            let mut line = String::new();
            r.read_line(&mut line)?;
            continue;
        }
        if c.is_whitespace() {
            if token.is_empty() {
                continue;
            }
            break;
        }
        token.push(c);
    }
    Ok(token)
}

/// Reads a binary PPM (P6) image into an owned [`PixelFormat::Rgb888`]
/// buffer.
pub fn read<R: Read>(reader: R) -> Result<ImageBuffer> {
    let mut r = BufReader::new(reader);

    let magic = read_token(&mut r)?;
    if magic != "P6" {
        return Err(IoError::BadMagic(magic));
    }
    let width: u32 = read_token(&mut r)?
        .parse()
        .map_err(|_| IoError::BadMagic("missing width".to_string()))?;
    let height: u32 = read_token(&mut r)?
        .parse()
        .map_err(|_| IoError::BadMagic("missing height".to_string()))?;
    let maxval: u32 = read_token(&mut r)?
        .parse()
        .map_err(|_| IoError::BadMagic("missing maxval".to_string()))?;
    if maxval != 255 {
        return Err(IoError::UnsupportedMaxval(maxval));
    }

    let mut out = ImageBuffer::new(width, height, PixelFormat::Rgb888)?;
    for y in 0..height {
        let row = out.row_mut(y);
        r.read_exact(row).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                IoError::Truncated {
                    expected: row.len() * height as usize,
                    actual: y as usize * row.len(),
                }
            } else {
                IoError::Io(e)
            }
        })?;
    }
    Ok(out)
}

/// Writes `img` out as a binary PPM (P6) file, converting through
/// RGBA8 straight and dropping alpha if present.
pub fn write<W: Write>(writer: W, img: &ImageBuffer) -> Result<()> {
    let mut w = writer;
    write!(w, "P6\n{} {}\n255\n", img.width(), img.height())?;

    let width = img.width() as usize;
    let mut straight = vec![[0u8; 4]; width];
    let mut row_rgb = vec![0u8; width * 3];
    for y in 0..img.height() {
        unpack_to_rgba8(img.format(), img.row(y), width, &mut straight, None)?;
        for (px, rgb) in straight.iter().zip(row_rgb.chunks_exact_mut(3)) {
            rgb.copy_from_slice(&px[0..3]);
        }
        w.write_all(&row_rgb)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_rgb_pixel_data() {
        let mut img = ImageBuffer::new(2, 2, PixelFormat::Rgb888).unwrap();
        img.row_mut(0).copy_from_slice(&[10, 20, 30, 40, 50, 60]);
        img.row_mut(1).copy_from_slice(&[70, 80, 90, 100, 110, 120]);

        let mut bytes = Vec::new();
        write(&mut bytes, &img).unwrap();

        let decoded = read(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(decoded.width(), 2);
        assert_eq!(decoded.height(), 2);
        assert_eq!(decoded.row(0), img.row(0));
        assert_eq!(decoded.row(1), img.row(1));
    }

    #[test]
    fn write_drops_alpha_from_straight_source() {
        let mut img = ImageBuffer::new(1, 1, PixelFormat::Rgba8Straight).unwrap();
        img.row_mut(0).copy_from_slice(&[200, 100, 50, 128]);

        let mut bytes = Vec::new();
        write(&mut bytes, &img).unwrap();
        let decoded = read(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(decoded.row(0), &[200, 100, 50]);
    }

    #[test]
    fn rejects_non_p6_magic() {
        let err = read(std::io::Cursor::new(b"P5\n1 1\n255\n\0".to_vec())).unwrap_err();
        assert!(matches!(err, IoError::BadMagic(_)));
    }

    #[test]
    fn rejects_unsupported_maxval() {
        let err = read(std::io::Cursor::new(b"P6\n1 1\n65535\n".to_vec())).unwrap_err();
        assert!(matches!(err, IoError::UnsupportedMaxval(65535)));
    }

    #[test]
    fn truncated_pixel_data_is_reported() {
        let err = read(std::io::Cursor::new(b"P6\n2 2\n255\n\x01\x02".to_vec())).unwrap_err();
        assert!(matches!(err, IoError::Truncated { .. }));
    }
}
