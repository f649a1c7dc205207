//! Process-wide pixel format registry and the (src, dst) blend dispatch
//! matrix.

#[cfg(feature = "premul")]
use crate::blend::blend_under_premul_row;
use crate::blend::blend_under_straight_row;
use crate::convert::unpack_to_rgba8;
use crate::descriptor::PixelFormat;
use crate::error::{FormatError, Result};
#[cfg(feature = "premul")]
use crate::premul::{premul_row_from_straight, read_premul16_row, write_premul16_row};

/// The non-parametric formats addressable by small-integer ID. Paletted
/// [`PixelFormat::BitPackedIndex`] is parametric (carries a bit width)
/// and is therefore constructed directly by callers rather than looked
/// up by ID.
#[cfg(feature = "premul")]
const KNOWN_FORMATS: [PixelFormat; 9] = [
    PixelFormat::Rgb332,
    PixelFormat::Rgb565Le,
    PixelFormat::Rgb565Be,
    PixelFormat::Rgb888,
    PixelFormat::Bgr888,
    PixelFormat::Rgba8Straight,
    PixelFormat::Rgba16Premultiplied,
    PixelFormat::Gray8,
    PixelFormat::Index8,
];

/// With `premul` disabled, `Rgba16Premultiplied` is not a registered
/// lookup target — the straight-alpha path is the only one this build
/// advertises.
#[cfg(not(feature = "premul"))]
const KNOWN_FORMATS: [PixelFormat; 8] = [
    PixelFormat::Rgb332,
    PixelFormat::Rgb565Le,
    PixelFormat::Rgb565Be,
    PixelFormat::Rgb888,
    PixelFormat::Bgr888,
    PixelFormat::Rgba8Straight,
    PixelFormat::Gray8,
    PixelFormat::Index8,
];

/// Process-wide, read-only pixel format registry.
///
/// Initialized explicitly by pipeline construction (never
/// lazily on first use — lazy global init is a concurrency hazard on
/// embedded targets with no synchronization primitives to spare).
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatRegistry;

impl FormatRegistry {
    /// Builds the registry. Cheap and side-effect free; kept as an
    /// explicit constructor so call sites read as deliberate
    /// initialization rather than implicit global state.
    pub fn new() -> Self {
        FormatRegistry
    }

    /// Looks up a non-parametric format by its stable ID.
    pub fn format_by_id(&self, id: u16) -> Option<PixelFormat> {
        KNOWN_FORMATS.iter().copied().find(|f| f.id() == id)
    }

    /// Blends `count` pixels of `src_fmt` under `count` pixels of
    /// `dst_fmt`, in place in `dst_row`.
    ///
    /// Direct paths exist when `src_fmt == dst_fmt` and the format is
    /// one of the two canonical working formats
    /// ([`PixelFormat::Rgba16Premultiplied`],
    /// [`PixelFormat::Rgba8Straight`]). Any other `src_fmt` is converted
    /// through a temporary premultiplied (or straight) intermediate row
    /// first.
    ///
    /// Only the two canonical formats are valid blend *destinations*;
    /// other formats are not composite targets in this pipeline.
    pub fn blend(
        &self,
        dst_fmt: PixelFormat,
        dst_row: &mut [u8],
        src_fmt: PixelFormat,
        src_row: &[u8],
        count: usize,
        src_palette: Option<&[[u8; 4]]>,
    ) -> Result<()> {
        match dst_fmt {
            #[cfg(feature = "premul")]
            PixelFormat::Rgba16Premultiplied => {
                let mut dst_px = read_premul16_row(dst_row, count);
                if src_fmt == PixelFormat::Rgba16Premultiplied {
                    let src_px = read_premul16_row(src_row, count);
                    blend_under_premul_row(&mut dst_px, &src_px);
                } else {
                    let mut straight = vec![[0u8; 4]; count];
                    unpack_to_rgba8(src_fmt, src_row, count, &mut straight, src_palette)?;
                    let flat: Vec<u8> = straight.iter().flat_map(|p| *p).collect();
                    let mut src_px = vec![[0u16; 4]; count];
                    premul_row_from_straight(&flat, &mut src_px);
                    blend_under_premul_row(&mut dst_px, &src_px);
                }
                write_premul16_row(dst_row, &dst_px);
                Ok(())
            }
            PixelFormat::Rgba8Straight => {
                let mut dst_px = read_straight_row(dst_row, count);
                if src_fmt == PixelFormat::Rgba8Straight {
                    let src_px = read_straight_row(src_row, count);
                    blend_under_straight_row(&mut dst_px, &src_px);
                } else {
                    let mut src_px = vec![[0u8; 4]; count];
                    unpack_to_rgba8(src_fmt, src_row, count, &mut src_px, src_palette)?;
                    blend_under_straight_row(&mut dst_px, &src_px);
                }
                write_straight_row(dst_row, &dst_px);
                Ok(())
            }
            other => Err(FormatError::Unsupported(
                other,
                "only Rgba16Premultiplied and Rgba8Straight are valid blend destinations",
            )),
        }
    }
}

fn read_straight_row(row: &[u8], count: usize) -> Vec<[u8; 4]> {
    (0..count)
        .map(|i| {
            let p = &row[i * 4..i * 4 + 4];
            [p[0], p[1], p[2], p[3]]
        })
        .collect()
}

fn write_straight_row(row: &mut [u8], px: &[[u8; 4]]) {
    for (i, p) in px.iter().enumerate() {
        row[i * 4..i * 4 + 4].copy_from_slice(p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_by_id_finds_canonical_formats() {
        let reg = FormatRegistry::new();
        assert_eq!(
            reg.format_by_id(PixelFormat::Rgba8Straight.id()),
            Some(PixelFormat::Rgba8Straight)
        );
        assert_eq!(reg.format_by_id(9999), None);
    }

    #[test]
    fn blend_straight_under_straight_direct_path() {
        let reg = FormatRegistry::new();
        let mut dst = vec![0u8; 4];
        let src = [255u8, 0, 0, 255];
        reg.blend(
            PixelFormat::Rgba8Straight,
            &mut dst,
            PixelFormat::Rgba8Straight,
            &src,
            1,
            None,
        )
        .unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn blend_rgb888_over_premul_via_intermediate() {
        let reg = FormatRegistry::new();
        let mut dst = vec![0u8; 8]; // transparent premul pixel
        let src = [10u8, 20, 30]; // opaque rgb888
        reg.blend(
            PixelFormat::Rgba16Premultiplied,
            &mut dst,
            PixelFormat::Rgb888,
            &src,
            1,
            None,
        )
        .unwrap();
        let px = read_premul16_row(&dst, 1);
        // opaque src over transparent dst == src's premultiplied value.
        // `255 * (255 + 1) == 65280`, not `u16::MAX` — the swar widening
        // formula never reaches 65535 for an 8-bit source.
        assert_eq!(px[0][3], 65280);
    }

    #[test]
    fn blend_rejects_non_canonical_destination() {
        let reg = FormatRegistry::new();
        let mut dst = vec![0u8; 1];
        let src = [0u8; 4];
        let err = reg
            .blend(PixelFormat::Gray8, &mut dst, PixelFormat::Rgba8Straight, &src, 1, None)
            .unwrap_err();
        assert!(matches!(err, FormatError::Unsupported(..)));
    }
}
