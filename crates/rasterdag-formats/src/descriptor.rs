//! The [`PixelFormat`] tag and its per-format capability metadata.

/// A pixel format, tag-dispatched rather than represented as a trait
/// object hierarchy.
///
/// Every format-specific operation in this crate (`convert`, `premul`,
/// `blend`) is a `match` over this enum. IDs ([`PixelFormat::id`]) are
/// stable across runs; new formats must be appended, never inserted, so
/// that a host persisting IDs across process restarts is never broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit packed R3G3B2, no alpha.
    Rgb332,
    /// 16-bit packed R5G6B5, little-endian, no alpha.
    Rgb565Le,
    /// 16-bit packed R5G6B5, big-endian, no alpha.
    Rgb565Be,
    /// 24-bit RGB, no alpha.
    Rgb888,
    /// 24-bit BGR, no alpha.
    Bgr888,
    /// 32-bit RGBA, straight (non-premultiplied) alpha. The canonical
    /// external format.
    Rgba8Straight,
    /// 64-bit RGBA, premultiplied alpha. The canonical internal working
    /// format.
    Rgba16Premultiplied,
    /// 8-bit grayscale, no alpha.
    Gray8,
    /// 8-bit palette index; palette entries are [`PixelFormat::Rgba8Straight`].
    Index8,
    /// Sub-byte packed palette index (1, 2, or 4 bits per pixel).
    BitPackedIndex {
        /// Bits per pixel: 1, 2, or 4.
        bits: u8,
    },
}

impl PixelFormat {
    /// The stable small-integer ID for this format.
    ///
    /// `BitPackedIndex` shares one ID regardless of its `bits` field —
    /// the bit width is a parameter of the format, not a distinct
    /// format identity.
    pub const fn id(self) -> u16 {
        match self {
            PixelFormat::Rgb332 => 0,
            PixelFormat::Rgb565Le => 1,
            PixelFormat::Rgb565Be => 2,
            PixelFormat::Rgb888 => 3,
            PixelFormat::Bgr888 => 4,
            PixelFormat::Rgba8Straight => 5,
            PixelFormat::Rgba16Premultiplied => 6,
            PixelFormat::Gray8 => 7,
            PixelFormat::Index8 => 8,
            PixelFormat::BitPackedIndex { .. } => 9,
        }
    }

    /// Bits per pixel. For sub-byte packed formats this is less than 8.
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Rgb332 => 8,
            PixelFormat::Rgb565Le | PixelFormat::Rgb565Be => 16,
            PixelFormat::Rgb888 | PixelFormat::Bgr888 => 24,
            PixelFormat::Rgba8Straight => 32,
            PixelFormat::Rgba16Premultiplied => 64,
            PixelFormat::Gray8 => 8,
            PixelFormat::Index8 => 8,
            PixelFormat::BitPackedIndex { bits } => bits as u32,
        }
    }

    /// Bytes per pixel, rounded up. Sub-byte packed formats round up to
    /// 1; callers needing exact packing density must use
    /// [`PixelFormat::bits_per_pixel`].
    pub const fn bytes_per_pixel_ceil(self) -> u32 {
        self.bits_per_pixel().div_ceil(8)
    }

    /// Whether this format carries an alpha channel.
    pub const fn has_alpha(self) -> bool {
        matches!(
            self,
            PixelFormat::Rgba8Straight
                | PixelFormat::Rgba16Premultiplied
                | PixelFormat::Index8
                | PixelFormat::BitPackedIndex { .. }
        )
    }

    /// Whether this format's alpha (if any) is premultiplied into the
    /// color channels.
    pub const fn is_premultiplied(self) -> bool {
        matches!(self, PixelFormat::Rgba16Premultiplied)
    }

    /// Whether this format stores palette indices rather than direct
    /// color.
    pub const fn is_paletted(self) -> bool {
        matches!(
            self,
            PixelFormat::Index8 | PixelFormat::BitPackedIndex { .. }
        )
    }

    /// Whether multiple pixels are packed sub-byte within a single byte.
    pub const fn is_packed(self) -> bool {
        matches!(self, PixelFormat::BitPackedIndex { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable_and_distinct() {
        let formats = [
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
        let mut ids: Vec<u16> = formats.iter().map(|f| f.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), formats.len());
    }

    #[test]
    fn canonical_formats_report_alpha_correctly() {
        assert!(PixelFormat::Rgba8Straight.has_alpha());
        assert!(!PixelFormat::Rgba8Straight.is_premultiplied());
        assert!(PixelFormat::Rgba16Premultiplied.has_alpha());
        assert!(PixelFormat::Rgba16Premultiplied.is_premultiplied());
        assert!(!PixelFormat::Rgb888.has_alpha());
    }

    #[test]
    fn bit_packed_index_rounds_up_to_whole_bytes() {
        assert_eq!(
            PixelFormat::BitPackedIndex { bits: 1 }.bytes_per_pixel_ceil(),
            1
        );
        assert_eq!(PixelFormat::Rgba16Premultiplied.bytes_per_pixel_ceil(), 8);
    }
}
