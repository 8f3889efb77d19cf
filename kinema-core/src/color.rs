//! RGB565 pixel packing
//!
//! Every pixel buffer in the system stores colors as two bytes, high byte
//! first, which is the order the ST7789 expects on the wire.

/// Bytes per packed pixel
pub const BYTES_PER_PIXEL: usize = 2;

/// 16-bit packed color: 5 bits red, 6 bits green, 5 bits blue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PackedColor(pub u16);

impl PackedColor {
    pub const BLACK: Self = Self(0x0000);
    pub const WHITE: Self = Self(0xFFFF);

    /// Pack an 8-bit-per-channel color, truncating the low bits
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3))
    }

    /// Rebuild a color from its serialized form
    pub const fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }

    /// Serialized form, high byte first
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// Write this color at pixel `index` of `buf`
    ///
    /// Out-of-range indices are ignored.
    #[inline]
    pub fn write_at(self, buf: &mut [u8], index: usize) {
        let start = index * BYTES_PER_PIXEL;
        if let Some(dst) = buf.get_mut(start..start + BYTES_PER_PIXEL) {
            dst.copy_from_slice(&self.to_be_bytes());
        }
    }

    /// Fill every whole pixel of `buf` with this color
    pub fn fill(self, buf: &mut [u8]) {
        let bytes = self.to_be_bytes();
        for chunk in buf.chunks_exact_mut(BYTES_PER_PIXEL) {
            chunk.copy_from_slice(&bytes);
        }
    }
}
