//! GIF container parsing
//!
//! Walks the block structure of a GIF file held in memory and hands each
//! image's data to the LZW decoder. Only the Graphic Control Extension is
//! interpreted; all other extensions are skipped.

use core::fmt;

use super::lzw::{ImageTarget, LzwDecoder, SubBlocks};
use crate::color::PackedColor;

/// Delay reported when a frame has no (or a zero) Graphic Control delay
pub const DEFAULT_DELAY_MS: u32 = 100;

/// Largest LZW minimum code size for 8-bit palette indices
const MAX_MIN_CODE_SIZE: u8 = 8;

const EXTENSION_INTRODUCER: u8 = 0x21;
const IMAGE_SEPARATOR: u8 = 0x2C;
const GRAPHIC_CONTROL_LABEL: u8 = 0xF9;

/// Format errors that make a GIF unplayable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GifError {
    /// File does not start with `GIF87a` or `GIF89a`
    BadMagic,
    /// File ends inside the header or logical screen descriptor
    Truncated,
    /// Logical screen size differs from the output surface
    SizeMismatch {
        expected: (u16, u16),
        found: (u16, u16),
    },
    /// Interlaced images are not supported
    Interlaced,
    /// LZW minimum code size outside what 8-bit indices allow
    InvalidCodeSize(u8),
}

impl fmt::Display for GifError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GifError::BadMagic => f.write_str("not a GIF file"),
            GifError::Truncated => f.write_str("GIF header truncated"),
            GifError::SizeMismatch { expected, found } => write!(
                f,
                "GIF size must match output size ({}x{}), got {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            GifError::Interlaced => f.write_str("interlaced GIFs are not supported"),
            GifError::InvalidCodeSize(size) => write!(f, "invalid LZW minimum code size {}", size),
        }
    }
}

impl core::error::Error for GifError {}

/// One decoded image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GifFrame {
    /// How long this frame should stay on screen
    pub delay_ms: u32,
    /// Image rectangle on the logical screen
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    /// Palette index that was left unpainted, if any
    pub transparent: Option<u8>,
}

/// Parsed Graphic Control Extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GraphicControl {
    delay_ms: u32,
    transparent: Option<u8>,
}

impl Default for GraphicControl {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            transparent: None,
        }
    }
}

/// Byte cursor over the file
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let bytes = self.data.get(self.pos..self.pos + n)?;
        self.pos += n;
        Some(bytes)
    }

    fn u8(&mut self) -> Option<u8> {
        self.take(1).map(|b| b[0])
    }

    fn u16(&mut self) -> Option<u16> {
        self.take(2).map(|b| u16::from_le_bytes([b[0], b[1]]))
    }

    /// Position, size and packed flags of an image
    fn image_descriptor(&mut self) -> Option<(u16, u16, u16, u16, u8)> {
        Some((self.u16()?, self.u16()?, self.u16()?, self.u16()?, self.u8()?))
    }
}

/// Convert an RGB color table to packed colors
///
/// Indices past the end of the table resolve to black.
fn load_palette(table: &[u8]) -> [PackedColor; 256] {
    let mut palette = [PackedColor::BLACK; 256];
    for (entry, rgb) in palette.iter_mut().zip(table.chunks_exact(3)) {
        *entry = PackedColor::from_rgb(rgb[0], rgb[1], rgb[2]);
    }
    palette
}

/// Number of entries of a color table from its packed size bits
const fn table_entries(packed: u8) -> usize {
    1 << ((packed & 0x07) + 1)
}

/// Streaming GIF decoder
///
/// Frames are produced one at a time with [`GifDecoder::next_frame`], each
/// decoded on top of whatever the destination buffer already holds.
pub struct GifDecoder<'a> {
    cursor: Cursor<'a>,
    width: u16,
    height: u16,
    background: u8,
    global: Option<[PackedColor; 256]>,
    control: Option<GraphicControl>,
    finished: bool,
}

impl<'a> GifDecoder<'a> {
    /// Parse the header and logical screen descriptor
    ///
    /// Fails unless the logical screen is exactly `width` × `height`.
    pub fn new(data: &'a [u8], width: u16, height: u16) -> Result<Self, GifError> {
        let mut cursor = Cursor { data, pos: 0 };

        let magic = cursor.take(6).ok_or(GifError::BadMagic)?;
        if magic != b"GIF87a" && magic != b"GIF89a" {
            return Err(GifError::BadMagic);
        }

        let screen_w = cursor.u16().ok_or(GifError::Truncated)?;
        let screen_h = cursor.u16().ok_or(GifError::Truncated)?;
        let packed = cursor.u8().ok_or(GifError::Truncated)?;
        let background = cursor.u8().ok_or(GifError::Truncated)?;
        let _aspect = cursor.u8().ok_or(GifError::Truncated)?;

        if (screen_w, screen_h) != (width, height) {
            return Err(GifError::SizeMismatch {
                expected: (width, height),
                found: (screen_w, screen_h),
            });
        }

        let global = if packed & 0x80 != 0 {
            let table = cursor
                .take(table_entries(packed) * 3)
                .ok_or(GifError::Truncated)?;
            Some(load_palette(table))
        } else {
            None
        };

        Ok(Self {
            cursor,
            width,
            height,
            background,
            global,
            control: None,
            finished: false,
        })
    }

    /// Logical screen size
    pub fn screen_size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Background color from the global palette, black without one
    pub fn background_color(&self) -> PackedColor {
        self.global
            .as_ref()
            .map(|palette| palette[self.background as usize])
            .unwrap_or(PackedColor::BLACK)
    }

    /// Decode the next image into `dst`
    ///
    /// `dst` holds the full logical screen, two bytes per pixel. Returns
    /// `Ok(None)` at the trailer, at an unknown block, or when the data runs
    /// out. Once the stream has ended (or an error was returned) every
    /// further call returns `Ok(None)`.
    pub fn next_frame(
        &mut self,
        lzw: &mut LzwDecoder,
        dst: &mut [u8],
    ) -> Result<Option<GifFrame>, GifError> {
        while !self.finished {
            let Some(introducer) = self.cursor.u8() else {
                break;
            };

            match introducer {
                EXTENSION_INTRODUCER => {
                    if self.read_extension().is_none() {
                        break;
                    }
                }
                IMAGE_SEPARATOR => {
                    let frame = self.read_image(lzw, dst);
                    if !matches!(frame, Ok(Some(_))) {
                        self.finished = true;
                    }
                    return frame;
                }
                _ => break,
            }
        }

        self.finished = true;
        Ok(None)
    }

    /// Parse one extension block; `None` if the data ran out
    fn read_extension(&mut self) -> Option<()> {
        let label = self.cursor.u8()?;
        if label == GRAPHIC_CONTROL_LABEL {
            let size = self.cursor.u8()? as usize;
            let body = self.cursor.take(size)?;
            if let &[packed, lo, hi, transparent, ..] = body {
                let delay = u16::from_le_bytes([lo, hi]) as u32;
                self.control = Some(GraphicControl {
                    delay_ms: if delay > 0 { delay * 10 } else { DEFAULT_DELAY_MS },
                    transparent: (packed & 0x01 != 0).then_some(transparent),
                });
            }
        }

        let blocks = SubBlocks::new(self.cursor.data, self.cursor.pos);
        self.cursor.pos = blocks.drain();
        Some(())
    }

    /// Parse an image descriptor and decode its pixels
    fn read_image(
        &mut self,
        lzw: &mut LzwDecoder,
        dst: &mut [u8],
    ) -> Result<Option<GifFrame>, GifError> {
        let Some((left, top, width, height, packed)) = self.cursor.image_descriptor() else {
            return Ok(None);
        };

        if packed & 0x40 != 0 {
            return Err(GifError::Interlaced);
        }

        let local = if packed & 0x80 != 0 {
            let Some(table) = self.cursor.take(table_entries(packed) * 3) else {
                return Ok(None);
            };
            Some(load_palette(table))
        } else {
            None
        };
        let palette = local
            .as_ref()
            .or(self.global.as_ref())
            .copied()
            .unwrap_or([PackedColor::BLACK; 256]);

        let Some(min_code_size) = self.cursor.u8() else {
            return Ok(None);
        };
        if min_code_size > MAX_MIN_CODE_SIZE {
            return Err(GifError::InvalidCodeSize(min_code_size));
        }

        let control = self.control.take().unwrap_or_default();
        let mut target = ImageTarget {
            buf: dst,
            palette: &palette,
            transparent: control.transparent,
            left: left as usize,
            top: top as usize,
            width: width as usize,
            screen_width: self.width as usize,
            screen_height: self.height as usize,
            budget: width as usize * height as usize,
            x: 0,
            y: 0,
            written: 0,
        };

        let mut blocks = SubBlocks::new(self.cursor.data, self.cursor.pos);
        lzw.decode(min_code_size, &mut blocks, &mut target);
        self.cursor.pos = blocks.drain();

        Ok(Some(GifFrame {
            delay_ms: control.delay_ms,
            left,
            top,
            width,
            height,
            transparent: control.transparent,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gif::lzw::tests::pack;

    const RED: PackedColor = PackedColor::from_rgb(255, 0, 0);
    const GREEN: PackedColor = PackedColor::from_rgb(0, 255, 0);
    const BLUE: PackedColor = PackedColor::from_rgb(0, 0, 255);
    const WHITE: PackedColor = PackedColor::from_rgb(255, 255, 255);

    fn header(magic: &[u8], width: u16, height: u16) -> Vec<u8> {
        let mut gif = magic.to_vec();
        gif.extend_from_slice(&width.to_le_bytes());
        gif.extend_from_slice(&height.to_le_bytes());
        // Global table of 4 entries
        gif.extend_from_slice(&[0x81, 0, 0]);
        gif.extend_from_slice(&[255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255]);
        gif
    }

    fn graphic_control(gif: &mut Vec<u8>, delay_cs: u16, transparent: Option<u8>) {
        let [lo, hi] = delay_cs.to_le_bytes();
        let packed = if transparent.is_some() { 0x01 } else { 0x00 };
        gif.extend_from_slice(&[0x21, 0xF9, 4, packed, lo, hi, transparent.unwrap_or(0), 0]);
    }

    /// 2x2 image at (0, 0) with pixels 0 1 / 2 3
    fn image(gif: &mut Vec<u8>) {
        gif.extend_from_slice(&[0x2C, 0, 0, 0, 0, 2, 0, 2, 0, 0x00, 2]);
        gif.extend(pack(&[(4, 3), (0, 3), (1, 3), (2, 3), (3, 4), (5, 4)]));
    }

    fn pixels(buf: &[u8]) -> Vec<PackedColor> {
        buf.chunks_exact(2)
            .map(|c| PackedColor::from_be_bytes([c[0], c[1]]))
            .collect()
    }

    #[test]
    fn test_minimal_gif87a() {
        let mut gif = header(b"GIF87a", 2, 2);
        image(&mut gif);
        gif.push(0x3B);

        let mut lzw = LzwDecoder::new();
        let mut buf = [0u8; 8];
        let mut decoder = GifDecoder::new(&gif, 2, 2).unwrap();

        let frame = decoder.next_frame(&mut lzw, &mut buf).unwrap().unwrap();
        assert_eq!(frame.delay_ms, DEFAULT_DELAY_MS);
        assert_eq!(frame.transparent, None);
        assert_eq!((frame.width, frame.height), (2, 2));
        assert_eq!(pixels(&buf), vec![RED, GREEN, BLUE, WHITE]);

        assert_eq!(decoder.next_frame(&mut lzw, &mut buf), Ok(None));
        assert_eq!(decoder.next_frame(&mut lzw, &mut buf), Ok(None));
    }

    #[test]
    fn test_transparent_index_keeps_prior_pixel() {
        let mut gif = header(b"GIF89a", 2, 2);
        graphic_control(&mut gif, 5, Some(0));
        image(&mut gif);
        gif.push(0x3B);

        let mut lzw = LzwDecoder::new();
        let prior = PackedColor(0x1234);
        let mut buf = [0u8; 8];
        prior.fill(&mut buf);

        let mut decoder = GifDecoder::new(&gif, 2, 2).unwrap();
        let frame = decoder.next_frame(&mut lzw, &mut buf).unwrap().unwrap();
        assert_eq!(frame.delay_ms, 50);
        assert_eq!(frame.transparent, Some(0));
        assert_eq!(pixels(&buf), vec![prior, GREEN, BLUE, WHITE]);
    }

    #[test]
    fn test_control_applies_to_one_image_only() {
        let mut gif = header(b"GIF89a", 2, 2);
        graphic_control(&mut gif, 0, Some(0));
        image(&mut gif);
        image(&mut gif);
        gif.push(0x3B);

        let mut lzw = LzwDecoder::new();
        let mut buf = [0u8; 8];
        let mut decoder = GifDecoder::new(&gif, 2, 2).unwrap();

        // Zero delay falls back to the default
        let first = decoder.next_frame(&mut lzw, &mut buf).unwrap().unwrap();
        assert_eq!(first.delay_ms, DEFAULT_DELAY_MS);
        assert_eq!(first.transparent, Some(0));

        let second = decoder.next_frame(&mut lzw, &mut buf).unwrap().unwrap();
        assert_eq!(second.transparent, None);
        assert_eq!(pixels(&buf)[0], RED);
    }

    #[test]
    fn test_other_extensions_skipped() {
        let mut gif = header(b"GIF89a", 2, 2);
        // Application extension with two data sub-blocks
        gif.extend_from_slice(&[0x21, 0xFF, 3, b'A', b'B', b'C', 2, 1, 2, 0]);
        // Comment extension
        gif.extend_from_slice(&[0x21, 0xFE, 2, b'h', b'i', 0]);
        image(&mut gif);
        gif.push(0x3B);

        let mut lzw = LzwDecoder::new();
        let mut buf = [0u8; 8];
        let mut decoder = GifDecoder::new(&gif, 2, 2).unwrap();
        assert!(decoder.next_frame(&mut lzw, &mut buf).unwrap().is_some());
        assert_eq!(pixels(&buf), vec![RED, GREEN, BLUE, WHITE]);
    }

    #[test]
    fn test_local_palette_and_offset() {
        let mut gif = header(b"GIF89a", 3, 2);
        // 1x1 image at (2, 1) with a 2-entry local table
        gif.extend_from_slice(&[0x2C, 2, 0, 1, 0, 1, 0, 1, 0, 0x80]);
        gif.extend_from_slice(&[0, 0, 0, 10, 20, 30]);
        gif.push(2);
        gif.extend(pack(&[(4, 3), (1, 3), (5, 3)]));
        gif.push(0x3B);

        let mut lzw = LzwDecoder::new();
        let mut buf = [0u8; 12];
        let mut decoder = GifDecoder::new(&gif, 3, 2).unwrap();
        let frame = decoder.next_frame(&mut lzw, &mut buf).unwrap().unwrap();
        assert_eq!((frame.left, frame.top), (2, 1));

        let out = pixels(&buf);
        assert_eq!(out[5], PackedColor::from_rgb(10, 20, 30));
        assert!(out[..5].iter().all(|&c| c == PackedColor::BLACK));
    }

    #[test]
    fn test_image_clipped_to_screen() {
        let mut gif = header(b"GIF89a", 2, 2);
        // 2x2 image at (1, 1): only its top-left pixel is on screen
        gif.extend_from_slice(&[0x2C, 1, 0, 1, 0, 2, 0, 2, 0, 0x00, 2]);
        gif.extend(pack(&[(4, 3), (0, 3), (1, 3), (2, 3), (3, 4), (5, 4)]));
        gif.push(0x3B);

        let mut lzw = LzwDecoder::new();
        let mut buf = [0u8; 8];
        let mut decoder = GifDecoder::new(&gif, 2, 2).unwrap();
        decoder.next_frame(&mut lzw, &mut buf).unwrap();
        let out = pixels(&buf);
        assert_eq!(out[3], RED);
        assert!(out[..3].iter().all(|&c| c == PackedColor::BLACK));
    }

    #[test]
    fn test_reference_sample() {
        // 10x10, four colors, from the widely used format walkthrough
        let gif: [u8; 69] = [
            0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x0A, 0x00, 0x0A, 0x00, 0x91, 0x00, 0x00, 0xFF,
            0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x00, 0x00, 0x00, 0x21, 0xF9, 0x04,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x0A, 0x00,
            0x00, 0x02, 0x16, 0x8C, 0x2D, 0x99, 0x87, 0x2A, 0x1C, 0xDC, 0x33, 0xA0, 0x02, 0x75,
            0xEC, 0x95, 0xFA, 0xA8, 0xDE, 0x60, 0x8C, 0x04, 0x91, 0x4C, 0x01, 0x00, 0x3B,
        ];
        let rows = [
            "1111122222",
            "1111122222",
            "1111122222",
            "1110000222",
            "1110000222",
            "2220000111",
            "2220000111",
            "2222211111",
            "2222211111",
            "2222211111",
        ];
        let palette = [WHITE, RED, BLUE];

        let mut lzw = LzwDecoder::new();
        let mut buf = [0u8; 200];
        let mut decoder = GifDecoder::new(&gif, 10, 10).unwrap();
        let frame = decoder.next_frame(&mut lzw, &mut buf).unwrap().unwrap();
        assert_eq!(frame.delay_ms, DEFAULT_DELAY_MS);

        let expected: Vec<PackedColor> = rows
            .iter()
            .flat_map(|row| row.bytes().map(|b| palette[(b - b'0') as usize]))
            .collect();
        assert_eq!(pixels(&buf), expected);
        assert_eq!(decoder.next_frame(&mut lzw, &mut buf), Ok(None));
    }

    #[test]
    fn test_bad_magic() {
        assert_eq!(
            GifDecoder::new(b"PNG89a\x02\x00\x02\x00\x00\x00\x00", 2, 2).err(),
            Some(GifError::BadMagic)
        );
        assert_eq!(GifDecoder::new(b"GIF", 2, 2).err(), Some(GifError::BadMagic));
    }

    #[test]
    fn test_size_mismatch() {
        let gif = header(b"GIF89a", 4, 2);
        assert_eq!(
            GifDecoder::new(&gif, 2, 2).err(),
            Some(GifError::SizeMismatch {
                expected: (2, 2),
                found: (4, 2),
            })
        );
    }

    #[test]
    fn test_truncated_header() {
        assert_eq!(GifDecoder::new(b"GIF89a\x02\x00", 2, 2).err(), Some(GifError::Truncated));
    }

    #[test]
    fn test_interlaced_rejected() {
        let mut gif = header(b"GIF89a", 2, 2);
        gif.extend_from_slice(&[0x2C, 0, 0, 0, 0, 2, 0, 2, 0, 0x40, 2]);
        gif.extend(pack(&[(4, 3), (0, 3), (5, 3)]));
        gif.push(0x3B);

        let mut lzw = LzwDecoder::new();
        let mut buf = [0u8; 8];
        let mut decoder = GifDecoder::new(&gif, 2, 2).unwrap();
        assert_eq!(decoder.next_frame(&mut lzw, &mut buf), Err(GifError::Interlaced));
        assert_eq!(decoder.next_frame(&mut lzw, &mut buf), Ok(None));
    }

    #[test]
    fn test_invalid_code_size() {
        for size in [9, 12] {
            let mut gif = header(b"GIF89a", 2, 2);
            gif.extend_from_slice(&[0x2C, 0, 0, 0, 0, 2, 0, 2, 0, 0x00, size, 0]);

            let mut lzw = LzwDecoder::new();
            let mut buf = [0u8; 8];
            let mut decoder = GifDecoder::new(&gif, 2, 2).unwrap();
            assert_eq!(
                decoder.next_frame(&mut lzw, &mut buf),
                Err(GifError::InvalidCodeSize(size))
            );
        }
    }

    #[test]
    fn test_truncated_image_data_is_soft() {
        let mut gif = header(b"GIF89a", 2, 2);
        gif.extend_from_slice(&[0x2C, 0, 0, 0, 0, 2, 0, 2, 0, 0x00, 2]);
        let chain = pack(&[(4, 3), (0, 3), (1, 3), (2, 3), (3, 4), (5, 4)]);
        // Cut after the first data byte, no terminator, no trailer
        gif.extend_from_slice(&chain[..2]);

        let mut lzw = LzwDecoder::new();
        let mut buf = [0u8; 8];
        let mut decoder = GifDecoder::new(&gif, 2, 2).unwrap();
        let frame = decoder.next_frame(&mut lzw, &mut buf).unwrap();
        assert!(frame.is_some());
        assert_eq!(pixels(&buf)[0], RED);
        assert_eq!(decoder.next_frame(&mut lzw, &mut buf), Ok(None));
    }

    #[test]
    fn test_unknown_block_ends_stream() {
        let mut gif = header(b"GIF89a", 2, 2);
        gif.push(0x99);
        image(&mut gif);

        let mut lzw = LzwDecoder::new();
        let mut buf = [0u8; 8];
        let mut decoder = GifDecoder::new(&gif, 2, 2).unwrap();
        assert_eq!(decoder.next_frame(&mut lzw, &mut buf), Ok(None));
    }

    #[test]
    fn test_error_messages() {
        let err = GifError::SizeMismatch {
            expected: (240, 135),
            found: (100, 100),
        };
        assert_eq!(
            err.to_string(),
            "GIF size must match output size (240x135), got 100x100"
        );
    }
}
