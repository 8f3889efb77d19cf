//! GIF LZW decompression
//!
//! Codes are read LSB-first from the image's data sub-blocks and expanded
//! through the prefix/suffix tables. Pixels go straight to an
//! [`ImageTarget`], never through an intermediate index buffer.

use crate::color::PackedColor;

/// Dictionary capacity (12-bit codes)
pub const MAX_CODES: usize = 4096;

/// Widest code the format allows
const MAX_CODE_WIDTH: u32 = 12;

/// Reads the payload of a chain of GIF sub-blocks as one byte stream
///
/// Each sub-block is a length byte followed by that many bytes; a zero
/// length terminates the chain. A missing terminator or short block is
/// treated as the end of the chain.
pub(crate) struct SubBlocks<'a> {
    data: &'a [u8],
    pos: usize,
    remaining: usize,
    finished: bool,
}

impl<'a> SubBlocks<'a> {
    pub(crate) fn new(data: &'a [u8], pos: usize) -> Self {
        Self {
            data,
            pos,
            remaining: 0,
            finished: false,
        }
    }

    /// Next payload byte, or `None` once the chain has ended
    pub(crate) fn next_byte(&mut self) -> Option<u8> {
        while !self.finished {
            if self.remaining > 0 {
                let Some(&byte) = self.data.get(self.pos) else {
                    self.finished = true;
                    break;
                };
                self.pos += 1;
                self.remaining -= 1;
                return Some(byte);
            }

            match self.data.get(self.pos) {
                Some(&0) | None => {
                    self.pos = (self.pos + 1).min(self.data.len());
                    self.finished = true;
                }
                Some(&len) => {
                    self.pos += 1;
                    self.remaining = len as usize;
                }
            }
        }
        None
    }

    /// Skip whatever is left of the chain, including its terminator
    ///
    /// Returns the position of the first byte after the chain.
    pub(crate) fn drain(mut self) -> usize {
        self.pos = (self.pos + self.remaining).min(self.data.len());
        self.remaining = 0;
        while !self.finished {
            match self.data.get(self.pos) {
                Some(&0) | None => {
                    self.pos = (self.pos + 1).min(self.data.len());
                    self.finished = true;
                }
                Some(&len) => {
                    self.pos = (self.pos + 1 + len as usize).min(self.data.len());
                }
            }
        }
        self.pos
    }
}

/// LSB-first bit accumulator
struct BitReader {
    acc: u32,
    bits: u32,
}

impl BitReader {
    const fn new() -> Self {
        Self { acc: 0, bits: 0 }
    }

    fn read(&mut self, width: u32, src: &mut SubBlocks<'_>) -> Option<u16> {
        while self.bits < width {
            let byte = src.next_byte()?;
            self.acc |= (byte as u32) << self.bits;
            self.bits += 8;
        }
        let code = self.acc & ((1 << width) - 1);
        self.acc >>= width;
        self.bits -= width;
        Some(code as u16)
    }
}

/// Destination of decoded pixels for one image
///
/// Tracks the raster cursor inside the image rectangle, skips transparent
/// pixels, clips to the screen, and stops at the image's pixel budget.
pub(crate) struct ImageTarget<'b, 'p> {
    pub(crate) buf: &'b mut [u8],
    pub(crate) palette: &'p [PackedColor; 256],
    pub(crate) transparent: Option<u8>,
    pub(crate) left: usize,
    pub(crate) top: usize,
    pub(crate) width: usize,
    pub(crate) screen_width: usize,
    pub(crate) screen_height: usize,
    pub(crate) budget: usize,
    pub(crate) x: usize,
    pub(crate) y: usize,
    pub(crate) written: usize,
}

impl ImageTarget<'_, '_> {
    fn is_full(&self) -> bool {
        self.written >= self.budget
    }

    /// Emit one palette index; returns false once the budget is exhausted
    fn push(&mut self, index: u8) -> bool {
        if self.is_full() {
            return false;
        }

        if self.transparent != Some(index) {
            let sx = self.left + self.x;
            let sy = self.top + self.y;
            if sx < self.screen_width && sy < self.screen_height {
                self.palette[index as usize].write_at(self.buf, sy * self.screen_width + sx);
            }
        }

        self.written += 1;
        self.x += 1;
        if self.x >= self.width {
            self.x = 0;
            self.y += 1;
        }
        true
    }
}

/// LZW decoder state
///
/// Holds the dictionary and the expansion stack. Large enough that
/// firmware keeps one in a static and reuses it for every image.
pub struct LzwDecoder {
    prefix: [u16; MAX_CODES],
    suffix: [u8; MAX_CODES],
    stack: [u8; MAX_CODES],
}

impl Default for LzwDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LzwDecoder {
    pub const fn new() -> Self {
        Self {
            prefix: [0; MAX_CODES],
            suffix: [0; MAX_CODES],
            stack: [0; MAX_CODES],
        }
    }

    /// Reset root entries below the clear code to identity
    fn reset(&mut self, clear: u16) {
        for code in 0..clear as usize {
            self.prefix[code] = 0;
            self.suffix[code] = code as u8;
        }
    }

    /// Write the expansion of `code` to `target`
    ///
    /// Returns the first pixel of the expansion, or `None` if the target
    /// filled up (or the chain is malformed) before the whole expansion was
    /// written.
    fn emit(&mut self, code: u16, clear: u16, target: &mut ImageTarget<'_, '_>) -> Option<u8> {
        let mut top = 0;
        let mut code = code;
        while code >= clear {
            if top + 1 >= MAX_CODES {
                return None;
            }
            self.stack[top] = self.suffix[code as usize];
            top += 1;
            code = self.prefix[code as usize];
        }
        self.stack[top] = code as u8;
        top += 1;

        let first = self.stack[top - 1];
        while top > 0 {
            top -= 1;
            if !target.push(self.stack[top]) {
                return None;
            }
        }
        Some(first)
    }

    /// Decode one image's LZW stream into `target`
    ///
    /// Stops at the end code, at the end of the data, at the pixel budget,
    /// or at a code the dictionary cannot explain. None of these are
    /// errors. The caller is responsible for draining the sub-blocks.
    pub(crate) fn decode(
        &mut self,
        min_code_size: u8,
        src: &mut SubBlocks<'_>,
        target: &mut ImageTarget<'_, '_>,
    ) {
        let clear: u16 = 1 << min_code_size;
        let end = clear + 1;
        let initial_width = min_code_size as u32 + 1;

        let mut width = initial_width;
        let mut next = end + 1;
        let mut prev: Option<u16> = None;
        let mut bits = BitReader::new();

        self.reset(clear);

        while !target.is_full() {
            let Some(code) = bits.read(width, src) else {
                break;
            };

            if code == clear {
                width = initial_width;
                next = end + 1;
                prev = None;
                continue;
            }
            if code == end {
                break;
            }

            let first = match prev {
                _ if code < next => match self.emit(code, clear, target) {
                    Some(first) => first,
                    None => break,
                },
                // Code not yet in the table: previous string plus its own first pixel
                Some(p) if code == next => {
                    let Some(first) = self.emit(p, clear, target) else {
                        break;
                    };
                    if !target.push(first) {
                        break;
                    }
                    first
                }
                _ => break,
            };

            if let Some(p) = prev {
                if (next as usize) < MAX_CODES {
                    self.prefix[next as usize] = p;
                    self.suffix[next as usize] = first;
                    next += 1;
                    if next as u32 >= (1 << width) && width < MAX_CODE_WIDTH {
                        width += 1;
                    }
                }
            }
            prev = Some(code);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Pack (code, width) pairs LSB-first into a single sub-block chain
    pub(crate) fn pack(codes: &[(u16, u32)]) -> Vec<u8> {
        let mut bytes = Vec::new();
        let mut acc = 0u32;
        let mut bits = 0u32;
        for &(code, width) in codes {
            acc |= (code as u32) << bits;
            bits += width;
            while bits >= 8 {
                bytes.push(acc as u8);
                acc >>= 8;
                bits -= 8;
            }
        }
        if bits > 0 {
            bytes.push(acc as u8);
        }

        let mut chain = Vec::new();
        for chunk in bytes.chunks(255) {
            chain.push(chunk.len() as u8);
            chain.extend_from_slice(chunk);
        }
        chain.push(0);
        chain
    }

    fn grey_palette() -> [PackedColor; 256] {
        let mut palette = [PackedColor::BLACK; 256];
        for (i, entry) in palette.iter_mut().enumerate() {
            *entry = PackedColor(i as u16);
        }
        palette
    }

    fn decode_indices(min: u8, chain: &[u8], pixels: usize) -> (Vec<u16>, usize) {
        let palette = grey_palette();
        let mut buf = vec![0xFFu8; pixels * 2];
        let mut target = ImageTarget {
            buf: &mut buf,
            palette: &palette,
            transparent: None,
            left: 0,
            top: 0,
            width: pixels,
            screen_width: pixels,
            screen_height: 1,
            budget: pixels,
            x: 0,
            y: 0,
            written: 0,
        };
        let mut lzw = LzwDecoder::new();
        let mut src = SubBlocks::new(chain, 0);
        lzw.decode(min, &mut src, &mut target);
        let written = target.written;
        let end = src.drain();
        assert_eq!(end, chain.len());
        let out = buf
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        (out, written)
    }

    #[test]
    fn test_literal_codes() {
        // clear, 0, 1, 2, 3, end; width grows to 4 after the third entry
        let chain = pack(&[(4, 3), (0, 3), (1, 3), (2, 3), (3, 4), (5, 4)]);
        let (out, written) = decode_indices(2, &chain, 4);
        assert_eq!(written, 4);
        assert_eq!(out, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_kwkwk_code() {
        // clear, 1, 6 (not yet defined: "1" + "1"), end -> 1 1 1
        let chain = pack(&[(4, 3), (1, 3), (6, 3), (5, 3)]);
        let (out, written) = decode_indices(2, &chain, 3);
        assert_eq!(written, 3);
        assert_eq!(out, vec![1, 1, 1]);
    }

    #[test]
    fn test_first_pixel_of_multi_pixel_code() {
        // clear, 1, 2 (adds 6 = "1 2"), 6 (adds 7 = "2 1"), 7, end
        // -> 1 2 1 2 2 1
        let chain = pack(&[(4, 3), (1, 3), (2, 3), (6, 3), (7, 4), (5, 4)]);
        let (out, _) = decode_indices(2, &chain, 6);
        assert_eq!(out, vec![1, 2, 1, 2, 2, 1]);
    }

    #[test]
    fn test_budget_stops_decoding() {
        let chain = pack(&[(4, 3), (0, 3), (1, 3), (2, 3), (3, 4), (5, 4)]);
        let (out, written) = decode_indices(2, &chain, 2);
        assert_eq!(written, 2);
        assert_eq!(out, vec![0, 1]);
    }

    #[test]
    fn test_missing_end_code() {
        // Data simply runs out after the pixels
        let chain = pack(&[(4, 3), (3, 3), (2, 3)]);
        let (out, written) = decode_indices(2, &chain, 2);
        assert_eq!(written, 2);
        assert_eq!(out, vec![3, 2]);
    }

    #[test]
    fn test_undefined_code_stops() {
        // Code 7 is beyond next (6) right after clear + one literal
        let chain = pack(&[(4, 3), (1, 3), (7, 3), (2, 3), (5, 3)]);
        let (out, written) = decode_indices(2, &chain, 3);
        assert_eq!(written, 1);
        assert_eq!(out, vec![1, 0xFFFF, 0xFFFF]);
    }

    #[test]
    fn test_clear_mid_stream() {
        // clear, 1, 2, clear, 3, end
        let chain = pack(&[(4, 3), (1, 3), (2, 3), (4, 3), (3, 3), (5, 3)]);
        let (out, _) = decode_indices(2, &chain, 3);
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn test_sub_blocks_drain_after_partial_read() {
        let data = [2, 0xAA, 0xBB, 1, 0xCC, 0, 0x3B];
        let mut src = SubBlocks::new(&data, 0);
        assert_eq!(src.next_byte(), Some(0xAA));
        assert_eq!(src.drain(), 6);
    }

    #[test]
    fn test_sub_blocks_drain_after_terminator() {
        let data = [1, 0xAA, 0, 0x3B];
        let mut src = SubBlocks::new(&data, 0);
        assert_eq!(src.next_byte(), Some(0xAA));
        assert_eq!(src.next_byte(), None);
        // Terminator already consumed, the trailer must not be skipped
        assert_eq!(src.drain(), 3);
    }

    #[test]
    fn test_sub_blocks_truncated() {
        let data = [5, 0xAA];
        let mut src = SubBlocks::new(&data, 0);
        assert_eq!(src.next_byte(), Some(0xAA));
        assert_eq!(src.next_byte(), None);
        assert_eq!(src.drain(), 2);
    }
}
