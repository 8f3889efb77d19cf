//! Delta-RLE decoder
//!
//! Replays an encoded frame straight into the display's pixel buffer. Each
//! changed source pixel is blitted as a `scale_x × scale_y` block, so a
//! small frame can fill a larger surface without an intermediate buffer.
//! Truncated streams decode as far as the data goes.

use crate::color::{PackedColor, BYTES_PER_PIXEL};

/// Where and how a frame lands on the destination surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Placement {
    /// Source frame width in pixels
    pub frame_width: u16,
    /// Source frame height in pixels
    pub frame_height: u16,
    /// Destination column of the frame's top-left pixel
    pub offset_x: u16,
    /// Destination row of the frame's top-left pixel
    pub offset_y: u16,
    /// Destination width in pixels (row stride)
    pub stride: u16,
    /// Destination height in pixels, writes below it are clipped
    pub surface_height: u16,
    /// Horizontal upscale factor
    pub scale_x: u16,
    /// Vertical upscale factor
    pub scale_y: u16,
    /// Rows left below the scaled frame; when nonzero the last row is
    /// written once more just below it
    pub extra_rows: u16,
}

impl Placement {
    /// Direct copy: scale 1, offset 0, frame fills the surface
    pub const fn identity(width: u16, height: u16) -> Self {
        Self {
            frame_width: width,
            frame_height: height,
            offset_x: 0,
            offset_y: 0,
            stride: width,
            surface_height: height,
            scale_x: 1,
            scale_y: 1,
            extra_rows: 0,
        }
    }

    /// Fit a frame onto a surface by integer upscaling
    ///
    /// Scale factors truncate, so a non-multiple surface leaves a margin on
    /// the right and at the bottom. The last scaled row is repeated once into
    /// the bottom margin and the rest of it is left as is.
    pub fn fit(frame_width: u16, frame_height: u16, surface_width: u16, surface_height: u16) -> Self {
        let scale_x = (surface_width / frame_width.max(1)).max(1);
        let scale_y = (surface_height / frame_height.max(1)).max(1);
        let covered = frame_height.saturating_mul(scale_y);
        Self {
            frame_width,
            frame_height,
            offset_x: 0,
            offset_y: 0,
            stride: surface_width,
            surface_height,
            scale_x,
            scale_y,
            extra_rows: surface_height.saturating_sub(covered),
        }
    }

    /// Number of source pixels in one frame
    pub const fn frame_pixels(&self) -> usize {
        self.frame_width as usize * self.frame_height as usize
    }

    /// Write `color` for source pixel `pos` into `dst`
    fn blit(&self, dst: &mut [u8], pos: usize, color: PackedColor) {
        let width = self.frame_width as usize;
        let x = pos % width;
        let y = pos / width;
        let dx = self.offset_x as usize + x * self.scale_x as usize;
        let dy = self.offset_y as usize + y * self.scale_y as usize;

        let mut rows = self.scale_y as usize;
        if self.extra_rows > 0 && y + 1 == self.frame_height as usize {
            rows += 1;
        }

        let stride = self.stride as usize;
        if dx >= stride {
            return;
        }
        let cols = (self.scale_x as usize).min(stride - dx);
        let last_row = (dy + rows).min(self.surface_height as usize);
        let bytes = color.to_be_bytes();

        for row in dy..last_row {
            let start = (row * stride + dx) * BYTES_PER_PIXEL;
            let Some(span) = dst.get_mut(start..start + cols * BYTES_PER_PIXEL) else {
                return;
            };
            for px in span.chunks_exact_mut(BYTES_PER_PIXEL) {
                px.copy_from_slice(&bytes);
            }
        }
    }
}

/// Decode one Delta-RLE frame into `dst`
///
/// `dst` must already hold the previous frame; skipped pixels are left as
/// they are. Returns the source pixel cursor where decoding stopped, which
/// equals `frame_pixels()` for a complete frame.
///
/// Decoding stops without error when the cursor reaches the end of the
/// frame, when the data ends mid-record, or at a `(0, 0)` record.
pub fn decode_into(data: &[u8], dst: &mut [u8], placement: &Placement) -> usize {
    let total = placement.frame_pixels();
    let mut pos = 0;
    let mut i = 0;

    while let Some(&[skip, write]) = data.get(i..i + 2) {
        i += 2;
        if skip == 0 && write == 0 {
            break;
        }

        pos += skip as usize;
        if pos >= total {
            break;
        }

        for _ in 0..write {
            if pos >= total {
                return pos;
            }
            let Some(&[hi, lo]) = data.get(i..i + 2) else {
                return pos;
            };
            placement.blit(dst, pos, PackedColor::from_be_bytes([hi, lo]));
            i += 2;
            pos += 1;
        }
    }

    pos
}
