//! Delta-RLE encoder
//!
//! Runs on the host when converting animations. Single greedy pass in raster
//! order, linear time, no backtracking.

use core::fmt;

use super::MAX_RUN;
use crate::color::BYTES_PER_PIXEL;

/// Errors from frame encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Frames differ in length or are not a whole number of pixels
    LengthMismatch,
    /// Output buffer cannot hold the encoded frame
    BufferTooSmall,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::LengthMismatch => f.write_str("frame buffers differ in pixel count"),
            EncodeError::BufferTooSmall => f.write_str("output buffer too small for encoded frame"),
        }
    }
}

impl core::error::Error for EncodeError {}

/// Upper bound on the encoded size of a frame of `pixels` pixels
///
/// Every record covers at least one pixel and costs at most two header
/// bytes plus two bytes per covered pixel.
pub const fn max_encoded_len(pixels: usize) -> usize {
    pixels * 4
}

/// Appends records to a caller-owned output buffer
struct RecordWriter<'a> {
    out: &'a mut [u8],
    len: usize,
}

impl<'a> RecordWriter<'a> {
    fn new(out: &'a mut [u8]) -> Self {
        Self { out, len: 0 }
    }

    fn push(&mut self, skip: usize, payload: &[u8]) -> Result<(), EncodeError> {
        let end = self.len + 2 + payload.len();
        let dst = self
            .out
            .get_mut(self.len..end)
            .ok_or(EncodeError::BufferTooSmall)?;
        dst[0] = skip as u8;
        dst[1] = (payload.len() / BYTES_PER_PIXEL) as u8;
        dst[2..].copy_from_slice(payload);
        self.len = end;
        Ok(())
    }
}

/// Encode `cur` as changes against `prev`
///
/// Both buffers hold packed colors, two bytes per pixel. Returns the number
/// of bytes written to `out`. Encoding a frame against itself produces only
/// skip records.
pub fn encode_delta(prev: &[u8], cur: &[u8], out: &mut [u8]) -> Result<usize, EncodeError> {
    if prev.len() != cur.len() || cur.len() % BYTES_PER_PIXEL != 0 {
        return Err(EncodeError::LengthMismatch);
    }

    let n = cur.len() / BYTES_PER_PIXEL;
    let mut writer = RecordWriter::new(out);
    let mut pos = 0;

    let same = |i: usize| {
        let px = i * BYTES_PER_PIXEL..(i + 1) * BYTES_PER_PIXEL;
        prev[px.clone()] == cur[px]
    };

    while pos < n {
        let mut skip = 0;
        while pos < n && skip < MAX_RUN && same(pos) {
            skip += 1;
            pos += 1;
        }

        let start = pos;
        while pos < n && pos - start < MAX_RUN && !same(pos) {
            pos += 1;
        }

        if skip == 0 && pos == start {
            break;
        }
        writer.push(skip, &cur[start * BYTES_PER_PIXEL..pos * BYTES_PER_PIXEL])?;
    }

    Ok(writer.len)
}

/// Encode `cur` as a complete frame with no predecessor
///
/// Emits `(0, write)` records with `write` capped at 255 until every pixel is
/// covered. Used for the first frame of an animation.
pub fn encode_full(cur: &[u8], out: &mut [u8]) -> Result<usize, EncodeError> {
    if cur.len() % BYTES_PER_PIXEL != 0 {
        return Err(EncodeError::LengthMismatch);
    }

    let mut writer = RecordWriter::new(out);
    for chunk in cur.chunks(MAX_RUN * BYTES_PER_PIXEL) {
        writer.push(0, chunk)?;
    }
    Ok(writer.len)
}
