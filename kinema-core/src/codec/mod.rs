//! Delta-RLE frame codec
//!
//! A frame is stored as a sequence of records relative to the frame before
//! it:
//!
//! ```text
//! ┌──────────┬───────────┬──────────────────────────────┐
//! │ skip: u8 │ write: u8 │ write × 2 bytes packed color │
//! └──────────┴───────────┴──────────────────────────────┘
//! ```
//!
//! `skip` pixels are left untouched, then `write` pixels are replaced with
//! the payload. There is no header, length prefix, or checksum. Runs are
//! capped at 255 and never merged across the cap, so the on-disk format is
//! exactly what the greedy encoder produces. A `(0, 0)` record ends the
//! stream.

pub mod decode;
pub mod encode;

pub use decode::{decode_into, Placement};
pub use encode::{encode_delta, encode_full, max_encoded_len, EncodeError};

/// Longest run a single record can describe
pub const MAX_RUN: usize = 255;

/// File suffix of encoded frames
pub const FRAME_SUFFIX: &str = ".drle";
