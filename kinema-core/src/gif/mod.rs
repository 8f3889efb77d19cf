//! Streaming GIF decoder
//!
//! Decodes GIF87a/GIF89a images whose logical screen matches the output
//! surface. Pixels are converted to packed colors and written straight into
//! the destination buffer; no indexed frame is ever materialized.

pub mod decoder;
pub mod lzw;

pub use decoder::{GifDecoder, GifError, GifFrame, DEFAULT_DELAY_MS};
pub use lzw::LzwDecoder;

/// File suffix of GIF animations
pub const GIF_SUFFIX: &str = ".gif";
