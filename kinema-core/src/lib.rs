//! Board-agnostic frame codec and playback logic
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - RGB565 pixel packing
//! - Delta-RLE frame codec with integer upscaling
//! - Streaming GIF decoder (LZW) writing straight into the pixel buffer
//! - Paced playback scheduler with adaptive interval correction
//! - Two-button folder selection with debounce
//! - Animation library listing and settings parsing

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod codec;
pub mod color;
pub mod config;
pub mod gif;
pub mod library;
pub mod scheduler;
pub mod state;
pub mod traits;
