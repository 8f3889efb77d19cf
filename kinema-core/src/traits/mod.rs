//! Hardware abstraction traits
//!
//! Board-independent collaborators (pins, storage, time) live in
//! `kinema-hal`; the display trait lives here because it speaks in
//! [`PackedColor`](crate::color::PackedColor).

pub mod display;

pub use display::{check_surface, DisplayError, FrameDisplay};
