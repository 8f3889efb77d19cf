//! Kinema Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the playback engine
//! is written against. Chip-specific crates implement them, which keeps the
//! codec and scheduler testable on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (kinema-firmware)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  kinema-core (codec, scheduler)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  kinema-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  kinema-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::InputPin`] - Digital input (buttons)
//! - [`storage::FileStore`] - Read-only animation storage
//! - [`time::Timebase`] - Monotonic clock and sleeps
//! - [`time::FrameTicker`] - Periodic pacing tick

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod storage;
pub mod time;

// Re-export key traits at crate root for convenience
pub use gpio::InputPin;
pub use storage::{EntryKind, FileStore, StoreError};
pub use time::{FrameTicker, Timebase};
