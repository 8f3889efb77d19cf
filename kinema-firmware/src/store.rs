//! Animation files embedded at build time
//!
//! `build.rs` walks `animations/` and generates a sorted table of every file
//! in it, which is served read-only as the storage root.

use kinema_core::library::StaticStore;

include!(concat!(env!("OUT_DIR"), "/animations.rs"));

/// Store over the embedded files
pub fn animations() -> StaticStore<'static> {
    StaticStore::new(ANIMATIONS)
}
