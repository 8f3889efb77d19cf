//! Time abstractions
//!
//! Playback is paced by two collaborators: a monotonic millisecond clock with
//! async sleeps, and a periodic tick that raises a "frame ready" flag.

use core::future::Future;

/// Monotonic millisecond clock
pub trait Timebase {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u64;

    /// Sleep for at least `ms` milliseconds
    fn sleep_ms(&mut self, ms: u32) -> impl Future<Output = ()>;
}

/// Periodic pacing tick
///
/// While armed, the tick sets a ready flag once per period. The flag is not
/// a counter: ticks that arrive while it is already set are coalesced.
pub trait FrameTicker {
    /// Start (or restart) periodic ticks every `period_ms`
    fn arm(&mut self, period_ms: u32);

    /// Stop ticking and clear any pending ready flag
    fn disarm(&mut self);

    /// Consume the ready flag, returning whether it was set
    fn take_ready(&mut self) -> bool;
}
