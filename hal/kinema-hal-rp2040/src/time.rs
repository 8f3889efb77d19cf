//! Millisecond clock on the embassy time driver

use embassy_time::{Instant, Timer};
use kinema_hal::Timebase;

/// [`Timebase`] backed by the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyTimebase;

impl Timebase for EmbassyTimebase {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }

    async fn sleep_ms(&mut self, ms: u32) {
        Timer::after_millis(u64::from(ms)).await;
    }
}
