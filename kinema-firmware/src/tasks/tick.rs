//! Pacing tick task
//!
//! Runs a periodic ticker while armed and raises `FRAME_READY` on every
//! period. A new command replaces the current period immediately.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker};
use kinema_hal::FrameTicker;
use portable_atomic::Ordering;

use crate::channels::{TickCommand, FRAME_READY, TICK_COMMAND};

/// Pacing tick task
#[embassy_executor::task]
pub async fn tick_task() {
    info!("Tick task started");

    let mut period = None;
    loop {
        let Some(ms) = period else {
            period = TICK_COMMAND.wait().await.period_ms();
            continue;
        };

        debug!("tick armed: {} ms", ms);
        let mut ticker = Ticker::every(Duration::from_millis(u64::from(ms)));
        period = loop {
            match select(ticker.next(), TICK_COMMAND.wait()).await {
                Either::First(()) => FRAME_READY.store(true, Ordering::Release),
                Either::Second(cmd) => break cmd.period_ms(),
            }
        };
    }
}

/// Player-side handle on the tick task
pub struct PaceTicker;

impl FrameTicker for PaceTicker {
    fn arm(&mut self, period_ms: u32) {
        FRAME_READY.store(false, Ordering::Release);
        TICK_COMMAND.signal(TickCommand::Arm(period_ms.max(1)));
    }

    fn disarm(&mut self) {
        TICK_COMMAND.signal(TickCommand::Disarm);
        FRAME_READY.store(false, Ordering::Release);
    }

    fn take_ready(&mut self) -> bool {
        FRAME_READY.swap(false, Ordering::AcqRel)
    }
}
