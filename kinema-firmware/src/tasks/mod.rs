//! Embassy tasks

mod player;
mod tick;

pub use player::{player_task, FirmwarePlayer};
pub use tick::{tick_task, PaceTicker};
