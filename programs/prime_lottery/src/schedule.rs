use anchor_lang::prelude::*;

use crate::constants::WINDOW_PERIOD;
use crate::error::LotteryError;

/// Weekly drawing window: opens at `anchor + k * WINDOW_PERIOD` and stays
/// open for `duration` seconds.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct DrawingWindow {
    pub anchor: i64,
    pub duration: i64,
}

impl DrawingWindow {
    pub fn new(anchor: i64, duration: i64) -> Result<Self> {
        require!(
            duration > 0 && duration < WINDOW_PERIOD,
            LotteryError::InvalidConfig
        );
        Ok(Self { anchor, duration })
    }

    /// Start of the most recent window opening at or before `now`.
    pub fn window_start(&self, now: i64) -> i64 {
        self.anchor + (now - self.anchor).div_euclid(WINDOW_PERIOD) * WINDOW_PERIOD
    }

    pub fn is_open(&self, now: i64) -> bool {
        now - self.window_start(now) < self.duration
    }

    /// True once the window that opened at `start` is over.
    pub fn has_elapsed(&self, start: i64, now: i64) -> bool {
        now >= start + self.duration
    }

    /// The current window's start while it is open, otherwise the next one.
    pub fn next_open(&self, now: i64) -> i64 {
        let start = self.window_start(now);
        if self.is_open(now) {
            start
        } else {
            start + WINDOW_PERIOD
        }
    }
}

/// Returned by the `get_drawing_schedule` view.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawingSchedule {
    pub can_draw: bool,
    /// Start of the open window, or of the next one.
    pub next_window: i64,
    pub window_duration: i64,
}
