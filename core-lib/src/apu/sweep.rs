//! Sweep logic for the square channels (modularised)

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::registers::SweepControl;
use super::square::SquareId;

/// Largest period the 11-bit timer can hold
pub const MAX_TIMER_PERIOD: u16 = 0x7FF;

/// Periods below this produce ultrasonic output and are muted
pub const MIN_TIMER_PERIOD: u16 = 8;

/// Frequency sweep unit, clocked on half-frames
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sweep {
    /// Sweep enabled flag
    pub enabled: bool,
    /// Divider period (the divider counts `period + 1` half-frames)
    pub period: u8,
    /// Sweep negate flag (true = period decreases, pitch rises)
    pub negate: bool,
    /// Shift applied to the current period to form the change amount
    pub shift: u8,
    /// Square 1 negates with one's complement, square 2 with two's complement
    ones_complement: bool,
    divider: u8,
    reload: bool,
}

impl Sweep {
    pub const fn new(channel: SquareId) -> Self {
        Self {
            enabled: false,
            period: 0,
            negate: false,
            shift: 0,
            ones_complement: matches!(channel, SquareId::One),
            divider: 0,
            reload: false,
        }
    }

    /// Latch a $4001/$4005 write and schedule a divider reload
    pub fn write_reg(&mut self, control: SweepControl) {
        self.enabled = control.enabled();
        self.period = control.period();
        self.negate = control.negate();
        self.shift = control.shift();
        self.reload = true;
    }

    /// Period the sweep would move to from `current`
    ///
    /// Computed continuously (the hardware adder always runs), so a negative or
    /// 11-bit-overflowing target mutes the channel even with the unit disabled.
    pub fn target_period(self, current: u16) -> i32 {
        let current = i32::from(current);
        let change = current >> self.shift;
        if self.negate {
            current - change - i32::from(self.ones_complement)
        } else {
            current + change
        }
    }

    /// Whether the channel must be silenced at `current`
    pub fn is_muting(self, current: u16) -> bool {
        let target = self.target_period(current);
        current < MIN_TIMER_PERIOD || target < 0 || target > i32::from(MAX_TIMER_PERIOD)
    }

    /// Half-frame clock; may rewrite `timer_period`
    pub fn clock(&mut self, timer_period: &mut u16) {
        if self.divider == 0 && self.enabled && self.shift > 0 && !self.is_muting(*timer_period) {
            // is_muting rules out negative and overflowing targets
            *timer_period = self.target_period(*timer_period) as u16;
        }
        if self.divider == 0 || self.reload {
            self.divider = self.period;
            self.reload = false;
        } else {
            self.divider -= 1;
        }
    }
}
