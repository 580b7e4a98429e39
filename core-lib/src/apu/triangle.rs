//! Triangle channel ($4008-$400B)

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::length::LengthCounter;
use super::registers::{LinearControl, TimerHigh};
use super::sweep::MAX_TIMER_PERIOD;

/// 32-step ramp: 15 down to 0, then 0 back up to 15
pub const TRIANGLE_SEQUENCE: [u8; 32] = [
    15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0, //
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15,
];

/// Triangle wave channel: no volume control, gated by linear and length counters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    pub enabled: bool,
    /// Last value written to $4008
    pub control: LinearControl,
    pub length: LengthCounter,
    pub linear_counter: u8,
    /// Set by $400B writes; held while the control flag is set
    pub linear_reload: bool,
    pub timer_period: u16,
    /// Counts down once per CPU cycle
    pub timer_counter: u16,
    /// Index into [`TRIANGLE_SEQUENCE`] (0..32)
    pub sequence_position: u8,
}

impl Triangle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a register by offset (0=$4008, 2=$400A, 3=$400B; 1 is unused)
    pub fn write_reg(&mut self, offset: u8, value: u8) {
        match offset {
            0 => {
                let control = LinearControl(value);
                self.control = control;
                self.length.halt = control.control();
            }
            2 => self.timer_period = (self.timer_period & 0x0700) | u16::from(value),
            3 => {
                let high = TimerHigh(value);
                self.timer_period =
                    (self.timer_period & 0x00FF) | (u16::from(high.period_high()) << 8);
                self.length.load(high.length_index());
                self.linear_reload = true;
                self.sequence_position = 0;
            }
            _ => {}
        }
        debug_assert!(self.timer_period <= MAX_TIMER_PERIOD);
    }

    /// Enable or disable through $4015; disabling zeroes the length counter
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.length.clear();
        }
    }

    /// Advance the timer by one CPU cycle
    pub fn clock_timer(&mut self) {
        if self.timer_counter == 0 {
            self.timer_counter = self.timer_period;
            if self.length.is_active() && self.linear_counter > 0 {
                self.sequence_position = (self.sequence_position + 1) & 0x1F;
            }
        } else {
            self.timer_counter -= 1;
        }
        debug_assert!((self.sequence_position as usize) < TRIANGLE_SEQUENCE.len());
    }

    /// Quarter-frame clock of the linear counter
    pub fn clock_linear(&mut self) {
        if self.linear_reload {
            self.linear_counter = self.control.reload_value();
        } else if self.linear_counter > 0 {
            self.linear_counter -= 1;
        }
        if !self.control.control() {
            self.linear_reload = false;
        }
    }

    /// Half-frame clock
    pub fn clock_length(&mut self) {
        self.length.clock();
    }

    pub fn is_audible(&self) -> bool {
        self.enabled && self.length.is_active()
    }

    /// Current output level (0-15); stalls on its last step when the linear counter runs out
    pub fn output(&self) -> u8 {
        if !self.is_audible() {
            return 0;
        }
        TRIANGLE_SEQUENCE[self.sequence_position as usize]
    }

    /// Tone frequency in Hz for a given CPU clock
    pub fn frequency(&self, cpu_clock: u32) -> f64 {
        f64::from(cpu_clock) / (32.0 * (f64::from(self.timer_period) + 1.0))
    }
}
