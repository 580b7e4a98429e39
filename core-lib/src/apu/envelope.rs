//! Envelope unit for the square channels

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::registers::PulseControl;

/// Volume source for a square channel
///
/// With `constant_volume` set the channel plays `volume` as-is; otherwise a
/// divider with period `volume + 1` steps a decay level down from 15.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Envelope {
    /// Constant volume, or divider period when decaying (bits 3-0)
    pub volume: u8,
    /// Bypass the decay counter (bit 4)
    pub constant_volume: bool,
    /// Restart decay at 15 after reaching 0 (bit 5, shared with length halt)
    pub looping: bool,
    start: bool,
    divider: u8,
    decay: u8,
}

impl Envelope {
    pub const fn new() -> Self {
        Self {
            volume: 0,
            constant_volume: false,
            looping: false,
            start: false,
            divider: 0,
            decay: 0,
        }
    }

    /// Latch the envelope fields of a control write
    pub fn write_control(&mut self, control: PulseControl) {
        self.volume = control.volume();
        self.constant_volume = control.constant_volume();
        self.looping = control.length_halt();
    }

    /// Request a restart on the next quarter-frame
    pub fn restart(&mut self) {
        self.start = true;
    }

    /// Quarter-frame clock
    pub fn clock(&mut self) {
        if self.start {
            self.start = false;
            self.decay = 15;
            self.divider = self.volume;
            return;
        }
        if self.divider > 0 {
            self.divider -= 1;
            return;
        }
        self.divider = self.volume;
        if self.decay > 0 {
            self.decay -= 1;
        } else if self.looping {
            self.decay = 15;
        }
    }

    /// Current decay level (0-15)
    pub const fn decay(self) -> u8 {
        self.decay
    }

    /// Volume the channel plays at
    pub const fn output(self) -> u8 {
        if self.constant_volume {
            self.volume
        } else {
            self.decay
        }
    }
}
