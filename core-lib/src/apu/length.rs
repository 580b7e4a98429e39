//! Length counter shared by every channel

use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reload values indexed by bits 7-3 of $4003/$4007/$400B
pub const LENGTH_TABLE: [u8; 32] = [
    10, 254, 20, 2, 40, 4, 80, 6, 160, 8, 60, 10, 14, 12, 26, 14, //
    12, 16, 24, 18, 48, 20, 96, 22, 192, 24, 72, 26, 16, 28, 32, 30,
];

/// Auto-mute timer, clocked on half-frames
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LengthCounter {
    /// Remaining half-frames before the channel goes silent
    pub counter: u8,
    /// Freezes the counter while set
    pub halt: bool,
}

impl LengthCounter {
    /// Reload from the 32-entry table
    pub fn load(&mut self, index: u8) {
        self.counter = LENGTH_TABLE[(index & 0x1F) as usize];
    }

    /// Force the counter to zero (channel disabled through $4015)
    pub fn clear(&mut self) {
        self.counter = 0;
    }

    /// Half-frame clock. Returns `true` when this clock made the counter expire.
    pub fn clock(&mut self) -> bool {
        if self.halt || self.counter == 0 {
            return false;
        }
        self.counter -= 1;
        if self.counter == 0 {
            trace!("length counter expired");
            return true;
        }
        false
    }

    pub const fn is_active(self) -> bool {
        self.counter > 0
    }
}
