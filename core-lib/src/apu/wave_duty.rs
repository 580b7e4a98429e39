//! Wave duty logic for the square channels (modularised)

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Eight-step output sequences, indexed by [`WaveDuty`] then sequence position
pub const DUTY_TABLE: [[u8; 8]; 4] = [
    [0, 1, 0, 0, 0, 0, 0, 0], // 12.5%
    [0, 1, 1, 0, 0, 0, 0, 0], // 25%
    [0, 1, 1, 1, 1, 0, 0, 0], // 50%
    [1, 0, 0, 1, 1, 1, 1, 1], // 75% (25% negated)
];

/// Wave duty patterns for square wave channels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WaveDuty {
    /// 12.5% duty cycle (01000000)
    #[default]
    Duty12_5,
    /// 25% duty cycle (01100000)
    Duty25,
    /// 50% duty cycle (01111000)
    Duty50,
    /// 75% duty cycle (10011111)
    Duty75,
}

impl WaveDuty {
    /// Decode the two duty bits of $4000/$4004
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Duty12_5,
            1 => Self::Duty25,
            2 => Self::Duty50,
            _ => Self::Duty75,
        }
    }

    /// Returns the 8-step pattern for the duty cycle
    pub const fn pattern(self) -> &'static [u8; 8] {
        &DUTY_TABLE[self as usize]
    }

    /// Output bit (0 or 1) at a sequence position
    pub const fn level(self, position: u8) -> u8 {
        self.pattern()[(position & 0x07) as usize]
    }
}
