//! Register bit layouts for the memory-mapped APU ports (manual bitfields)
//!
//! Each write-only port is wrapped in a newtype over the raw byte so decode
//! sites read as named fields instead of shifts and masks.

use crate::helpers::{get_bit, get_bits, set_bit, set_bits};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// $4000 / $4004 - Square duty, length halt, envelope
/// | 7 | 6 | 5 | 4 | 3 | 2 | 1 | 0 |
/// | D | D | L | C | V | V | V | V |
/// Bits 7-6: Duty, 5: Length counter halt / envelope loop, 4: Constant volume, 3-0: Volume / envelope period
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PulseControl(pub u8);

impl PulseControl {
    pub const fn volume(self) -> u8 {
        get_bits(self.0, 0x0F, 0)
    }
    pub fn set_volume(&mut self, val: u8) {
        self.0 = set_bits(self.0, 0x0F, 0, val);
    }
    pub const fn constant_volume(self) -> bool {
        get_bit(self.0, 4)
    }
    pub fn set_constant_volume(&mut self, val: bool) {
        self.0 = set_bit(self.0, 4, val);
    }
    pub const fn length_halt(self) -> bool {
        get_bit(self.0, 5)
    }
    pub fn set_length_halt(&mut self, val: bool) {
        self.0 = set_bit(self.0, 5, val);
    }
    pub const fn duty(self) -> u8 {
        get_bits(self.0, 0x03, 6)
    }
    pub fn set_duty(&mut self, val: u8) {
        self.0 = set_bits(self.0, 0x03, 6, val);
    }
}

/// $4001 / $4005 - Square sweep unit
/// | 7 | 6 | 5 | 4 | 3 | 2 | 1 | 0 |
/// | E | P | P | P | N | S | S | S |
/// Bit 7: Enable, 6-4: Divider period, 3: Negate, 2-0: Shift count
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SweepControl(pub u8);

impl SweepControl {
    pub const fn enabled(self) -> bool {
        get_bit(self.0, 7)
    }
    pub fn set_enabled(&mut self, val: bool) {
        self.0 = set_bit(self.0, 7, val);
    }
    pub const fn period(self) -> u8 {
        get_bits(self.0, 0x07, 4)
    }
    pub fn set_period(&mut self, val: u8) {
        self.0 = set_bits(self.0, 0x07, 4, val);
    }
    pub const fn negate(self) -> bool {
        get_bit(self.0, 3)
    }
    pub fn set_negate(&mut self, val: bool) {
        self.0 = set_bit(self.0, 3, val);
    }
    pub const fn shift(self) -> u8 {
        get_bits(self.0, 0x07, 0)
    }
    pub fn set_shift(&mut self, val: u8) {
        self.0 = set_bits(self.0, 0x07, 0, val);
    }
}

/// $4003 / $4007 / $400B - Timer high bits and length counter load
/// | 7 | 6 | 5 | 4 | 3 | 2 | 1 | 0 |
/// | L | L | L | L | L | T | T | T |
/// Bits 7-3: Length table index, 2-0: Timer period bits 10-8
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimerHigh(pub u8);

impl TimerHigh {
    pub const fn period_high(self) -> u8 {
        get_bits(self.0, 0x07, 0)
    }
    pub fn set_period_high(&mut self, val: u8) {
        self.0 = set_bits(self.0, 0x07, 0, val);
    }
    pub const fn length_index(self) -> u8 {
        get_bits(self.0, 0x1F, 3)
    }
    pub fn set_length_index(&mut self, val: u8) {
        self.0 = set_bits(self.0, 0x1F, 3, val);
    }
}

/// $4008 - Triangle linear counter
/// | 7 | 6 | 5 | 4 | 3 | 2 | 1 | 0 |
/// | C | R | R | R | R | R | R | R |
/// Bit 7: Control (length halt, holds linear reload), 6-0: Linear counter reload value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearControl(pub u8);

impl LinearControl {
    pub const fn reload_value(self) -> u8 {
        get_bits(self.0, 0x7F, 0)
    }
    pub fn set_reload_value(&mut self, val: u8) {
        self.0 = set_bits(self.0, 0x7F, 0, val);
    }
    pub const fn control(self) -> bool {
        get_bit(self.0, 7)
    }
    pub fn set_control(&mut self, val: bool) {
        self.0 = set_bit(self.0, 7, val);
    }
}

/// $4017 - Frame counter
/// | 7 | 6 | 5 | 4 | 3 | 2 | 1 | 0 |
/// | M | I | - | - | - | - | - | - |
/// Bit 7: Sequencer mode (0 = 4-step, 1 = 5-step), 6: Frame interrupt inhibit
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameCounterControl(pub u8);

impl FrameCounterControl {
    pub const fn five_step(self) -> bool {
        get_bit(self.0, 7)
    }
    pub fn set_five_step(&mut self, val: bool) {
        self.0 = set_bit(self.0, 7, val);
    }
    pub const fn irq_inhibit(self) -> bool {
        get_bit(self.0, 6)
    }
    pub fn set_irq_inhibit(&mut self, val: bool) {
        self.0 = set_bit(self.0, 6, val);
    }
}
