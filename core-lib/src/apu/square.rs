//! Square (pulse) channels 1 and 2
//!
//! Both channels share one implementation, tagged with a [`SquareId`]. The only
//! behavioural difference between them is how the sweep unit negates.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::envelope::Envelope;
use super::length::LengthCounter;
use super::registers::{PulseControl, SweepControl, TimerHigh};
use super::sweep::{Sweep, MAX_TIMER_PERIOD};
use super::wave_duty::WaveDuty;

/// Which of the two square channels this is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SquareId {
    /// $4000-$4003
    One,
    /// $4004-$4007
    Two,
}

/// Square wave channel with envelope, sweep and length counter
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square {
    pub id: SquareId,
    /// Gated by $4015, independent of the length counter
    pub enabled: bool,
    /// Last value written to the control port
    pub control: PulseControl,
    pub duty: WaveDuty,
    pub envelope: Envelope,
    pub sweep: Sweep,
    pub length: LengthCounter,
    /// 11-bit reload value for the timer
    pub timer_period: u16,
    /// Counts down once per APU cycle (every other CPU cycle)
    pub timer_counter: u16,
    /// Index into the duty pattern (0..8)
    pub sequence_position: u8,
}

impl Square {
    pub const fn new(id: SquareId) -> Self {
        Self {
            id,
            enabled: false,
            control: PulseControl(0),
            duty: WaveDuty::Duty12_5,
            envelope: Envelope::new(),
            sweep: Sweep::new(id),
            length: LengthCounter { counter: 0, halt: false },
            timer_period: 0,
            timer_counter: 0,
            sequence_position: 0,
        }
    }

    /// Write a register by offset (0=control, 1=sweep, 2=timer low, 3=timer high/length)
    pub fn write_reg(&mut self, offset: u8, value: u8) {
        match offset {
            0 => {
                let control = PulseControl(value);
                self.control = control;
                self.duty = WaveDuty::from_bits(control.duty());
                self.length.halt = control.length_halt();
                self.envelope.write_control(control);
            }
            1 => self.sweep.write_reg(SweepControl(value)),
            2 => self.timer_period = (self.timer_period & 0x0700) | u16::from(value),
            3 => {
                let high = TimerHigh(value);
                self.timer_period =
                    (self.timer_period & 0x00FF) | (u16::from(high.period_high()) << 8);
                self.length.load(high.length_index());
                // A period-high write also restarts the phase and the envelope
                self.sequence_position = 0;
                self.envelope.restart();
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

    /// Advance the timer by one APU cycle
    pub fn clock_timer(&mut self) {
        if self.timer_counter == 0 {
            self.timer_counter = self.timer_period;
            self.sequence_position = (self.sequence_position + 1) & 0x07;
        } else {
            self.timer_counter -= 1;
        }
        debug_assert!(self.sequence_position < 8);
    }

    /// Quarter-frame clock
    pub fn clock_envelope(&mut self) {
        self.envelope.clock();
    }

    /// Half-frame clock: length counter then sweep
    pub fn clock_half_frame(&mut self) {
        self.length.clock();
        self.sweep.clock(&mut self.timer_period);
    }

    /// Muted by the sweep unit or an ultrasonic period, regardless of duty/volume
    pub fn is_muted(&self) -> bool {
        self.sweep.is_muting(self.timer_period)
    }

    /// Whether the channel is contributing sound at all
    pub fn is_audible(&self) -> bool {
        self.enabled && self.length.is_active() && !self.is_muted()
    }

    /// Current output level (0-15)
    pub fn output(&self) -> u8 {
        if !self.is_audible() {
            return 0;
        }
        self.duty.level(self.sequence_position) * self.envelope.output()
    }

    /// Tone frequency in Hz for a given CPU clock
    pub fn frequency(&self, cpu_clock: u32) -> f64 {
        f64::from(cpu_clock) / (16.0 * (f64::from(self.timer_period) + 1.0))
    }
}
