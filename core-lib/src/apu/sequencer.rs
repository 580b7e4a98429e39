//! Frame sequencer (timing for envelopes, linear counter, length and sweep)
//!
//! Steps fall at fixed CPU-cycle offsets from the last reset. Every step is a
//! quarter-frame; every other step is also a half-frame. See:
//! [`https://www.nesdev.org/wiki/APU_Frame_Counter`]

use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::registers::FrameCounterControl;
use crate::config::Region;

/// Sequencer mode selected by bit 7 of $4017
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrameMode {
    #[default]
    FourStep,
    FiveStep,
}

/// Units clocked by a sequencer step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameEvent {
    /// Envelopes and the triangle linear counter
    pub quarter: bool,
    /// Length counters and sweep units
    pub half: bool,
}

impl FrameEvent {
    pub const NONE: Self = Self {
        quarter: false,
        half: false,
    };
    pub const QUARTER: Self = Self {
        quarter: true,
        half: false,
    };
    pub const HALF: Self = Self {
        quarter: true,
        half: true,
    };
}

/// One entry of a step table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameStep {
    /// CPU cycles since the last reset
    pub cycle: u32,
    pub event: FrameEvent,
}

const fn step(cycle: u32, event: FrameEvent) -> FrameStep {
    FrameStep { cycle, event }
}

/// Step table plus the cycle at which the sequence wraps to 0
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTiming {
    pub steps: &'static [FrameStep],
    pub period: u32,
}

const NTSC_FOUR_STEP: FrameTiming = FrameTiming {
    steps: &[
        step(7457, FrameEvent::QUARTER),
        step(14913, FrameEvent::HALF),
        step(22371, FrameEvent::QUARTER),
        step(29829, FrameEvent::HALF),
    ],
    period: 29830,
};

const NTSC_FIVE_STEP: FrameTiming = FrameTiming {
    steps: &[
        step(7457, FrameEvent::QUARTER),
        step(14913, FrameEvent::HALF),
        step(22371, FrameEvent::QUARTER),
        step(29829, FrameEvent::NONE),
        step(37281, FrameEvent::HALF),
    ],
    period: 37282,
};

const PAL_FOUR_STEP: FrameTiming = FrameTiming {
    steps: &[
        step(8313, FrameEvent::QUARTER),
        step(16627, FrameEvent::HALF),
        step(24939, FrameEvent::QUARTER),
        step(33253, FrameEvent::HALF),
    ],
    period: 33254,
};

const PAL_FIVE_STEP: FrameTiming = FrameTiming {
    steps: &[
        step(8313, FrameEvent::QUARTER),
        step(16627, FrameEvent::HALF),
        step(24939, FrameEvent::QUARTER),
        step(33253, FrameEvent::NONE),
        step(41565, FrameEvent::HALF),
    ],
    period: 41566,
};

impl FrameTiming {
    pub const fn for_mode(region: Region, mode: FrameMode) -> Self {
        match (region, mode) {
            (Region::Ntsc, FrameMode::FourStep) => NTSC_FOUR_STEP,
            (Region::Ntsc, FrameMode::FiveStep) => NTSC_FIVE_STEP,
            (Region::Pal, FrameMode::FourStep) => PAL_FOUR_STEP,
            (Region::Pal, FrameMode::FiveStep) => PAL_FIVE_STEP,
        }
    }
}

/// Frame sequencer state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameSequencer {
    pub region: Region,
    pub mode: FrameMode,
    /// Index of the next step to fire
    pub step_index: usize,
    /// CPU cycles since the last reset
    pub cycle_counter: u32,
    /// Retained from $4017 bit 6; no interrupt line is modelled
    pub irq_inhibit: bool,
}

impl FrameSequencer {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            ..Self::default()
        }
    }

    pub const fn timing(&self) -> FrameTiming {
        FrameTiming::for_mode(self.region, self.mode)
    }

    /// Advance by exactly one CPU cycle, returning the step that fired, if any
    pub fn tick(&mut self) -> Option<FrameEvent> {
        let timing = self.timing();
        self.cycle_counter += 1;

        let mut fired = None;
        if let Some(next) = timing.steps.get(self.step_index) {
            if self.cycle_counter == next.cycle {
                trace!(
                    step = self.step_index,
                    cycle = self.cycle_counter,
                    quarter = next.event.quarter,
                    half = next.event.half,
                    "frame sequencer step"
                );
                self.step_index += 1;
                fired = Some(next.event);
            }
        }
        if self.cycle_counter >= timing.period {
            self.cycle_counter = 0;
            self.step_index = 0;
        }
        debug_assert!(self.step_index <= timing.steps.len());
        fired
    }

    /// Handle a $4017 write: select the mode and restart the sequence
    ///
    /// In 5-step mode the write itself clocks every quarter- and half-frame
    /// unit once; the returned event carries that immediate clock.
    pub fn write_control(&mut self, control: FrameCounterControl) -> Option<FrameEvent> {
        self.mode = if control.five_step() {
            FrameMode::FiveStep
        } else {
            FrameMode::FourStep
        };
        self.irq_inhibit = control.irq_inhibit();
        self.cycle_counter = 0;
        self.step_index = 0;
        match self.mode {
            FrameMode::FiveStep => Some(FrameEvent::HALF),
            FrameMode::FourStep => None,
        }
    }
}
