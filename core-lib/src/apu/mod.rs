//! NES (RP2A03) Audio Processing Unit (APU)
//!
//! Implements both square channels and the triangle channel, the frame
//! sequencer, mixing, and the memory-mapped register interface at
//! $4000-$4017. Noise and DMC keep their $4015 enable bits but have no
//! generator behind them and are mixed as silence.
//!
//! The host drives the chip one CPU cycle at a time through [`Apu::tick`]
//! (or [`Apu::run`] for a batch) and feeds bus traffic through
//! [`Apu::write`] / [`Apu::read`].
//!
//! See: [`https://www.nesdev.org/wiki/APU`]

mod envelope;
mod error;
mod flags;
mod length;
mod mixer;
mod registers;
mod sequencer;
mod square;
mod sweep;
mod triangle;
mod wave_duty;

pub use envelope::*;
pub use error::*;
pub use flags::*;
pub use length::*;
pub use mixer::*;
pub use registers::*;
pub use sequencer::*;
pub use square::*;
pub use sweep::*;
pub use triangle::*;
pub use wave_duty::*;

use tracing::{debug, instrument};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::ApuConfig;

/// APU register addresses
pub const SQ1_VOL_ADDR: u16 = 0x4000;
pub const SQ1_SWEEP_ADDR: u16 = 0x4001;
pub const SQ1_LO_ADDR: u16 = 0x4002;
pub const SQ1_HI_ADDR: u16 = 0x4003;
pub const SQ2_VOL_ADDR: u16 = 0x4004;
pub const SQ2_SWEEP_ADDR: u16 = 0x4005;
pub const SQ2_LO_ADDR: u16 = 0x4006;
pub const SQ2_HI_ADDR: u16 = 0x4007;
pub const TRI_LINEAR_ADDR: u16 = 0x4008;
pub const TRI_LO_ADDR: u16 = 0x400A;
pub const TRI_HI_ADDR: u16 = 0x400B;
pub const SND_CHN_ADDR: u16 = 0x4015;
pub const FRAME_COUNTER_ADDR: u16 = 0x4017;
pub const APU_REG_START: u16 = 0x4000;
pub const APU_REG_END: u16 = 0x4017;

/// Top-level APU struct
///
/// Holds all channel state, the frame sequencer, and the output buffer. One
/// instance is one emulated chip; nothing is shared between instances.
#[derive(Clone, Debug)]
pub struct Apu {
    /// Square 1 ($4000-$4003)
    pub square1: Square,
    /// Square 2 ($4004-$4007)
    pub square2: Square,
    /// Triangle ($4008-$400B)
    pub triangle: Triangle,
    /// Frame sequencer state
    pub sequencer: FrameSequencer,
    /// Noise/DMC enable bits, stored but not backed by a generator
    deferred: ChannelFlags,
    sample_clock: SampleClock,
    pending_sample: Option<f32>,
    /// Samples collected by [`Apu::run`]
    pub output_buffer: Vec<f32>,
    cycles: u64,
    config: ApuConfig,
}

/// Observable chip state at one instant
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ApuSnapshot {
    pub cycles: u64,
    pub square1: Square,
    pub square2: Square,
    pub triangle: Triangle,
    pub sequencer: FrameSequencer,
    /// $4015 enable bits as last written
    pub enabled: u8,
    /// $4015 read-back
    pub status: u8,
}

impl Default for Apu {
    fn default() -> Self {
        Self::new()
    }
}

impl Apu {
    /// Power-on state with the default (NTSC, 44.1 kHz) configuration
    pub fn new() -> Self {
        Self::build(ApuConfig::default())
    }

    /// Power-on state for a host-supplied configuration
    #[instrument(level = "debug")]
    pub fn with_config(config: ApuConfig) -> Result<Self, ApuError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ApuConfig) -> Self {
        debug!(?config, "Initializing APU");
        Self {
            square1: Square::new(SquareId::One),
            square2: Square::new(SquareId::Two),
            triangle: Triangle::new(),
            sequencer: FrameSequencer::new(config.region),
            deferred: ChannelFlags::empty(),
            sample_clock: SampleClock::new(config.region.cpu_clock(), config.sample_rate),
            pending_sample: None,
            output_buffer: Vec::new(),
            cycles: 0,
            config,
        }
    }

    pub const fn config(&self) -> ApuConfig {
        self.config
    }

    /// CPU cycles elapsed since power-on
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Advance exactly one CPU cycle
    ///
    /// Channel timers run first, then the frame sequencer, then the sample
    /// clock. A sample that falls due is held for [`Apu::sample_ready`].
    pub fn tick(&mut self) {
        self.cycles += 1;

        self.triangle.clock_timer();
        // Square timers run on the APU clock, half the CPU rate
        if self.cycles % 2 == 0 {
            self.square1.clock_timer();
            self.square2.clock_timer();
        }

        if let Some(event) = self.sequencer.tick() {
            self.clock_frame(event);
        }

        if self.sample_clock.tick() {
            self.pending_sample = Some(self.sample());
        }
    }

    /// Take the sample produced by the last tick, if one fell due
    pub fn sample_ready(&mut self) -> Option<f32> {
        self.pending_sample.take()
    }

    /// Advance `cycles` CPU cycles one at a time, buffering every sample produced
    #[instrument(skip(self), level = "trace")]
    pub fn run(&mut self, cycles: u64) {
        for _ in 0..cycles {
            self.tick();
            if let Some(sample) = self.sample_ready() {
                self.output_buffer.push(sample);
            }
        }
    }

    /// Hand the buffered samples to the audio collaborator
    pub fn drain_samples(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.output_buffer)
    }

    /// Mix the current channel outputs into one amplitude
    pub fn sample(&self) -> f32 {
        mix(
            self.square1.output(),
            self.square2.output(),
            self.triangle.output(),
        )
    }

    fn clock_frame(&mut self, event: FrameEvent) {
        if event.quarter {
            self.square1.clock_envelope();
            self.square2.clock_envelope();
            self.triangle.clock_linear();
        }
        if event.half {
            self.square1.clock_half_frame();
            self.square2.clock_half_frame();
            self.triangle.clock_length();
        }
    }

    /// Length-counter status bits, as reported by a $4015 read
    pub const fn status(&self) -> ChannelFlags {
        let mut flags = ChannelFlags::empty();
        if self.square1.length.is_active() {
            flags = flags.union(ChannelFlags::SQUARE1);
        }
        if self.square2.length.is_active() {
            flags = flags.union(ChannelFlags::SQUARE2);
        }
        if self.triangle.length.is_active() {
            flags = flags.union(ChannelFlags::TRIANGLE);
        }
        flags
    }

    /// Enable bits as last written to $4015
    pub fn enabled(&self) -> ChannelFlags {
        let mut flags = self.deferred;
        flags.set(ChannelFlags::SQUARE1, self.square1.enabled);
        flags.set(ChannelFlags::SQUARE2, self.square2.enabled);
        flags.set(ChannelFlags::TRIANGLE, self.triangle.enabled);
        flags
    }

    /// Capture the observable state
    pub fn snapshot(&self) -> ApuSnapshot {
        ApuSnapshot {
            cycles: self.cycles,
            square1: self.square1.clone(),
            square2: self.square2.clone(),
            triangle: self.triangle.clone(),
            sequencer: self.sequencer.clone(),
            enabled: self.enabled().bits(),
            status: self.status().bits(),
        }
    }

    /// Read from an APU register by address (memory-mapped I/O)
    ///
    /// Only $4015 is readable; every other address reads as 0.
    pub const fn read(&self, addr: u16) -> u8 {
        match addr {
            SND_CHN_ADDR => self.status().bits(),
            _ => 0,
        }
    }

    /// Write to an APU register by address (memory-mapped I/O)
    ///
    /// Writes to unmapped addresses are ignored.
    pub fn write(&mut self, addr: u16, value: u8) {
        debug!("APU write {:#06X} <- {:#04X}", addr, value);
        match addr {
            SQ1_VOL_ADDR..=SQ1_HI_ADDR => self.square1.write_reg((addr - SQ1_VOL_ADDR) as u8, value),
            SQ2_VOL_ADDR..=SQ2_HI_ADDR => self.square2.write_reg((addr - SQ2_VOL_ADDR) as u8, value),
            TRI_LINEAR_ADDR..=TRI_HI_ADDR => {
                self.triangle.write_reg((addr - TRI_LINEAR_ADDR) as u8, value);
            }
            SND_CHN_ADDR => self.write_channel_enable(ChannelFlags::from_bits_truncate(value)),
            FRAME_COUNTER_ADDR => {
                if let Some(event) = self.sequencer.write_control(FrameCounterControl(value)) {
                    self.clock_frame(event);
                }
            }
            _ => {}
        }
    }

    /// $4015 write: clearing a bit zeroes that channel's length counter at once
    fn write_channel_enable(&mut self, flags: ChannelFlags) {
        self.square1.set_enabled(flags.contains(ChannelFlags::SQUARE1));
        self.square2.set_enabled(flags.contains(ChannelFlags::SQUARE2));
        self.triangle.set_enabled(flags.contains(ChannelFlags::TRIANGLE));
        self.deferred = flags.intersection(ChannelFlags::DEFERRED);
    }
}
