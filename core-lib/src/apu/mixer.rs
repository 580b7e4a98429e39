//! Non-linear channel mixer and output sample clock
//!
//! The two squares share one lookup table; triangle, noise and DMC share a
//! second one indexed by `3 * triangle + 2 * noise + dmc`. Noise and DMC are
//! not emulated and feed the table as constant zero.
//! See: [`https://www.nesdev.org/wiki/APU_Mixer`]

use once_cell::sync::Lazy;

/// Level fed into the group table for the unemulated noise channel
pub const NOISE_PLACEHOLDER: usize = 0;
/// Level fed into the group table for the unemulated DMC channel
pub const DMC_PLACEHOLDER: usize = 0;

/// `square1 + square2` (0..=30) to amplitude
pub static PULSE_TABLE: Lazy<[f32; 31]> = Lazy::new(|| {
    let mut table = [0.0; 31];
    for (n, entry) in table.iter_mut().enumerate().skip(1) {
        *entry = 95.52 / (8128.0 / n as f32 + 100.0);
    }
    table
});

/// `3 * triangle + 2 * noise + dmc` (0..=202) to amplitude
pub static TND_TABLE: Lazy<[f32; 203]> = Lazy::new(|| {
    let mut table = [0.0; 203];
    for (n, entry) in table.iter_mut().enumerate().skip(1) {
        *entry = 163.67 / (24329.0 / n as f32 + 100.0);
    }
    table
});

/// Combine per-channel levels (each 0-15) into one amplitude in `0.0..1.0`
pub fn mix(square1: u8, square2: u8, triangle: u8) -> f32 {
    let pulse = PULSE_TABLE[usize::from(square1) + usize::from(square2)];
    let tnd = TND_TABLE[3 * usize::from(triangle) + 2 * NOISE_PLACEHOLDER + DMC_PLACEHOLDER];
    pulse + tnd
}

/// Fixed-ratio divider from the CPU clock down to the output sample rate
///
/// Integer accumulation keeps the emitted cadence exact and deterministic:
/// over `cpu_clock` ticks exactly `sample_rate` samples fall due.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleClock {
    cpu_clock: u32,
    sample_rate: u32,
    accumulator: u32,
}

impl SampleClock {
    pub const fn new(cpu_clock: u32, sample_rate: u32) -> Self {
        Self {
            cpu_clock,
            sample_rate,
            accumulator: 0,
        }
    }

    /// Advance one CPU cycle; returns `true` when a sample is due
    pub fn tick(&mut self) -> bool {
        self.accumulator += self.sample_rate;
        if self.accumulator >= self.cpu_clock {
            self.accumulator -= self.cpu_clock;
            return true;
        }
        false
    }
}
