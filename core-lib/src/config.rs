//! Host-facing configuration: console region and output sample rate

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::apu::ApuError;

/// Console region; selects the CPU clock and frame-sequencer timing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Region {
    /// 1.789773 MHz, ~240 Hz quarter-frames
    #[default]
    Ntsc,
    /// 1.662607 MHz, ~200 Hz quarter-frames
    Pal,
}

impl Region {
    /// CPU clock in Hz
    pub const fn cpu_clock(self) -> u32 {
        match self {
            Self::Ntsc => 1_789_773,
            Self::Pal => 1_662_607,
        }
    }
}

/// APU construction parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ApuConfig {
    pub region: Region,
    /// Output samples per second
    pub sample_rate: u32,
}

impl ApuConfig {
    pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

    pub const fn new(region: Region, sample_rate: u32) -> Self {
        Self {
            region,
            sample_rate,
        }
    }

    /// Reject sample rates the fixed clock divider cannot produce
    pub const fn validate(&self) -> Result<(), ApuError> {
        let cpu_clock = self.region.cpu_clock();
        if self.sample_rate == 0 {
            return Err(ApuError::ZeroSampleRate);
        }
        if self.sample_rate > cpu_clock {
            return Err(ApuError::SampleRateAboveClock {
                sample_rate: self.sample_rate,
                cpu_clock,
            });
        }
        Ok(())
    }
}

impl Default for ApuConfig {
    fn default() -> Self {
        Self::new(Region::Ntsc, Self::DEFAULT_SAMPLE_RATE)
    }
}
