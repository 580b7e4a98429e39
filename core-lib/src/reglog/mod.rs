//! Register-write logs
//!
//! A log is a plain-text capture of the bus traffic a CPU sent to the APU,
//! one write per line, stamped with the CPU cycle it happened on:
//!
//! ```text
//! # cycle  address  value
//! 0        $4015    $01
//! 0        $4000    $9F
//! 12       0x4003   0x08
//! ```
//!
//! Cycle stamps are decimal (or `$`/`0x` hex), must not go backwards, and
//! addresses must fall inside $4000-$4017. `#` starts a comment.

use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, instrument};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::apu::{Apu, APU_REG_END, APU_REG_START};

/// Errors produced while parsing a register-write log
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LogError {
    #[error("line {line}: expected `<cycle> <address> <value>`")]
    Malformed { line: usize },
    #[error("line {line}: invalid number `{token}`")]
    InvalidNumber { line: usize, token: String },
    #[error("line {line}: address {address:#06X} is outside the APU register range")]
    AddressOutOfRange { line: usize, address: u64 },
    #[error("line {line}: value {value:#X} does not fit in 8 bits")]
    ValueOutOfRange { line: usize, value: u64 },
    #[error("line {line}: cycle {cycle} precedes the previous write at cycle {previous}")]
    CycleOrder {
        line: usize,
        cycle: u64,
        previous: u64,
    },
}

/// One timestamped register write
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegisterWrite {
    /// CPU cycle (since power-on) the write lands on
    pub cycle: u64,
    pub address: u16,
    pub value: u8,
}

/// Ordered sequence of register writes
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterLog {
    writes: Vec<RegisterWrite>,
}

/// Outcome of replaying a log through an APU
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReplaySummary {
    /// CPU cycles elapsed on the APU when the replay finished
    pub cycles: u64,
    /// Output samples produced during the replay
    pub samples: usize,
    /// Largest amplitude among those samples
    pub peak: f32,
    /// Final $4015 read-back
    pub status: u8,
}

fn parse_number(token: &str, line: usize) -> Result<u64, LogError> {
    let invalid = || LogError::InvalidNumber {
        line,
        token: token.to_string(),
    };
    let hex = token
        .strip_prefix('$')
        .or_else(|| token.strip_prefix("0x"))
        .or_else(|| token.strip_prefix("0X"));
    match hex {
        Some(digits) => u64::from_str_radix(digits, 16).map_err(|_| invalid()),
        None => token.parse().map_err(|_| invalid()),
    }
}

impl RegisterLog {
    /// Parse the text format described in the module docs
    pub fn parse(text: &str) -> Result<Self, LogError> {
        let mut writes = Vec::new();
        let mut previous = 0;
        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let content = raw.split('#').next().unwrap_or_default().trim();
            if content.is_empty() {
                continue;
            }
            let tokens: Vec<&str> = content.split_whitespace().collect();
            let [cycle, address, value] = tokens[..] else {
                return Err(LogError::Malformed { line });
            };

            let cycle = parse_number(cycle, line)?;
            let address = parse_number(address, line)?;
            let value = parse_number(value, line)?;

            if !(u64::from(APU_REG_START)..=u64::from(APU_REG_END)).contains(&address) {
                return Err(LogError::AddressOutOfRange { line, address });
            }
            let Ok(value) = u8::try_from(value) else {
                return Err(LogError::ValueOutOfRange { line, value });
            };
            if cycle < previous {
                return Err(LogError::CycleOrder {
                    line,
                    cycle,
                    previous,
                });
            }
            previous = cycle;

            writes.push(RegisterWrite {
                cycle,
                address: address as u16,
                value,
            });
        }
        debug!(writes = writes.len(), "parsed register log");
        Ok(Self { writes })
    }

    pub fn writes(&self) -> &[RegisterWrite] {
        &self.writes
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Drive `apu` through every write, then run `tail_cycles` more cycles
    ///
    /// The APU is ticked up to each write's cycle stamp before the write is
    /// applied. Stamps already in the APU's past are applied immediately.
    #[instrument(skip(self, apu), fields(writes = self.writes.len()), level = "debug")]
    pub fn replay(&self, apu: &mut Apu, tail_cycles: u64) -> ReplaySummary {
        let mut samples = 0;
        let mut peak = 0.0_f32;
        let mut collect = |apu: &mut Apu| {
            for sample in apu.drain_samples() {
                samples += 1;
                peak = peak.max(sample);
            }
        };

        for write in &self.writes {
            apu.run(write.cycle.saturating_sub(apu.cycles()));
            collect(apu);
            apu.write(write.address, write.value);
        }
        apu.run(tail_cycles);
        collect(apu);

        ReplaySummary {
            cycles: apu.cycles(),
            samples,
            peak,
            status: apu.read(crate::apu::SND_CHN_ADDR),
        }
    }
}

impl FromStr for RegisterLog {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
