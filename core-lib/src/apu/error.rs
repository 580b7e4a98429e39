use thiserror::Error;

/// Errors raised while configuring an APU
///
/// Register traffic itself never fails: unmapped writes are ignored and
/// unmapped reads return 0.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApuError {
    #[error("Sample rate must be non-zero")]
    ZeroSampleRate,
    #[error("Sample rate {sample_rate} Hz exceeds the CPU clock of {cpu_clock} Hz")]
    SampleRateAboveClock { sample_rate: u32, cpu_clock: u32 },
}
