pub mod apu;
pub mod config;
pub(crate) mod helpers;
pub mod reglog;

// Re-export common types
pub use apu::{Apu, ApuError, ApuSnapshot, ChannelFlags};
pub use config::{ApuConfig, Region};
pub use reglog::{LogError, RegisterLog, RegisterWrite, ReplaySummary};
