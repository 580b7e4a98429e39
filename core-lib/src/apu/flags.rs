//! Bitflags for APU channel enables and status ($4015)

bitflags::bitflags! {
    /// Channel enable/status flags for the APU
    ///
    /// Written through $4015 as enable bits, read back as "length counter
    /// running" bits. Noise and DMC have no backing channel and always read
    /// back as clear.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChannelFlags: u8 {
        const SQUARE1  = 0b0_0001;
        const SQUARE2  = 0b0_0010;
        const TRIANGLE = 0b0_0100;
        const NOISE    = 0b0_1000;
        const DMC      = 0b1_0000;
    }
}

impl ChannelFlags {
    /// Channels without an emulated generator
    pub const DEFERRED: Self = Self::NOISE.union(Self::DMC);
}
