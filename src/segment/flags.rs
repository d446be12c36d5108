//! Typed flag set for the three recognized header bits.

use bitflags::bitflags;

bitflags! {
    /// Subset of {SYN, ACK, FIN}. The wire byte is the bitwise OR of these.
    ///
    /// A typed value over the three-bit universe, rather than a stringly-typed
    /// list of flag names.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u8 {
        const FIN = 0b0000_0001;
        const SYN = 0b0000_0010;
        const ACK = 0b0001_0000;
    }
}

impl Flags {
    pub const SYN_ACK: Flags = Flags::SYN.union(Flags::ACK);
    pub const FIN_ACK: Flags = Flags::FIN.union(Flags::ACK);

    /// Masks an arbitrary wire byte down to the three recognized bits,
    /// discarding anything else a peer might set.
    pub fn from_wire(byte: u8) -> Flags {
        Flags::from_bits_truncate(byte)
    }
}
