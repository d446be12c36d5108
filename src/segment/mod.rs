//! Segment wire format: flags, checksum and the fixed 12-byte header.

pub mod codec;
pub mod crc;
pub mod flags;

pub use codec::{Header, Segment};
pub use flags::Flags;
