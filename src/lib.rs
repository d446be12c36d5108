//! Protocol core for a reliable, in-order, checksummed file-transfer
//! protocol layered over UDP: segment wire format, three/four-way
//! handshakes, a Go-Back-N sliding window sender, and an in-order-only
//! receiver.

pub mod cli;
pub mod constants;
pub mod err;
pub mod handshake;
pub mod metadata;
pub mod net;
pub mod receiver;
pub mod segment;
pub mod sender;
pub mod session;

#[cfg(test)]
mod testutil;

pub use err::{Error, Result};
