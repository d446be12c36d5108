//! Datagram transport: the suspension points of the whole protocol core.

mod endpoint;

pub use endpoint::DatagramEndpoint;

use std::net::SocketAddr;

use crate::err::Result;

/// Everything above this trait (handshake, sender, receiver) is written
/// against it rather than against `std::net::UdpSocket` directly, so the
/// protocol-core unit tests can drive an in-memory, loss-injecting double
/// instead of real sockets.
pub trait Transport {
    fn send(&self, bytes: &[u8], addr: SocketAddr) -> Result<()>;

    /// Blocks up to the transport's read deadline. `Err(Error::Timeout)` on
    /// expiry, never any other error kind for a plain timeout.
    fn recv(&self) -> Result<(Vec<u8>, SocketAddr)>;
}
