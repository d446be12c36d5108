//! `DatagramEndpoint`: a bound UDP socket with a fixed read timeout.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};

use socket2::{Domain, Socket, Type};

use crate::constants::{SEGMENT_SIZE, SOCKET_TIMEOUT};
use crate::err::{Error, Result};
use crate::net::Transport;

#[derive(Debug)]
pub struct DatagramEndpoint {
    socket: UdpSocket,
}

impl DatagramEndpoint {
    /// Servers bind to the broadcast port with `SO_REUSEADDR` set so a
    /// restarted server doesn't have to wait out the previous socket's
    /// TIME_WAIT.
    pub fn bind_server(ip: Ipv4Addr, broadcast_port: u16) -> Result<Self> {
        let addr = SocketAddrV4::new(ip, broadcast_port);
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, None)?;
        socket.set_reuse_address(true)?;
        socket.bind(&addr.into())?;
        let socket: UdpSocket = socket.into();
        socket.set_read_timeout(Some(SOCKET_TIMEOUT))?;
        Ok(DatagramEndpoint { socket })
    }

    /// Clients bind to their own receive port, no `SO_REUSEADDR`.
    pub fn bind_client(ip: Ipv4Addr, port: u16) -> Result<Self> {
        let addr = SocketAddrV4::new(ip, port);
        let socket = UdpSocket::bind(addr)?;
        socket.set_read_timeout(Some(SOCKET_TIMEOUT))?;
        Ok(DatagramEndpoint { socket })
    }

    pub fn close(self) {
        drop(self.socket);
    }

    /// The address the underlying socket is actually bound to; mainly useful
    /// in tests that bind to port 0 and need to learn the assigned port.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}

impl Transport for DatagramEndpoint {
    fn send(&self, bytes: &[u8], addr: SocketAddr) -> Result<()> {
        self.socket.send_to(bytes, addr)?;
        Ok(())
    }

    /// A datagram larger than `SEGMENT_SIZE` is truncated by the kernel
    /// before we ever see it; the upper layer then treats the truncated
    /// buffer as a malformed/corrupt segment.
    fn recv(&self) -> Result<(Vec<u8>, SocketAddr)> {
        let mut buf = vec![0u8; SEGMENT_SIZE];
        match self.socket.recv_from(&mut buf) {
            Ok((n, peer)) => {
                buf.truncate(n);
                Ok((buf, peer))
            }
            Err(e) if matches!(e.kind(), std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut) => {
                Err(Error::Timeout)
            }
            Err(e) => Err(Error::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn send_and_recv_round_trip_over_loopback() {
        let a = DatagramEndpoint::bind_client(Ipv4Addr::LOCALHOST, 0).unwrap();
        let b = DatagramEndpoint::bind_client(Ipv4Addr::LOCALHOST, 0).unwrap();
        let b_addr = b.socket.local_addr().unwrap();

        a.send(b"hello", b_addr).unwrap();
        let (bytes, _peer) = b.recv().unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn recv_times_out_on_an_empty_socket() {
        let endpoint = DatagramEndpoint::bind_client(Ipv4Addr::LOCALHOST, 0).unwrap();
        let err = endpoint.recv().unwrap_err();
        assert!(matches!(err, Error::Timeout));
    }
}
