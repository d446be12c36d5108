//! Connection open (three-way) and close (four-way) handshakes.
//!
//! Modeled as a deterministic transition table per phase, driven by the
//! events `DatagramReceived`/`Timeout`, rather than a single long loop
//! mutating one scratch segment.

use std::net::SocketAddr;

use crate::constants::{HANDSHAKE_ACK_SEQ, HANDSHAKE_RETRY_LIMIT, SYN_SEQ, TIMEOUT_LISTEN};
use crate::err::{Error, Result};
use crate::net::Transport;
use crate::segment::{Flags, Header, Segment};

/// Server side of the three-way open. Blocks until a peer completes the
/// handshake or the retry bound is exhausted.
///
/// 1. Wait for the client's probe/SYN.
/// 2. On SYN, reply `SYN|ACK` and enter `AWAIT_ACK`.
/// 3. On a timeout in `AWAIT_ACK`, retransmit `SYN|ACK`, up to
///    [`HANDSHAKE_RETRY_LIMIT`] attempts.
/// 4. Any datagram whose flags include `ACK` from the same peer completes
///    the handshake; datagrams from a different peer are ignored.
pub fn server_accept(transport: &impl Transport) -> Result<SocketAddr> {
    let peer = loop {
        match transport.recv() {
            Ok((bytes, peer)) => {
                let segment = Segment::decode(&bytes)?;
                if segment.flags.contains(Flags::SYN) && segment.header.seq == SYN_SEQ {
                    tracing::info!(%peer, "received SYN from client");
                    break peer;
                }
                tracing::debug!(%peer, "ignoring pre-handshake datagram without SYN");
            }
            Err(Error::Timeout) => continue,
            Err(e) => return Err(e),
        }
    };

    let syn_ack = Segment::new(
        Header {
            seq: SYN_SEQ,
            ack: HANDSHAKE_ACK_SEQ,
        },
        Flags::SYN_ACK,
        Vec::new(),
    );
    transport.send(&syn_ack.encode(), peer)?;
    tracing::info!(%peer, "sent SYN|ACK, awaiting final ACK");

    for attempt in 0..HANDSHAKE_RETRY_LIMIT {
        match transport.recv() {
            Ok((_bytes, from)) if from != peer => {
                tracing::debug!(%from, %peer, "ignoring datagram from a different peer during handshake");
            }
            Ok((bytes, _)) => {
                let segment = Segment::decode(&bytes)?;
                if segment.flags.contains(Flags::ACK) {
                    tracing::info!(%peer, "three-way handshake established");
                    return Ok(peer);
                }
                tracing::debug!(%peer, flags = segment.flags.bits(), "ignoring non-ACK datagram in AWAIT_ACK");
            }
            Err(Error::Timeout) => {
                tracing::warn!(%peer, attempt, "ACK response timeout, resending SYN|ACK");
                transport.send(&syn_ack.encode(), peer)?;
            }
            Err(e) => return Err(e),
        }
    }

    Err(Error::HandshakeFailed)
}

/// Client side of the three-way open.
///
/// 1. Send an empty zero-flag probe to wake the server's listen loop; this
///    has no defined semantics beyond that.
/// 2. Send the real `SYN(seq=0)`.
/// 3. On incoming `SYN|ACK`, reply `ACK` and return established.
/// 4. On incoming bare `ACK` (the peer already considers us established,
///    e.g. after a retransmitted reply crossed in flight), accept directly.
/// 5. On incoming bare `SYN` (a defensive case handled symmetrically with
///    the server side), reply `SYN|ACK` as `server_accept` would.
/// 6. Datagrams from any address other than `server_addr` are ignored.
/// 7. On timeout, resend the last segment sent so far.
pub fn client_connect(transport: &impl Transport, server_addr: SocketAddr) -> Result<()> {
    let probe = Segment::empty();
    transport.send(&probe.encode(), server_addr)?;
    tracing::debug!(%server_addr, "sent probe datagram");

    let syn = Segment::new(
        Header {
            seq: SYN_SEQ,
            ack: 0,
        },
        Flags::SYN,
        Vec::new(),
    );
    transport.send(&syn.encode(), server_addr)?;
    tracing::debug!(%server_addr, "sent SYN");

    let mut last_sent = syn;

    loop {
        match transport.recv() {
            Ok((_bytes, from)) if from != server_addr => {
                tracing::debug!(%from, %server_addr, "ignoring datagram from a different peer during handshake");
            }
            Ok((bytes, from)) => {
                let segment = Segment::decode(&bytes)?;

                if segment.flags.contains(Flags::ACK) && segment.flags.contains(Flags::SYN) {
                    tracing::info!(peer = %from, "received SYN|ACK, sending final ACK");
                    let ack = Segment::new(
                        Header {
                            seq: HANDSHAKE_ACK_SEQ,
                            ack: HANDSHAKE_ACK_SEQ,
                        },
                        Flags::ACK,
                        Vec::new(),
                    );
                    transport.send(&ack.encode(), from)?;
                    tracing::info!(peer = %from, "three-way handshake established");
                    return Ok(());
                } else if segment.flags.contains(Flags::SYN) {
                    tracing::info!(peer = %from, "received SYN, replying SYN|ACK");
                    let reply = Segment::new(
                        Header {
                            seq: SYN_SEQ,
                            ack: segment.header.seq + 1,
                        },
                        Flags::SYN_ACK,
                        Vec::new(),
                    );
                    transport.send(&reply.encode(), from)?;
                    last_sent = reply;
                } else if segment.flags.contains(Flags::ACK) {
                    tracing::info!(peer = %from, "three-way handshake established");
                    return Ok(());
                }
            }
            Err(Error::Timeout) => {
                tracing::warn!(%server_addr, "handshake timeout, resending last segment");
                transport.send(&last_sent.encode(), server_addr)?;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Sender side of the four-way close, initiated once all data is ACKed.
/// `FIN|ACK` ────▶ `ACK` ◀──── `FIN|ACK` ◀──── `ACK` ────▶
pub fn sender_close(transport: &impl Transport, peer: SocketAddr, seq: u32) -> Result<()> {
    let fin_ack = Segment::new(Header { seq, ack: seq }, Flags::FIN_ACK, Vec::new());
    transport.send(&fin_ack.encode(), peer)?;
    tracing::info!(%peer, "sent FIN|ACK, awaiting receiver's FIN|ACK");

    let deadline = std::time::Instant::now() + TIMEOUT_LISTEN;
    loop {
        if std::time::Instant::now() > deadline {
            tracing::warn!(%peer, "close deadline exceeded, closing unilaterally");
            return Err(Error::DeadlineExceeded);
        }
        match transport.recv() {
            Ok((bytes, from)) if from == peer => {
                let segment = Segment::decode(&bytes)?;
                if segment.flags.contains(Flags::FIN) && segment.flags.contains(Flags::ACK) {
                    tracing::info!(%peer, "received FIN|ACK, sending final ACK");
                    let ack = Segment::new(Header { seq, ack: seq }, Flags::ACK, Vec::new());
                    transport.send(&ack.encode(), peer)?;
                    return Ok(());
                }
                tracing::debug!(%peer, "ignoring non-FIN|ACK datagram during close");
            }
            Ok((_, from)) => {
                tracing::debug!(%from, %peer, "ignoring datagram from a different peer during close");
            }
            Err(Error::Timeout) => {
                tracing::warn!(%peer, "close timeout, resending FIN|ACK");
                transport.send(&fin_ack.encode(), peer)?;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Receiver side of the four-way close: having already observed `FIN|ACK`
/// (see `ReceiverEngine`), reply `ACK`, send our own `FIN|ACK`, and wait for
/// the final `ACK`.
pub fn receiver_close(transport: &impl Transport, peer: SocketAddr, seq: u32) -> Result<()> {
    let ack = Segment::new(Header { seq, ack: seq }, Flags::ACK, Vec::new());
    transport.send(&ack.encode(), peer)?;

    let fin_ack = Segment::new(Header { seq, ack: seq }, Flags::FIN_ACK, Vec::new());
    transport.send(&fin_ack.encode(), peer)?;
    tracing::info!(%peer, "sent FIN|ACK, awaiting sender's final ACK");

    let deadline = std::time::Instant::now() + TIMEOUT_LISTEN;
    loop {
        if std::time::Instant::now() > deadline {
            tracing::warn!(%peer, "close deadline exceeded, closing unilaterally");
            return Err(Error::DeadlineExceeded);
        }
        match transport.recv() {
            Ok((bytes, from)) if from == peer => {
                let segment = Segment::decode(&bytes)?;
                if segment.flags.contains(Flags::ACK) {
                    tracing::info!(%peer, "received final ACK, connection closed");
                    return Ok(());
                }
                tracing::debug!(%peer, "ignoring non-ACK datagram during close");
            }
            Ok((_, from)) => {
                tracing::debug!(%from, %peer, "ignoring datagram from a different peer during close");
            }
            Err(Error::Timeout) => {
                tracing::warn!(%peer, "close timeout, resending FIN|ACK");
                transport.send(&fin_ack.encode(), peer)?;
            }
            Err(e) => return Err(e),
        }
    }
}
