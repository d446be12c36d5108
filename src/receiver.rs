//! `ReceiverEngine`: in-order-only acceptance and cumulative ACKing.

use std::io::Write;
use std::net::SocketAddr;

use crate::constants::{FIRST_DATA_SEQ, METADATA_SEQ};
use crate::err::{Error, Result};
use crate::metadata::Metadata;
use crate::net::Transport;
use crate::segment::{Flags, Header, Segment};

/// What the caller should do after one classified datagram.
#[derive(Debug, PartialEq, Eq)]
pub enum Event {
    /// Metadata accepted; transfer proper can now proceed.
    MetadataAccepted(Metadata),
    /// A data segment was appended to the output sink.
    DataAccepted,
    /// Some other classification (corrupt, duplicate, out-of-order, wrong
    /// peer, timeout) was handled internally; nothing more to do this round.
    Ignored,
    /// `FIN|ACK` observed; the session should move to the close phase.
    FinReceived,
}

/// Drives `expected_seq` forward from 2 (metadata) to `3, 4, …`, writing
/// accepted data payloads to `sink` in order. One call processes exactly one
/// received (or timed-out) datagram.
pub struct ReceiverEngine {
    expected_seq: u32,
    server_addr: SocketAddr,
}

impl ReceiverEngine {
    pub fn new(server_addr: SocketAddr) -> Self {
        ReceiverEngine {
            expected_seq: METADATA_SEQ,
            server_addr,
        }
    }

    pub fn expected_seq(&self) -> u32 {
        self.expected_seq
    }

    /// Processes one inbound event, classifying in priority order: wrong
    /// peer, FIN|ACK, checksum, in-order, duplicate, out-of-order, timeout.
    pub fn step(
        &mut self,
        transport: &impl Transport,
        sink: &mut impl Write,
    ) -> Result<Event> {
        match transport.recv() {
            Ok((_bytes, from)) if from != self.server_addr => {
                tracing::warn!(%from, expected = self.expected_seq, "received segment [wrong port]");
                Ok(Event::Ignored)
            }
            Ok((bytes, _)) => {
                let segment = Segment::decode(&bytes)?;

                if segment.flags.contains(Flags::FIN) && self.expected_seq > METADATA_SEQ {
                    tracing::info!("received FIN|ACK, closing down");
                    return Ok(Event::FinReceived);
                }

                if !segment.is_valid() {
                    tracing::warn!(seq = segment.header.seq, "received segment [corrupted]");
                    self.resend_cumulative_ack(transport)?;
                    return Ok(Event::Ignored);
                }

                let seq = segment.header.seq;
                if seq == self.expected_seq {
                    if self.expected_seq == METADATA_SEQ {
                        let metadata = Metadata::decode(segment.payload())?;
                        tracing::info!(?metadata, "received metadata");
                        self.expected_seq = FIRST_DATA_SEQ;
                        self.acknowledge(transport, self.expected_seq)?;
                        Ok(Event::MetadataAccepted(metadata))
                    } else {
                        sink.write_all(segment.payload())?;
                        tracing::info!(seq, "received segment");
                        self.expected_seq += 1;
                        self.acknowledge(transport, self.expected_seq)?;
                        Ok(Event::DataAccepted)
                    }
                } else if seq < self.expected_seq {
                    tracing::warn!(seq, "received segment [duplicate]");
                    self.resend_cumulative_ack(transport)?;
                    Ok(Event::Ignored)
                } else {
                    tracing::warn!(seq, expected = self.expected_seq, "received segment [out-of-order]");
                    self.resend_cumulative_ack(transport)?;
                    Ok(Event::Ignored)
                }
            }
            Err(Error::Timeout) => {
                tracing::warn!(expected = self.expected_seq, "received segment [timeout]");
                self.resend_cumulative_ack(transport)?;
                Ok(Event::Ignored)
            }
            Err(e) => Err(e),
        }
    }

    /// `seq = acked-1, ack = acked, flags = ACK, payload empty`.
    fn acknowledge(&self, transport: &impl Transport, acked: u32) -> Result<()> {
        let ack = Segment::new(
            Header {
                seq: acked - 1,
                ack: acked,
            },
            Flags::ACK,
            Vec::new(),
        );
        transport.send(&ack.encode(), self.server_addr)
    }

    fn resend_cumulative_ack(&self, transport: &impl Transport) -> Result<()> {
        self.acknowledge(transport, self.expected_seq)
    }
}
