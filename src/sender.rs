//! `SenderEngine`: file splitting and the Go-Back-N send/ack window.

use std::fs::File;
use std::io::Read;
use std::net::SocketAddr;

use crate::constants::{FIRST_DATA_SEQ, METADATA_SEQ, PAYLOAD_SIZE, SEGMENT_SIZE, WINDOW_SIZE};
use crate::err::{Error, Result};
use crate::metadata::Metadata;
use crate::net::Transport;
use crate::segment::{Flags, Header, Segment};

/// Outcome of one `run` of the send/ack window.
#[derive(Debug)]
pub enum Outcome {
    /// Every segment has been acknowledged.
    Completed,
    /// The peer sent a `SYN|ACK` mid-transfer (it restarted). The caller
    /// reruns the handshake and resumes the window from `resume_base`.
    Reset { resume_base: u32 },
}

/// Splits `path` into `[metadata, data_0, data_1, …]`, immutable once built.
/// Segment count is `ceil(file_size / SEGMENT_SIZE)` but each segment reads
/// `PAYLOAD_SIZE` bytes: for files whose size isn't a multiple of
/// SEGMENT_SIZE's ratio to PAYLOAD_SIZE, this under-segments the tail of the
/// file relative to a naive PAYLOAD_SIZE-based split.
pub fn split_file(path: &std::path::Path) -> Result<Vec<Segment>> {
    let mut file = File::open(path).map_err(|source| Error::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let file_size = file
        .metadata()
        .map_err(|source| Error::FileOpen {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    let filename = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let metadata = Metadata::from_filename(&filename, file_size);
    let metadata_segment = Segment::new(
        Header {
            seq: METADATA_SEQ,
            ack: 0,
        },
        Flags::empty(),
        metadata.encode(),
    );

    let segment_count = file_size.div_ceil(SEGMENT_SIZE as u64);

    let mut segments = vec![metadata_segment];
    let mut buf = vec![0u8; PAYLOAD_SIZE];
    for i in 0..segment_count {
        let n = file.read(&mut buf)?;
        segments.push(Segment::new(
            Header {
                seq: FIRST_DATA_SEQ + i as u32,
                ack: 0,
            },
            Flags::empty(),
            buf[..n].to_vec(),
        ));
    }

    Ok(segments)
}

/// Drives the Go-Back-N window over `segments`, where `segments[0]` carries
/// sequence number `first_seq`, until every segment is acknowledged or the
/// peer resets. Called once for the metadata segment alone (a single-segment
/// exchange, `first_seq = METADATA_SEQ`) and once for the data segments
/// (`first_seq = FIRST_DATA_SEQ`), so metadata is fully ACKed before the
/// first data segment is ever transmitted.
///
/// `resume_base` lets the caller re-enter after a [`Outcome::Reset`] without
/// restarting the current phase from scratch.
pub fn run(
    transport: &impl Transport,
    peer: SocketAddr,
    segments: &[Segment],
    first_seq: u32,
    resume_base: u32,
) -> Result<Outcome> {
    let last_seq = first_seq + segments.len() as u32 - 1;

    let mut base = resume_base;

    while base <= last_seq {
        let window_extent = WINDOW_SIZE.min(last_seq - base + 1);

        for seq in base..base + window_extent {
            let segment = &segments[(seq - first_seq) as usize];
            transport.send(&segment.encode(), peer)?;
            tracing::debug!(seq, %peer, "transmitted segment");
        }

        'collect: for _ in 0..window_extent {
            match transport.recv() {
                Ok((_bytes, from)) if from != peer => {
                    tracing::debug!(%from, %peer, "ignoring datagram from a different peer mid-transfer");
                }
                Ok((bytes, _)) => {
                    let segment = Segment::decode(&bytes)?;

                    if segment.flags.contains(Flags::SYN) && segment.flags.contains(Flags::ACK) {
                        tracing::warn!(%peer, "peer sent SYN|ACK mid-transfer, signalling reset");
                        return Ok(Outcome::Reset { resume_base: base });
                    }

                    if segment.flags != Flags::ACK {
                        tracing::debug!(%peer, flags = segment.flags.bits(), "ignoring non-ACK flag combination");
                        continue 'collect;
                    }

                    let ack = segment.header.ack;
                    if ack == base + 1 {
                        base += 1;
                        tracing::debug!(ack, "window base advanced by one");
                    } else if ack > base + 1 {
                        tracing::debug!(ack, base, "cumulative ack, jumping window base forward");
                        base = ack;
                    } else {
                        tracing::debug!(ack, base, "stale ack, ignoring");
                    }
                }
                Err(Error::Timeout) => {
                    tracing::warn!(base, %peer, "ack collection timed out, retransmitting window");
                    break 'collect;
                }
                Err(e) => return Err(e),
            }
        }
    }

    tracing::info!(%peer, "all segments acknowledged");
    Ok(Outcome::Completed)
}
