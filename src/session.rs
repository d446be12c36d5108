//! `SessionController`: drives open → transfer → close on each side.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use crate::constants::{FIRST_DATA_SEQ, METADATA_SEQ};
use crate::err::Result;
use crate::handshake::{client_connect, receiver_close, sender_close, server_accept};
use crate::net::Transport;
use crate::receiver::{Event, ReceiverEngine};
use crate::sender::{self, Outcome};

/// Serves one client end to end: accept, send the metadata segment as its
/// own single-segment exchange, then the data segments through the
/// Go-Back-N window (resuming through any number of [`Outcome::Reset`]s in
/// either phase), then close.
pub fn serve_client(
    transport: &impl Transport,
    input_path: &Path,
) -> Result<()> {
    let segments = sender::split_file(input_path)?;
    let metadata_segment = &segments[..1];
    let data_segments = &segments[1..];

    let mut peer = server_accept(transport)?;

    let mut base = METADATA_SEQ;
    loop {
        match sender::run(transport, peer, metadata_segment, METADATA_SEQ, base)? {
            Outcome::Completed => break,
            Outcome::Reset { resume_base } => {
                tracing::info!(%peer, "peer reset during metadata exchange, re-running handshake");
                peer = server_accept(transport)?;
                base = resume_base;
            }
        }
    }

    let mut base = FIRST_DATA_SEQ;
    let final_seq = loop {
        match sender::run(transport, peer, data_segments, FIRST_DATA_SEQ, base)? {
            Outcome::Completed => break FIRST_DATA_SEQ + data_segments.len() as u32,
            Outcome::Reset { resume_base } => {
                tracing::info!(%peer, "peer reset mid-transfer, re-running handshake");
                peer = server_accept(transport)?;
                base = resume_base;
            }
        }
    };

    sender_close(transport, peer, final_seq)
}

/// Runs the client end to end: connect, receive metadata + data into
/// `output_path`, then close.
pub fn receive_file(
    transport: &impl Transport,
    server_ip: Ipv4Addr,
    broadcast_port: u16,
    output_path: &Path,
) -> Result<()> {
    let server_addr = SocketAddr::new(server_ip.into(), broadcast_port);
    client_connect(transport, server_addr)?;

    let basename = output_path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let received_dir = Path::new("received_file");
    std::fs::create_dir_all(received_dir)?;
    let mut sink = std::fs::File::create(received_dir.join(&basename))?;

    let mut receiver = ReceiverEngine::new(server_addr);
    loop {
        match receiver.step(transport, &mut sink)? {
            Event::FinReceived => break,
            Event::MetadataAccepted(metadata) => {
                tracing::info!(?metadata, "metadata received, transfer underway");
            }
            Event::DataAccepted | Event::Ignored => {}
        }
    }

    receiver_close(transport, server_addr, receiver.expected_seq())
}
