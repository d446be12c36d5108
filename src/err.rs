use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("segment buffer too short to contain a header: {0} bytes")]
    MalformedSegment(usize),

    #[error("timed out waiting for a segment")]
    Timeout,

    #[error("deadline exceeded while waiting for connection teardown")]
    DeadlineExceeded,

    #[error("handshake with peer did not complete")]
    HandshakeFailed,

    #[error("segment from unexpected peer {0}")]
    PeerMismatch(std::net::SocketAddr),

    #[error("malformed metadata payload: {0:?}")]
    InvalidMetadata(Vec<u8>),

    #[error("could not open {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
