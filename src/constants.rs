//! Wire-format and timing constants shared by every component.

use std::time::Duration;

pub const DEFAULT_IP: &str = "127.0.0.1";
pub const DEFAULT_BROADCAST_PORT: u16 = 9999;

pub const HEADER_SIZE: usize = 12;
pub const SEGMENT_SIZE: usize = 32768;
pub const PAYLOAD_SIZE: usize = SEGMENT_SIZE - HEADER_SIZE;

pub const WINDOW_SIZE: u32 = 3;

/// Reserved sequence numbers. Data segments start at 3.
pub const SYN_SEQ: u32 = 0;
pub const HANDSHAKE_ACK_SEQ: u32 = 1;
pub const METADATA_SEQ: u32 = 2;
pub const FIRST_DATA_SEQ: u32 = 3;

pub const CRC_POLY: u16 = 0x1021;
pub const CRC_INIT: u16 = 0xFFFF;

pub const SOCKET_TIMEOUT: Duration = Duration::from_secs(5);

/// Overall deadline for the close handshake, composed from repeated
/// [`SOCKET_TIMEOUT`]-bounded reads. Fixed at 3x the socket timeout.
pub const TIMEOUT_LISTEN: Duration = Duration::from_secs(15);

/// Number of SYN|ACK retransmissions the server attempts before giving up
/// on a handshake.
pub const HANDSHAKE_RETRY_LIMIT: u32 = 5;
