//! `Segment`: an immutable value struct for one wire segment. Every
//! receive/transmit operation below hands back a fresh `Segment` rather than
//! mutating a shared one.

use crate::constants::HEADER_SIZE;
use crate::err::{Error, Result};
use crate::segment::crc::crc16;
use crate::segment::flags::Flags;

/// The two fields callers actually address a segment by. Replaces the
/// source's `{"seq": ..., "ack": ...}` dict header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub seq: u32,
    pub ack: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub header: Header,
    pub flags: Flags,
    checksum: u16,
    payload: Vec<u8>,
}

impl Segment {
    /// Builds a segment and computes its checksum from `payload` immediately,
    /// so `is_valid()` holds for every freshly-constructed value.
    pub fn new(header: Header, flags: Flags, payload: Vec<u8>) -> Self {
        let checksum = crc16(&payload);
        Segment {
            header,
            flags,
            checksum,
            payload,
        }
    }

    pub fn empty() -> Self {
        Segment::new(Header::default(), Flags::empty(), Vec::new())
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    /// Recomputes the CRC over the current payload and compares it to the
    /// stored one. Never implicitly called by `decode`; callers test this
    /// explicitly so a corrupt segment is still a value, not an error.
    pub fn is_valid(&self) -> bool {
        crc16(&self.payload) == self.checksum
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + self.payload.len());
        out.extend_from_slice(&self.header.seq.to_le_bytes());
        out.extend_from_slice(&self.header.ack.to_le_bytes());
        out.push(self.flags.bits());
        out.push(0); // reserved
        out.extend_from_slice(&self.checksum.to_le_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Parses the fixed header and takes the remainder verbatim as payload.
    /// The stored checksum is kept as-is (not recomputed) so a corrupt
    /// segment decodes successfully and only fails `is_valid()`.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::MalformedSegment(bytes.len()));
        }
        let seq = u32::from_le_bytes(bytes[0..4].try_into().unwrap());
        let ack = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
        let flags = Flags::from_wire(bytes[8]);
        let checksum = u16::from_le_bytes(bytes[10..12].try_into().unwrap());
        let payload = bytes[HEADER_SIZE..].to_vec();
        Ok(Segment {
            header: Header { seq, ack },
            flags,
            checksum,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_header_flags_and_payload() {
        let original = Segment::new(
            Header { seq: 7, ack: 3 },
            Flags::SYN | Flags::ACK,
            b"payload bytes".to_vec(),
        );
        let decoded = Segment::decode(&original.encode()).unwrap();
        assert_eq!(decoded.header, original.header);
        assert_eq!(decoded.flags, original.flags);
        assert_eq!(decoded.payload(), original.payload());
        assert!(decoded.is_valid());
    }

    #[test]
    fn flag_subsets_survive_round_trip() {
        for flags in [
            Flags::empty(),
            Flags::SYN,
            Flags::ACK,
            Flags::FIN,
            Flags::SYN_ACK,
            Flags::FIN_ACK,
            Flags::SYN | Flags::FIN,
        ] {
            let segment = Segment::new(Header::default(), flags, Vec::new());
            let decoded = Segment::decode(&segment.encode()).unwrap();
            assert_eq!(decoded.flags, flags);
        }
    }

    #[test]
    fn bit_flip_in_payload_fails_validation() {
        let original = Segment::new(Header::default(), Flags::ACK, b"udp go-back-n".to_vec());
        let mut bytes = original.encode();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let decoded = Segment::decode(&bytes).unwrap();
        assert!(!decoded.is_valid());
    }

    #[test]
    fn decode_rejects_buffers_shorter_than_the_header() {
        let err = Segment::decode(&[0u8; 11]).unwrap_err();
        assert!(matches!(err, Error::MalformedSegment(11)));
    }

    #[test]
    fn empty_payload_segment_round_trips() {
        let segment = Segment::new(Header { seq: 0, ack: 1 }, Flags::SYN, Vec::new());
        let decoded = Segment::decode(&segment.encode()).unwrap();
        assert!(decoded.payload().is_empty());
        assert!(decoded.is_valid());
    }
}
