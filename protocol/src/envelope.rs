//! Datagram framing: the fixed 6-byte header, payload padding and the
//! trailing sender id that wrap every discovery packet.

use thiserror::Error;

// Descriptor opcodes carried in the envelope header
pub const SMALL_SERVER_INFO: u16 = 50;
pub const BIG_SERVER_INFO: u16 = 51;
pub const GET_SMALL_SERVER_INFO: u16 = 52;
pub const GET_BIG_SERVER_INFO: u16 = 53;
pub const LOGOUT: u16 = 7;

/// Two header words plus the minimum sender-id trailer.
const MIN_DATAGRAM_LEN: usize = 8;

/// Errors produced by the protocol crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("malformed envelope: datagram of {len} bytes is shorter than the 8-byte minimum")]
    MalformedEnvelope { len: usize },
    #[error("unknown wire revision '{0}', expected '0.2.8' or '0.2.9'")]
    UnknownRevision(String),
}

/// A decoded discovery datagram.
///
/// `word_len` is the word count declared by the peer. It is kept for
/// compatibility checks but never used to truncate `payload`; clients of
/// this server only inspect the descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub descriptor_id: u16,
    pub message_id: u16,
    pub word_len: u16,
    pub payload: Vec<u8>,
}

impl Envelope {
    /// Parses a raw datagram into its header fields and payload.
    ///
    /// The payload keeps everything after the header, including the peer's
    /// 2-byte sender id trailer.
    pub fn decode(data: &[u8]) -> Result<Envelope, ProtocolError> {
        if data.len() < MIN_DATAGRAM_LEN {
            return Err(ProtocolError::MalformedEnvelope { len: data.len() });
        }

        let descriptor_id = u16::from_be_bytes([data[0], data[1]]);
        let message_id = u16::from_be_bytes([data[2], data[3]]);
        let word_len = u16::from_be_bytes([data[4], data[5]]);

        Ok(Envelope {
            descriptor_id,
            message_id,
            word_len,
            payload: data[6..].to_vec(),
        })
    }

    /// Wraps a reply payload into a complete outgoing datagram.
    ///
    /// Layout: descriptor, message id (always 0, this server never
    /// correlates requests), payload word count, the payload itself, a
    /// single zero pad byte when the payload length is odd, and a 2-byte
    /// zero sender id.
    pub fn encode(descriptor_id: u16, payload: &[u8]) -> Vec<u8> {
        // Word count comes from the unpadded length, rounding up.
        let mut word_len = (payload.len() / 2) as u16;
        let padded = payload.len() % 2 != 0;
        if padded {
            word_len += 1;
        }

        let mut packet = Vec::with_capacity(MIN_DATAGRAM_LEN + payload.len() + 1);
        packet.extend_from_slice(&descriptor_id.to_be_bytes());
        packet.extend_from_slice(&0u16.to_be_bytes());
        packet.extend_from_slice(&word_len.to_be_bytes());
        packet.extend_from_slice(payload);
        if padded {
            packet.push(0);
        }
        packet.extend_from_slice(&0u16.to_be_bytes());

        packet
    }
}
