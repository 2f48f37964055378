//! Wire encoding and decoding of DNS messages via `hickory-proto`.

use dnscache_domain::DomainError;
use hickory_proto::op::Message;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};

pub struct MessageCodec;

impl MessageCodec {
    pub fn encode(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }

    /// Encodes a reply for a datagram of at most `max_size` bytes. A reply
    /// that does not fit is sent as its truncated form: header with TC set,
    /// question and OPT, no records.
    pub fn encode_within(message: &Message, max_size: usize) -> Result<Vec<u8>, DomainError> {
        let bytes = Self::encode(message)?;
        if bytes.len() <= max_size {
            return Ok(bytes);
        }
        Self::encode(&message.truncate())
    }

    pub fn decode(bytes: &[u8]) -> Result<Message, DomainError> {
        Message::from_vec(bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS message: {}", e))
        })
    }
}
