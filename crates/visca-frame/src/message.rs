use std::fmt;

use bytes::Bytes;
use visca_command::to_hex;

use crate::reply::Reply;

/// One complete, terminated reply, acknowledgement or notification.
///
/// Only produced by the framing layer; never partial.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ResponseMessage {
    bytes: Bytes,
}

impl ResponseMessage {
    pub(crate) fn new(bytes: Bytes) -> Self {
        Self { bytes }
    }

    /// The message bytes, terminator included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Space-separated uppercase hex.
    pub fn to_hex(&self) -> String {
        to_hex(&self.bytes)
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Classify this message as a device reply.
    pub fn reply(&self) -> Reply<'_> {
        Reply::parse(&self.bytes)
    }

    /// Address of the replying device, decoded from a `y0` reply header
    /// where `y = address + 8`.
    pub fn source_address(&self) -> Option<u8> {
        let header = *self.bytes.first()?;
        match (header >> 4, header & 0x0F) {
            (hi @ 0x9..=0xF, 0) => Some(hi - 8),
            _ => None,
        }
    }
}

impl AsRef<[u8]> for ResponseMessage {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for ResponseMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResponseMessage").field(&self.to_hex()).finish()
    }
}
