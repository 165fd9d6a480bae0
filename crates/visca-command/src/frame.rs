use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::params::DeviceAddress;

/// High nibble of every command header byte ("command to device N").
pub const HEADER_BASE: u8 = 0x80;

/// Terminator byte closing every command frame and response message.
pub const TERMINATOR: u8 = 0xFF;

/// Longest command frame in the command set (pan/tilt drive).
pub const MAX_COMMAND_LEN: usize = 9;

/// Header byte addressing `address`.
pub fn header(address: DeviceAddress) -> u8 {
    HEADER_BASE | address.get()
}

/// An encoded, terminated command frame.
///
/// Immutable once built: the bytes are fully determined by the command kind,
/// the device address and the parameters.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CommandFrame {
    bytes: Bytes,
}

impl CommandFrame {
    /// Build a frame for `address` from the bytes following the header.
    ///
    /// `body` excludes both the header and the terminator.
    pub(crate) fn build(address: DeviceAddress, body: &[u8]) -> Self {
        let mut buf = BytesMut::with_capacity(body.len() + 2);
        buf.put_u8(header(address));
        buf.put_slice(body);
        buf.put_u8(TERMINATOR);
        Self {
            bytes: buf.freeze(),
        }
    }

    /// The wire bytes, header through terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Total wire length.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false: a frame holds at least a header and a terminator.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Device address carried in the header nibble.
    pub fn address(&self) -> u8 {
        self.bytes[0] & 0x0F
    }

    /// Space-separated uppercase hex, e.g. `81 01 04 00 02 FF`.
    pub fn to_hex(&self) -> String {
        to_hex(&self.bytes)
    }

    /// Consume the frame and return the underlying buffer.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl AsRef<[u8]> for CommandFrame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for CommandFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CommandFrame").field(&self.to_hex()).finish()
    }
}

/// Render bytes as space-separated uppercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
