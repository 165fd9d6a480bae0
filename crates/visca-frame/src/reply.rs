//! Device reply classification.
//!
//! Replies use the header `y0` where `y = address + 8`, followed by a
//! type nibble and the socket number:
//!
//! ```text
//! ACK          y0 4z FF
//! completion   y0 5z [payload...] FF
//! error        y0 6z ee FF
//! ```

use std::fmt;

use crate::message::ResponseMessage;

const TYPE_ACK: u8 = 0x4;
const TYPE_COMPLETION: u8 = 0x5;
const TYPE_ERROR: u8 = 0x6;

/// A response message interpreted as a device reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply<'a> {
    /// Command accepted into `socket`.
    Ack { socket: u8 },
    /// Command or inquiry finished; inquiries carry a payload.
    Completion { socket: u8, payload: &'a [u8] },
    /// Command rejected or aborted.
    Error { socket: u8, error: ReplyError },
    /// Not a reply this layer understands (e.g. network-change broadcasts).
    Other,
}

impl<'a> Reply<'a> {
    /// Classify a terminated message.
    pub fn parse(bytes: &'a [u8]) -> Self {
        let [header, kind, .., _terminator] = bytes else {
            return Reply::Other;
        };
        if header & 0x0F != 0 || header >> 4 < 0x9 {
            return Reply::Other;
        }

        let socket = kind & 0x0F;
        let body = &bytes[2..bytes.len() - 1];
        match (kind >> 4, body) {
            (TYPE_ACK, []) => Reply::Ack { socket },
            (TYPE_COMPLETION, payload) => Reply::Completion { socket, payload },
            (TYPE_ERROR, [code]) => Reply::Error {
                socket,
                error: ReplyError::from_code(*code),
            },
            _ => Reply::Other,
        }
    }
}

/// Error codes carried in `y0 6z ee FF` replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyError {
    MessageLength,
    Syntax,
    CommandBufferFull,
    CommandCanceled,
    NoSocket,
    NotExecutable,
    Unknown(u8),
}

impl ReplyError {
    pub fn from_code(code: u8) -> Self {
        match code {
            0x01 => ReplyError::MessageLength,
            0x02 => ReplyError::Syntax,
            0x03 => ReplyError::CommandBufferFull,
            0x04 => ReplyError::CommandCanceled,
            0x05 => ReplyError::NoSocket,
            0x41 => ReplyError::NotExecutable,
            other => ReplyError::Unknown(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            ReplyError::MessageLength => 0x01,
            ReplyError::Syntax => 0x02,
            ReplyError::CommandBufferFull => 0x03,
            ReplyError::CommandCanceled => 0x04,
            ReplyError::NoSocket => 0x05,
            ReplyError::NotExecutable => 0x41,
            ReplyError::Unknown(code) => code,
        }
    }
}

impl fmt::Display for ReplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplyError::MessageLength => f.write_str("message length error"),
            ReplyError::Syntax => f.write_str("syntax error"),
            ReplyError::CommandBufferFull => f.write_str("command buffer full"),
            ReplyError::CommandCanceled => f.write_str("command canceled"),
            ReplyError::NoSocket => f.write_str("no socket"),
            ReplyError::NotExecutable => f.write_str("command not executable"),
            ReplyError::Unknown(code) => write!(f, "unknown error {code:#04x}"),
        }
    }
}

/// Power state reported in reply to a power inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    On,
    Standby,
}

impl PowerState {
    /// Decode `y0 50 02 FF` / `y0 50 03 FF`.
    ///
    /// Other inquiries share this reply shape, so only call this for a
    /// message known to answer a power inquiry.
    pub fn from_message(message: &ResponseMessage) -> Option<Self> {
        match message.reply() {
            Reply::Completion {
                socket: 0,
                payload: [0x02],
            } => Some(PowerState::On),
            Reply::Completion {
                socket: 0,
                payload: [0x03],
            } => Some(PowerState::Standby),
            _ => None,
        }
    }

    pub fn is_on(self) -> bool {
        self == PowerState::On
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerState::On => f.write_str("on"),
            PowerState::Standby => f.write_str("standby"),
        }
    }
}
