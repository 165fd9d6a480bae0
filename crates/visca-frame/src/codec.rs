use bytes::BytesMut;
use visca_command::TERMINATOR;

use crate::error::{FrameError, Result};
use crate::message::ResponseMessage;

/// Default response buffer capacity in bytes.
pub const DEFAULT_CAPACITY: usize = 100;

/// Configuration for response framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblerConfig {
    /// Maximum number of bytes held while waiting for a terminator.
    /// Default: 100.
    pub capacity: usize,
    /// Reserved byte ending every message. Default: `0xFF`.
    pub terminator: u8,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            terminator: TERMINATOR,
        }
    }
}

/// Split one terminated message off the front of `src`.
///
/// Returns `Ok(None)` if `src` holds no terminator yet. Fails with
/// [`FrameError::BufferOverflow`] when the next message, or the
/// unterminated tail, is longer than the configured capacity.
pub fn decode_message(
    src: &mut BytesMut,
    config: &AssemblerConfig,
) -> Result<Option<ResponseMessage>> {
    match src.iter().position(|&b| b == config.terminator) {
        Some(pos) if pos < config.capacity => {
            Ok(Some(ResponseMessage::new(src.split_to(pos + 1).freeze())))
        }
        Some(pos) => Err(FrameError::BufferOverflow {
            len: pos + 1,
            capacity: config.capacity,
        }),
        None if src.len() > config.capacity => Err(FrameError::BufferOverflow {
            len: src.len(),
            capacity: config.capacity,
        }),
        None => Ok(None),
    }
}
