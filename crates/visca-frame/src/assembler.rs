use std::fmt;

use bytes::BytesMut;
use tracing::{debug, trace, warn};

use crate::codec::AssemblerConfig;
use crate::error::{FrameError, Result};
use crate::message::ResponseMessage;

/// Callback invoked with every complete message.
pub type Observer = Box<dyn FnMut(&ResponseMessage) + Send>;

/// Handle returned by [`FrameAssembler::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

/// Observable framing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    /// No pending bytes.
    Empty,
    /// Holding `1..=capacity` bytes of a message that has not been
    /// terminated yet.
    Accumulating,
    /// Capacity was exceeded; input is refused until [`FrameAssembler::reset`].
    /// No bytes are held in this state.
    Overflowed,
}

/// Reassembles terminator-delimited messages from arbitrarily chunked input.
///
/// Bytes are buffered until a terminator arrives; each terminated prefix is
/// handed to every observer, in registration order, before the next one is
/// scanned. Pending bytes never exceed the configured capacity: input that
/// would break this fails with [`FrameError::BufferOverflow`] instead of
/// growing the buffer or dropping bytes.
///
/// `feed` takes `&mut self`; callers sharing an assembler across threads
/// must serialize access themselves.
pub struct FrameAssembler {
    buf: BytesMut,
    config: AssemblerConfig,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
    overflowed: bool,
}

impl FrameAssembler {
    /// Create an assembler with the default 100-byte capacity and `0xFF` terminator.
    pub fn new() -> Self {
        Self::with_config(AssemblerConfig::default())
    }

    /// Create an assembler with explicit configuration.
    pub fn with_config(config: AssemblerConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(config.capacity),
            config,
            observers: Vec::new(),
            next_observer: 0,
            overflowed: false,
        }
    }

    /// Register `observer` for complete messages.
    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&ResponseMessage) + Send + 'static,
    {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a previously registered observer. Returns false if unknown.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    /// Append `chunk` and deliver every message it completes.
    ///
    /// Returns the number of messages delivered. On overflow, messages
    /// terminated before the overflow point have already been delivered;
    /// nothing after it is buffered.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<usize> {
        if self.overflowed {
            return Err(FrameError::Desynchronized);
        }

        let mut delivered = 0usize;
        let mut rest = chunk;
        while let Some(pos) = rest.iter().position(|&b| b == self.config.terminator) {
            let (head, tail) = rest.split_at(pos + 1);
            self.append(head)?;

            let message = ResponseMessage::new(self.buf.split().freeze());
            debug!(len = message.len(), "response message complete");
            self.notify(&message);
            delivered += 1;
            rest = tail;
        }

        if !rest.is_empty() {
            self.append(rest)?;
            trace!(pending = self.buf.len(), "buffered partial response");
        }

        Ok(delivered)
    }

    /// Discard pending bytes and clear an overflow.
    pub fn reset(&mut self) {
        debug!(
            discarded = self.buf.len(),
            overflowed = self.overflowed,
            "response framer reset"
        );
        self.buf.clear();
        self.overflowed = false;
    }

    pub fn state(&self) -> AssemblerState {
        if self.overflowed {
            AssemblerState::Overflowed
        } else if self.buf.is_empty() {
            AssemblerState::Empty
        } else {
            AssemblerState::Accumulating
        }
    }

    /// Number of unterminated bytes held. Zero once overflowed.
    pub fn pending_len(&self) -> usize {
        self.buf.len()
    }

    /// The unterminated bytes held.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn append(&mut self, bytes: &[u8]) -> Result<()> {
        let len = self.buf.len() + bytes.len();
        if len > self.config.capacity {
            self.overflowed = true;
            self.buf.clear();
            warn!(
                len,
                capacity = self.config.capacity,
                "response buffer overflow, framing lost"
            );
            return Err(FrameError::BufferOverflow {
                len,
                capacity: self.config.capacity,
            });
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    fn notify(&mut self, message: &ResponseMessage) {
        for (_, observer) in &mut self.observers {
            observer(message);
        }
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrameAssembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameAssembler")
            .field("pending", &self.buf.len())
            .field("config", &self.config)
            .field("observers", &self.observers.len())
            .field("state", &self.state())
            .finish()
    }
}
