/// Errors that can occur while framing VISCA responses.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Unterminated bytes would exceed the buffer capacity.
    ///
    /// Framing synchronization is lost; the assembler refuses further input
    /// until it is reset.
    #[error("response buffer overflow ({len} bytes, capacity {capacity})")]
    BufferOverflow { len: usize, capacity: usize },

    /// Input was fed to an assembler that overflowed and was not reset.
    #[error("framing desynchronized after overflow (reset required)")]
    Desynchronized,

    /// An I/O error occurred while reading from the link.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link closed with an unterminated message pending.
    #[error("connection closed (incomplete message, {pending} bytes pending)")]
    ConnectionClosed { pending: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
