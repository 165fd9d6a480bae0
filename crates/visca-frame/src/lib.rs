//! Response framing for VISCA byte streams.
//!
//! The device answers with messages closed by a reserved `0xFF` terminator,
//! but the link delivers them in arbitrary fragments. [`FrameAssembler`]
//! buffers those fragments, within a fixed capacity, and hands each complete
//! message to its observers exactly once, in arrival order.
//!
//! Observers never see partial messages. Overflow is reported, never
//! absorbed: once the capacity is exceeded the assembler stays unusable until
//! it is explicitly reset.

pub mod assembler;
pub mod codec;
pub mod error;
pub mod message;
pub mod reader;
pub mod reply;
#[cfg(feature = "async")]
pub mod tokio_codec;

pub use assembler::{AssemblerState, FrameAssembler, Observer, ObserverId};
pub use codec::{decode_message, AssemblerConfig, DEFAULT_CAPACITY};
pub use error::{FrameError, Result};
pub use message::ResponseMessage;
pub use reader::MessageReader;
pub use reply::{PowerState, Reply, ReplyError};
#[cfg(feature = "async")]
pub use tokio_codec::ViscaCodec;
