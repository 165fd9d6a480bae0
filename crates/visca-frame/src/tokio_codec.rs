//! `tokio_util::codec` adapter for async links.
//!
//! Decoding yields [`ResponseMessage`]s under the same capacity rule as
//! [`FrameAssembler`](crate::FrameAssembler); encoding writes
//! [`CommandFrame`]s verbatim.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use visca_command::CommandFrame;

use crate::codec::{decode_message, AssemblerConfig};
use crate::error::FrameError;
use crate::message::ResponseMessage;

#[derive(Debug, Clone, Default)]
pub struct ViscaCodec {
    config: AssemblerConfig,
}

impl ViscaCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AssemblerConfig) -> Self {
        Self { config }
    }
}

impl Decoder for ViscaCodec {
    type Item = ResponseMessage;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        decode_message(src, &self.config)
    }
}

impl Encoder<CommandFrame> for ViscaCodec {
    type Error = FrameError;

    fn encode(&mut self, item: CommandFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(item.as_bytes());
        Ok(())
    }
}
