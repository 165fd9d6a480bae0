use visca_command::CommandKind;

/// Errors that can occur in device operations.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// A command parameter or configured default is out of range.
    #[error("invalid parameter: {0}")]
    Range(#[from] visca_command::RangeError),

    /// Response framing failed.
    #[error("frame error: {0}")]
    Frame(#[from] visca_frame::FrameError),

    /// A preset command was requested without a preset index.
    #[error("{0} requires a preset index")]
    MissingPreset(CommandKind),
}

pub type Result<T> = std::result::Result<T, DeviceError>;
