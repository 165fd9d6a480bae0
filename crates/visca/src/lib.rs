//! VISCA pan/tilt/zoom camera control.
//!
//! # Crate Structure
//!
//! - [`command`]: Stateless, validated command frame encoding
//! - [`frame`]: Terminator-delimited response framing with bounded buffering
//! - [`device`]: Per-device command surface owning a response framer (behind `device` feature)

/// Re-export command types.
pub mod command {
    pub use visca_command::*;
}

/// Re-export frame types.
pub mod frame {
    pub use visca_frame::*;
}

/// Re-export device types (requires `device` feature).
#[cfg(feature = "device")]
pub mod device {
    pub use visca_device::*;
}
