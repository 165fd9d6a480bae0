//! Per-device VISCA control.
//!
//! A [`DeviceController`] binds one bus address and its default speeds,
//! exposes the whole command set as methods, and exclusively owns the
//! [`FrameAssembler`](visca_frame::FrameAssembler) that turns bytes from the
//! link into response messages for registered handlers.

pub mod config;
pub mod controller;
pub mod error;

pub use config::DeviceConfig;
pub use controller::DeviceController;
pub use error::{DeviceError, Result};
