//! VISCA command encoding.
//!
//! Stateless translation of a command kind plus its parameters into the
//! exact byte layout a VISCA pan/tilt/zoom camera expects. Every frame
//! starts with `0x80 | address` and ends with the `0xFF` terminator.
//!
//! Parameters are validated before any byte is produced; an out-of-range
//! value yields a [`RangeError`] naming the field and its bound.

pub mod encode;
pub mod error;
pub mod frame;
pub mod params;

pub use encode::{
    down, down_left, down_right, left, power_inquiry, power_off, power_on, recall_preset, right,
    stop_pan_tilt, stop_zoom, store_preset, up, up_left, up_right, zoom_in, zoom_out, Command,
    CommandKind, UnknownCommandKind,
};
pub use error::{Field, RangeError, Result};
pub use frame::{header, to_hex, CommandFrame, HEADER_BASE, MAX_COMMAND_LEN, TERMINATOR};
pub use params::{DeviceAddress, PanSpeed, PresetIndex, TiltSpeed, ZoomSpeed};
