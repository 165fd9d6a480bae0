use std::fmt;

/// The parameter a [`RangeError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    DeviceAddress,
    PanSpeed,
    TiltSpeed,
    ZoomSpeed,
    PresetIndex,
}

impl Field {
    /// Stable snake_case name, as used in CLI and log output.
    pub fn name(self) -> &'static str {
        match self {
            Field::DeviceAddress => "device_address",
            Field::PanSpeed => "pan_speed",
            Field::TiltSpeed => "tilt_speed",
            Field::ZoomSpeed => "zoom_speed",
            Field::PresetIndex => "preset_index",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A command parameter outside its documented bound.
///
/// Raised before any byte of a command frame is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{field} out of range ({value:#04x}, valid {min:#04x}..={max:#04x})")]
pub struct RangeError {
    pub field: Field,
    pub value: u8,
    pub min: u8,
    pub max: u8,
}

pub type Result<T> = std::result::Result<T, RangeError>;
