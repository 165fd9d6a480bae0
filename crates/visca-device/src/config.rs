use serde::{Deserialize, Serialize};
use visca_frame::DEFAULT_CAPACITY;

/// Addressing and speed defaults for one device.
///
/// Values are raw protocol numbers; they are validated when a
/// [`DeviceController`](crate::DeviceController) is built from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceConfig {
    /// Bus address, 1..=15.
    pub address: u8,
    /// Default pan speed, 1..=24.
    pub pan_speed: u8,
    /// Default tilt speed, 1..=20.
    pub tilt_speed: u8,
    /// Default zoom speed, 0..=7.
    pub zoom_speed: u8,
    /// Response buffer capacity in bytes.
    pub capacity: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            address: 0x01,
            pan_speed: 0x01,
            tilt_speed: 0x01,
            zoom_speed: 0x00,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl DeviceConfig {
    /// Defaults for the device at `address`.
    pub fn for_address(address: u8) -> Self {
        Self {
            address,
            ..Self::default()
        }
    }
}
