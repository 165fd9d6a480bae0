//! Bounded command parameters.
//!
//! Each type can only hold a value inside its protocol range, so a frame
//! built from them never needs re-validation.

use crate::error::{Field, RangeError, Result};

macro_rules! bounded {
    ($(#[$doc:meta])* $name:ident, $field:expr, $min:expr, $max:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u8);

        impl $name {
            /// Smallest accepted value.
            pub const MIN: u8 = $min;
            /// Largest accepted value.
            pub const MAX: u8 = $max;

            /// Validate `value` against the protocol range.
            pub fn new(value: u8) -> Result<Self> {
                if (Self::MIN..=Self::MAX).contains(&value) {
                    Ok(Self(value))
                } else {
                    Err(RangeError {
                        field: $field,
                        value,
                        min: Self::MIN,
                        max: Self::MAX,
                    })
                }
            }

            /// The raw protocol value.
            pub fn get(self) -> u8 {
                self.0
            }
        }

        impl TryFrom<u8> for $name {
            type Error = RangeError;

            fn try_from(value: u8) -> Result<Self> {
                Self::new(value)
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value.0
            }
        }
    };
}

bounded!(
    /// Target device on the shared bus, encoded in the low nibble of the header byte.
    DeviceAddress,
    Field::DeviceAddress,
    0x01,
    0x0F
);

bounded!(
    /// Pan drive speed.
    PanSpeed,
    Field::PanSpeed,
    0x01,
    0x18
);

bounded!(
    /// Tilt drive speed.
    TiltSpeed,
    Field::TiltSpeed,
    0x01,
    0x14
);

bounded!(
    /// Variable zoom speed, 0 is slowest.
    ZoomSpeed,
    Field::ZoomSpeed,
    0x00,
    0x07
);

bounded!(
    /// Stored camera position slot.
    PresetIndex,
    Field::PresetIndex,
    0x00,
    0x0F
);
