//! Command encoding.
//!
//! The free functions take raw protocol values, validate every one of them
//! (address first) and only then produce bytes. [`Command`] is the typed form
//! for callers that already hold validated parameters.
//!
//! Layouts, with `8x` the header for device `x`:
//! ```text
//! pan/tilt drive   8x 01 06 01 <pan> <tilt> <dir1> <dir2> FF
//! zoom             8x 01 04 07 <zoom> FF
//! memory           8x 01 04 3F <op> <preset> FF
//! power            8x 01 04 00 <op> FF
//! power inquiry    8x 09 04 00 FF
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::frame::CommandFrame;
use crate::params::{DeviceAddress, PanSpeed, PresetIndex, TiltSpeed, ZoomSpeed};

const PAN_TILT_DRIVE: [u8; 3] = [0x01, 0x06, 0x01];
const CAM_ZOOM: [u8; 3] = [0x01, 0x04, 0x07];
const CAM_MEMORY: [u8; 3] = [0x01, 0x04, 0x3F];
const CAM_POWER: [u8; 3] = [0x01, 0x04, 0x00];
const CAM_POWER_INQUIRY: [u8; 3] = [0x09, 0x04, 0x00];

const ZOOM_TELE: u8 = 0x20;
const ZOOM_WIDE: u8 = 0x30;
const ZOOM_STOP: u8 = 0x00;

const MEMORY_SET: u8 = 0x01;
const MEMORY_RECALL: u8 = 0x02;

const POWER_ON: u8 = 0x02;
const POWER_OFF: u8 = 0x03;

// Direction bytes: first selects pan (01 left, 02 right, 03 none),
// second selects tilt (01 up, 02 down, 03 none).
const DIR_UP: [u8; 2] = [0x03, 0x01];
const DIR_DOWN: [u8; 2] = [0x03, 0x02];
const DIR_LEFT: [u8; 2] = [0x01, 0x03];
const DIR_RIGHT: [u8; 2] = [0x02, 0x03];
const DIR_UP_LEFT: [u8; 2] = [0x01, 0x01];
const DIR_UP_RIGHT: [u8; 2] = [0x02, 0x01];
const DIR_DOWN_LEFT: [u8; 2] = [0x01, 0x02];
const DIR_DOWN_RIGHT: [u8; 2] = [0x02, 0x02];
const DIR_STOP: [u8; 2] = [0x03, 0x03];

/// A command with validated parameters, not yet bound to a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Up { pan: PanSpeed },
    Down { pan: PanSpeed },
    Left { pan: PanSpeed },
    Right { pan: PanSpeed },
    UpLeft { pan: PanSpeed, tilt: TiltSpeed },
    UpRight { pan: PanSpeed, tilt: TiltSpeed },
    DownLeft { pan: PanSpeed, tilt: TiltSpeed },
    DownRight { pan: PanSpeed, tilt: TiltSpeed },
    StopPanTilt,
    ZoomIn { speed: ZoomSpeed },
    ZoomOut { speed: ZoomSpeed },
    StopZoom,
    StorePreset { preset: PresetIndex },
    RecallPreset { preset: PresetIndex },
    PowerOn,
    PowerOff,
    PowerInquiry,
}

impl Command {
    /// Encode this command for `address`.
    pub fn encode(&self, address: DeviceAddress) -> CommandFrame {
        match *self {
            Command::Up { pan } => drive(address, pan.get(), 0x00, DIR_UP),
            Command::Down { pan } => drive(address, pan.get(), 0x00, DIR_DOWN),
            Command::Left { pan } => drive(address, pan.get(), 0x00, DIR_LEFT),
            Command::Right { pan } => drive(address, pan.get(), 0x00, DIR_RIGHT),
            Command::UpLeft { pan, tilt } => drive(address, pan.get(), tilt.get(), DIR_UP_LEFT),
            Command::UpRight { pan, tilt } => drive(address, pan.get(), tilt.get(), DIR_UP_RIGHT),
            Command::DownLeft { pan, tilt } => {
                drive(address, pan.get(), tilt.get(), DIR_DOWN_LEFT)
            }
            Command::DownRight { pan, tilt } => {
                drive(address, pan.get(), tilt.get(), DIR_DOWN_RIGHT)
            }
            Command::StopPanTilt => drive(address, 0x00, 0x00, DIR_STOP),
            Command::ZoomIn { speed } => zoom(address, ZOOM_TELE | speed.get()),
            Command::ZoomOut { speed } => zoom(address, ZOOM_WIDE | speed.get()),
            Command::StopZoom => zoom(address, ZOOM_STOP),
            Command::StorePreset { preset } => memory(address, MEMORY_SET, preset),
            Command::RecallPreset { preset } => memory(address, MEMORY_RECALL, preset),
            Command::PowerOn => with_opcode(address, CAM_POWER, &[POWER_ON]),
            Command::PowerOff => with_opcode(address, CAM_POWER, &[POWER_OFF]),
            Command::PowerInquiry => with_opcode(address, CAM_POWER_INQUIRY, &[]),
        }
    }

    /// The kind of this command, without parameters.
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Up { .. } => CommandKind::Up,
            Command::Down { .. } => CommandKind::Down,
            Command::Left { .. } => CommandKind::Left,
            Command::Right { .. } => CommandKind::Right,
            Command::UpLeft { .. } => CommandKind::UpLeft,
            Command::UpRight { .. } => CommandKind::UpRight,
            Command::DownLeft { .. } => CommandKind::DownLeft,
            Command::DownRight { .. } => CommandKind::DownRight,
            Command::StopPanTilt => CommandKind::StopPanTilt,
            Command::ZoomIn { .. } => CommandKind::ZoomIn,
            Command::ZoomOut { .. } => CommandKind::ZoomOut,
            Command::StopZoom => CommandKind::StopZoom,
            Command::StorePreset { .. } => CommandKind::StorePreset,
            Command::RecallPreset { .. } => CommandKind::RecallPreset,
            Command::PowerOn => CommandKind::PowerOn,
            Command::PowerOff => CommandKind::PowerOff,
            Command::PowerInquiry => CommandKind::PowerInquiry,
        }
    }
}

fn drive(address: DeviceAddress, pan: u8, tilt: u8, dir: [u8; 2]) -> CommandFrame {
    with_opcode(address, PAN_TILT_DRIVE, &[pan, tilt, dir[0], dir[1]])
}

fn zoom(address: DeviceAddress, op: u8) -> CommandFrame {
    with_opcode(address, CAM_ZOOM, &[op])
}

fn memory(address: DeviceAddress, op: u8, preset: PresetIndex) -> CommandFrame {
    with_opcode(address, CAM_MEMORY, &[op, preset.get()])
}

fn with_opcode(address: DeviceAddress, opcode: [u8; 3], params: &[u8]) -> CommandFrame {
    let mut body = [0u8; 7];
    body[..3].copy_from_slice(&opcode);
    body[3..3 + params.len()].copy_from_slice(params);
    CommandFrame::build(address, &body[..3 + params.len()])
}

/// Command kinds, without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    StopPanTilt,
    ZoomIn,
    ZoomOut,
    StopZoom,
    StorePreset,
    RecallPreset,
    PowerOn,
    PowerOff,
    PowerInquiry,
}

impl CommandKind {
    /// Every kind, in command-set order.
    pub const ALL: [CommandKind; 17] = [
        CommandKind::Up,
        CommandKind::Down,
        CommandKind::Left,
        CommandKind::Right,
        CommandKind::UpLeft,
        CommandKind::UpRight,
        CommandKind::DownLeft,
        CommandKind::DownRight,
        CommandKind::StopPanTilt,
        CommandKind::ZoomIn,
        CommandKind::ZoomOut,
        CommandKind::StopZoom,
        CommandKind::StorePreset,
        CommandKind::RecallPreset,
        CommandKind::PowerOn,
        CommandKind::PowerOff,
        CommandKind::PowerInquiry,
    ];

    /// Stable kebab-case name.
    pub fn name(self) -> &'static str {
        match self {
            CommandKind::Up => "up",
            CommandKind::Down => "down",
            CommandKind::Left => "left",
            CommandKind::Right => "right",
            CommandKind::UpLeft => "up-left",
            CommandKind::UpRight => "up-right",
            CommandKind::DownLeft => "down-left",
            CommandKind::DownRight => "down-right",
            CommandKind::StopPanTilt => "stop-pan-tilt",
            CommandKind::ZoomIn => "zoom-in",
            CommandKind::ZoomOut => "zoom-out",
            CommandKind::StopZoom => "stop-zoom",
            CommandKind::StorePreset => "store-preset",
            CommandKind::RecallPreset => "recall-preset",
            CommandKind::PowerOn => "power-on",
            CommandKind::PowerOff => "power-off",
            CommandKind::PowerInquiry => "power-inquiry",
        }
    }

    /// True for kinds that take a preset index.
    pub fn needs_preset(self) -> bool {
        matches!(self, CommandKind::StorePreset | CommandKind::RecallPreset)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown command kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown command kind: {0}")]
pub struct UnknownCommandKind(pub String);

impl FromStr for CommandKind {
    type Err = UnknownCommandKind;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        CommandKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCommandKind(s.to_string()))
    }
}

/// Pan up at `pan_speed`.
pub fn up(address: u8, pan_speed: u8) -> Result<CommandFrame> {
    let address = DeviceAddress::new(address)?;
    let pan = PanSpeed::new(pan_speed)?;
    Ok(Command::Up { pan }.encode(address))
}

/// Pan down at `pan_speed`.
pub fn down(address: u8, pan_speed: u8) -> Result<CommandFrame> {
    let address = DeviceAddress::new(address)?;
    let pan = PanSpeed::new(pan_speed)?;
    Ok(Command::Down { pan }.encode(address))
}

/// Pan left at `pan_speed`.
pub fn left(address: u8, pan_speed: u8) -> Result<CommandFrame> {
    let address = DeviceAddress::new(address)?;
    let pan = PanSpeed::new(pan_speed)?;
    Ok(Command::Left { pan }.encode(address))
}

/// Pan right at `pan_speed`.
pub fn right(address: u8, pan_speed: u8) -> Result<CommandFrame> {
    let address = DeviceAddress::new(address)?;
    let pan = PanSpeed::new(pan_speed)?;
    Ok(Command::Right { pan }.encode(address))
}

/// Diagonal up-left.
pub fn up_left(address: u8, pan_speed: u8, tilt_speed: u8) -> Result<CommandFrame> {
    let (address, pan, tilt) = diagonal_params(address, pan_speed, tilt_speed)?;
    Ok(Command::UpLeft { pan, tilt }.encode(address))
}

/// Diagonal up-right.
pub fn up_right(address: u8, pan_speed: u8, tilt_speed: u8) -> Result<CommandFrame> {
    let (address, pan, tilt) = diagonal_params(address, pan_speed, tilt_speed)?;
    Ok(Command::UpRight { pan, tilt }.encode(address))
}

/// Diagonal down-left.
pub fn down_left(address: u8, pan_speed: u8, tilt_speed: u8) -> Result<CommandFrame> {
    let (address, pan, tilt) = diagonal_params(address, pan_speed, tilt_speed)?;
    Ok(Command::DownLeft { pan, tilt }.encode(address))
}

/// Diagonal down-right.
pub fn down_right(address: u8, pan_speed: u8, tilt_speed: u8) -> Result<CommandFrame> {
    let (address, pan, tilt) = diagonal_params(address, pan_speed, tilt_speed)?;
    Ok(Command::DownRight { pan, tilt }.encode(address))
}

fn diagonal_params(
    address: u8,
    pan_speed: u8,
    tilt_speed: u8,
) -> Result<(DeviceAddress, PanSpeed, TiltSpeed)> {
    Ok((
        DeviceAddress::new(address)?,
        PanSpeed::new(pan_speed)?,
        TiltSpeed::new(tilt_speed)?,
    ))
}

/// Stop pan and tilt motion.
pub fn stop_pan_tilt(address: u8) -> Result<CommandFrame> {
    Ok(Command::StopPanTilt.encode(DeviceAddress::new(address)?))
}

/// Zoom toward tele at `zoom_speed`.
pub fn zoom_in(address: u8, zoom_speed: u8) -> Result<CommandFrame> {
    let address = DeviceAddress::new(address)?;
    let speed = ZoomSpeed::new(zoom_speed)?;
    Ok(Command::ZoomIn { speed }.encode(address))
}

/// Zoom toward wide at `zoom_speed`.
pub fn zoom_out(address: u8, zoom_speed: u8) -> Result<CommandFrame> {
    let address = DeviceAddress::new(address)?;
    let speed = ZoomSpeed::new(zoom_speed)?;
    Ok(Command::ZoomOut { speed }.encode(address))
}

/// Stop zoom motion.
pub fn stop_zoom(address: u8) -> Result<CommandFrame> {
    Ok(Command::StopZoom.encode(DeviceAddress::new(address)?))
}

/// Store the current position in slot `preset`.
pub fn store_preset(address: u8, preset: u8) -> Result<CommandFrame> {
    let address = DeviceAddress::new(address)?;
    let preset = PresetIndex::new(preset)?;
    Ok(Command::StorePreset { preset }.encode(address))
}

/// Move to the position stored in slot `preset`.
pub fn recall_preset(address: u8, preset: u8) -> Result<CommandFrame> {
    let address = DeviceAddress::new(address)?;
    let preset = PresetIndex::new(preset)?;
    Ok(Command::RecallPreset { preset }.encode(address))
}

pub fn power_on(address: u8) -> Result<CommandFrame> {
    Ok(Command::PowerOn.encode(DeviceAddress::new(address)?))
}

pub fn power_off(address: u8) -> Result<CommandFrame> {
    Ok(Command::PowerOff.encode(DeviceAddress::new(address)?))
}

/// Ask the device for its power state. The reply is `y0 50 02 FF` (on) or
/// `y0 50 03 FF` (standby).
pub fn power_inquiry(address: u8) -> Result<CommandFrame> {
    Ok(Command::PowerInquiry.encode(DeviceAddress::new(address)?))
}
