use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use visca_command::CommandKind;
use visca_device::DeviceConfig;
use visca_frame::DEFAULT_CAPACITY;

use crate::exit::{io_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode one command frame for a device.
    Encode(EncodeArgs),
    /// Split a response byte stream into messages.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Command kind (up, down-left, zoom-in, store-preset, power-inquiry, ...).
    pub kind: CommandKind,
    /// Preset slot for store-preset / recall-preset.
    #[arg(long, value_parser = parse_byte)]
    pub preset: Option<u8>,
    #[command(flatten)]
    pub device: DeviceArgs,
}

/// Device addressing and speed defaults. Flags override the config file.
#[derive(Args, Debug, Default)]
pub struct DeviceArgs {
    /// JSON device config file.
    #[arg(long, value_name = "FILE", env = "VISCA_CONFIG")]
    pub config: Option<PathBuf>,
    /// Device address (1-15).
    #[arg(long, env = "VISCA_ADDRESS", value_parser = parse_byte)]
    pub address: Option<u8>,
    /// Pan speed (1-24).
    #[arg(long, env = "VISCA_PAN_SPEED", value_parser = parse_byte)]
    pub pan_speed: Option<u8>,
    /// Tilt speed (1-20).
    #[arg(long, env = "VISCA_TILT_SPEED", value_parser = parse_byte)]
    pub tilt_speed: Option<u8>,
    /// Zoom speed (0-7).
    #[arg(long, env = "VISCA_ZOOM_SPEED", value_parser = parse_byte)]
    pub zoom_speed: Option<u8>,
}

impl DeviceArgs {
    /// Config file (or defaults) with flag overrides applied.
    pub fn resolve(&self) -> CliResult<DeviceConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => DeviceConfig::default(),
        };
        if let Some(address) = self.address {
            config.address = address;
        }
        if let Some(pan_speed) = self.pan_speed {
            config.pan_speed = pan_speed;
        }
        if let Some(tilt_speed) = self.tilt_speed {
            config.tilt_speed = tilt_speed;
        }
        if let Some(zoom_speed) = self.zoom_speed {
            config.zoom_speed = zoom_speed;
        }
        Ok(config)
    }
}

fn load_config(path: &Path) -> CliResult<DeviceConfig> {
    let text = std::fs::read_to_string(path)
        .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
    serde_json::from_str(&text)
        .map_err(|err| CliError::new(USAGE, format!("invalid config {}: {err}", path.display())))
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Read from a file instead of stdin.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
    /// Input is hex text (e.g. "90 41 FF 90 51 FF") rather than raw bytes.
    #[arg(long)]
    pub hex: bool,
    /// Response buffer capacity in bytes.
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse a byte given in decimal or `0x` hex.
pub fn parse_byte(input: &str) -> Result<u8, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|_| format!("not a byte value: {input}"))
}
