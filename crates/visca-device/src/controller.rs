use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;
use visca_command::{
    Command, CommandFrame, CommandKind, DeviceAddress, PanSpeed, PresetIndex, TiltSpeed,
    ZoomSpeed,
};
use visca_frame::{
    AssemblerConfig, AssemblerState, FrameAssembler, ObserverId, PowerState, Reply,
    ResponseMessage,
};

use crate::config::DeviceConfig;
use crate::error::{DeviceError, Result};

#[derive(Debug)]
struct PowerTracker {
    address: u8,
    awaiting_reply: bool,
    last: Option<PowerState>,
}

impl PowerTracker {
    fn new(address: DeviceAddress) -> Self {
        Self {
            address: address.get(),
            awaiting_reply: false,
            last: None,
        }
    }

    fn observe(&mut self, message: &ResponseMessage) {
        // Other devices on the bus answer through the same link.
        if !self.awaiting_reply || message.source_address() != Some(self.address) {
            return;
        }
        match message.reply() {
            Reply::Completion { .. } => {
                if let Some(state) = PowerState::from_message(message) {
                    debug!(%state, "device reported power state");
                    self.last = Some(state);
                    self.awaiting_reply = false;
                }
            }
            Reply::Error { error, .. } => {
                debug!(%error, "power inquiry rejected");
                self.awaiting_reply = false;
            }
            Reply::Ack { .. } | Reply::Other => {}
        }
    }
}

/// One addressed device on the link.
///
/// Holds the device address and default speeds, builds every command for
/// that device, and owns the response framer fed from the transport.
#[derive(Debug)]
pub struct DeviceController {
    address: DeviceAddress,
    pan_speed: PanSpeed,
    tilt_speed: TiltSpeed,
    zoom_speed: ZoomSpeed,
    assembler: FrameAssembler,
    power: Arc<Mutex<PowerTracker>>,
}

impl DeviceController {
    /// Validate `config` and build a controller.
    pub fn new(config: DeviceConfig) -> Result<Self> {
        let address = DeviceAddress::new(config.address)?;
        let pan_speed = PanSpeed::new(config.pan_speed)?;
        let tilt_speed = TiltSpeed::new(config.tilt_speed)?;
        let zoom_speed = ZoomSpeed::new(config.zoom_speed)?;

        let mut assembler = FrameAssembler::with_config(AssemblerConfig {
            capacity: config.capacity,
            ..AssemblerConfig::default()
        });
        let power = Arc::new(Mutex::new(PowerTracker::new(address)));
        let tracker = Arc::clone(&power);
        assembler.subscribe(move |message| {
            tracker
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .observe(message)
        });

        debug!(
            address = address.get(),
            pan_speed = pan_speed.get(),
            tilt_speed = tilt_speed.get(),
            zoom_speed = zoom_speed.get(),
            "device controller ready"
        );

        Ok(Self {
            address,
            pan_speed,
            tilt_speed,
            zoom_speed,
            assembler,
            power,
        })
    }

    /// Controller for `address` with default speeds.
    pub fn with_address(address: u8) -> Result<Self> {
        Self::new(DeviceConfig::for_address(address))
    }

    pub fn address(&self) -> DeviceAddress {
        self.address
    }

    /// The configuration this controller was built from.
    pub fn config(&self) -> DeviceConfig {
        DeviceConfig {
            address: self.address.get(),
            pan_speed: self.pan_speed.get(),
            tilt_speed: self.tilt_speed.get(),
            zoom_speed: self.zoom_speed.get(),
            capacity: self.assembler.capacity(),
        }
    }

    /// Encode `command` for this device.
    pub fn encode(&self, command: &Command) -> CommandFrame {
        command.encode(self.address)
    }

    /// Build `kind` with this device's defaults.
    ///
    /// Preset kinds need `preset`; it is ignored for every other kind.
    pub fn command(&self, kind: CommandKind, preset: Option<u8>) -> Result<CommandFrame> {
        let frame = match kind {
            CommandKind::Up => self.up(),
            CommandKind::Down => self.down(),
            CommandKind::Left => self.left(),
            CommandKind::Right => self.right(),
            CommandKind::UpLeft => self.up_left(),
            CommandKind::UpRight => self.up_right(),
            CommandKind::DownLeft => self.down_left(),
            CommandKind::DownRight => self.down_right(),
            CommandKind::StopPanTilt => self.stop_pan_tilt(),
            CommandKind::ZoomIn => self.zoom_in(),
            CommandKind::ZoomOut => self.zoom_out(),
            CommandKind::StopZoom => self.stop_zoom(),
            CommandKind::StorePreset => {
                self.store_preset(preset.ok_or(DeviceError::MissingPreset(kind))?)?
            }
            CommandKind::RecallPreset => {
                self.recall_preset(preset.ok_or(DeviceError::MissingPreset(kind))?)?
            }
            CommandKind::PowerOn => self.power_on(),
            CommandKind::PowerOff => self.power_off(),
            CommandKind::PowerInquiry => self.power_inquiry(),
        };
        Ok(frame)
    }

    pub fn up(&self) -> CommandFrame {
        self.encode(&Command::Up { pan: self.pan_speed })
    }

    pub fn down(&self) -> CommandFrame {
        self.encode(&Command::Down { pan: self.pan_speed })
    }

    pub fn left(&self) -> CommandFrame {
        self.encode(&Command::Left { pan: self.pan_speed })
    }

    pub fn right(&self) -> CommandFrame {
        self.encode(&Command::Right { pan: self.pan_speed })
    }

    pub fn up_left(&self) -> CommandFrame {
        self.encode(&Command::UpLeft {
            pan: self.pan_speed,
            tilt: self.tilt_speed,
        })
    }

    pub fn up_right(&self) -> CommandFrame {
        self.encode(&Command::UpRight {
            pan: self.pan_speed,
            tilt: self.tilt_speed,
        })
    }

    pub fn down_left(&self) -> CommandFrame {
        self.encode(&Command::DownLeft {
            pan: self.pan_speed,
            tilt: self.tilt_speed,
        })
    }

    pub fn down_right(&self) -> CommandFrame {
        self.encode(&Command::DownRight {
            pan: self.pan_speed,
            tilt: self.tilt_speed,
        })
    }

    pub fn stop_pan_tilt(&self) -> CommandFrame {
        self.encode(&Command::StopPanTilt)
    }

    pub fn zoom_in(&self) -> CommandFrame {
        self.encode(&Command::ZoomIn {
            speed: self.zoom_speed,
        })
    }

    pub fn zoom_out(&self) -> CommandFrame {
        self.encode(&Command::ZoomOut {
            speed: self.zoom_speed,
        })
    }

    pub fn stop_zoom(&self) -> CommandFrame {
        self.encode(&Command::StopZoom)
    }

    /// Store the current position in slot `preset` (0..=15).
    pub fn store_preset(&self, preset: u8) -> Result<CommandFrame> {
        let preset = PresetIndex::new(preset)?;
        Ok(self.encode(&Command::StorePreset { preset }))
    }

    /// Recall slot `preset` (0..=15).
    pub fn recall_preset(&self, preset: u8) -> Result<CommandFrame> {
        let preset = PresetIndex::new(preset)?;
        Ok(self.encode(&Command::RecallPreset { preset }))
    }

    pub fn power_on(&self) -> CommandFrame {
        self.encode(&Command::PowerOn)
    }

    pub fn power_off(&self) -> CommandFrame {
        self.encode(&Command::PowerOff)
    }

    pub fn power_inquiry(&self) -> CommandFrame {
        self.encode(&Command::PowerInquiry)
    }

    /// Mark a power inquiry as sent on the link.
    ///
    /// The next power reply from this device fed through
    /// [`receive`](Self::receive) updates [`power_state`](Self::power_state).
    /// Replies arriving while no inquiry is outstanding are not recorded.
    pub fn expect_power_reply(&self) {
        self.lock_power().awaiting_reply = true;
    }

    /// Last power state the device reported, if any.
    pub fn power_state(&self) -> Option<PowerState> {
        self.lock_power().last
    }

    /// Register a handler for complete response messages.
    pub fn on_response<F>(&mut self, handler: F) -> ObserverId
    where
        F: FnMut(&ResponseMessage) + Send + 'static,
    {
        self.assembler.subscribe(handler)
    }

    /// Remove a handler registered with [`on_response`](Self::on_response).
    pub fn remove_handler(&mut self, id: ObserverId) -> bool {
        self.assembler.unsubscribe(id)
    }

    /// Feed raw bytes received from the transport.
    ///
    /// Returns the number of complete messages delivered to handlers.
    pub fn receive(&mut self, chunk: &[u8]) -> Result<usize> {
        Ok(self.assembler.feed(chunk)?)
    }

    /// Drop any partial response and clear an overflow.
    pub fn reset_link(&mut self) {
        self.assembler.reset();
    }

    pub fn link_state(&self) -> AssemblerState {
        self.assembler.state()
    }

    fn lock_power(&self) -> std::sync::MutexGuard<'_, PowerTracker> {
        self.power.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use visca_command::Field;
    use visca_frame::FrameError;

    use super::*;

    fn controller() -> DeviceController {
        DeviceController::new(DeviceConfig {
            address: 1,
            pan_speed: 0x18,
            tilt_speed: 0x14,
            zoom_speed: 0x07,
            ..DeviceConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn default_config_builds() {
        let ctl = DeviceController::new(DeviceConfig::default()).unwrap();
        assert_eq!(ctl.address().get(), 1);
        assert_eq!(ctl.config(), DeviceConfig::default());
    }

    #[test]
    fn construction_validates_every_field() {
        let cases = [
            (DeviceConfig::for_address(0), Field::DeviceAddress),
            (DeviceConfig::for_address(16), Field::DeviceAddress),
            (
                DeviceConfig {
                    pan_speed: 0x19,
                    ..DeviceConfig::default()
                },
                Field::PanSpeed,
            ),
            (
                DeviceConfig {
                    tilt_speed: 0,
                    ..DeviceConfig::default()
                },
                Field::TiltSpeed,
            ),
            (
                DeviceConfig {
                    zoom_speed: 8,
                    ..DeviceConfig::default()
                },
                Field::ZoomSpeed,
            ),
        ];

        for (config, field) in cases {
            match DeviceController::new(config) {
                Err(DeviceError::Range(err)) => assert_eq!(err.field, field),
                other => panic!("expected range error for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn instance_commands_match_stateless_builders() {
        let ctl = controller();
        assert_eq!(ctl.up(), visca_command::up(1, 0x18).unwrap());
        assert_eq!(
            ctl.down_left(),
            visca_command::down_left(1, 0x18, 0x14).unwrap()
        );
        assert_eq!(ctl.zoom_in(), visca_command::zoom_in(1, 7).unwrap());
        assert_eq!(ctl.stop_zoom(), visca_command::stop_zoom(1).unwrap());
        assert_eq!(
            ctl.store_preset(4).unwrap(),
            visca_command::store_preset(1, 4).unwrap()
        );
        assert_eq!(ctl.power_off(), visca_command::power_off(1).unwrap());
    }

    #[test]
    fn command_by_kind() {
        let ctl = controller();
        for kind in CommandKind::ALL {
            let frame = ctl.command(kind, Some(3)).unwrap();
            assert_eq!(frame.address(), 1);
        }
        assert!(matches!(
            ctl.command(CommandKind::RecallPreset, None),
            Err(DeviceError::MissingPreset(CommandKind::RecallPreset))
        ));
        assert!(matches!(
            ctl.command(CommandKind::StorePreset, Some(16)),
            Err(DeviceError::Range(_))
        ));
        assert!(ctl.command(CommandKind::PowerOn, None).is_ok());
    }

    #[test]
    fn handlers_receive_framed_responses() {
        let mut ctl = controller();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        ctl.on_response(move |msg| sink.lock().unwrap().push(msg.to_hex()));

        assert_eq!(ctl.receive(&[0x90, 0x41, 0xFF, 0x90]).unwrap(), 1);
        assert_eq!(ctl.link_state(), AssemblerState::Accumulating);
        assert_eq!(ctl.receive(&[0x51, 0xFF]).unwrap(), 1);

        assert_eq!(*seen.lock().unwrap(), vec!["90 41 FF", "90 51 FF"]);
    }

    #[test]
    fn removed_handler_is_not_called() {
        let mut ctl = controller();
        let seen = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&seen);
        let id = ctl.on_response(move |_| *sink.lock().unwrap() += 1);
        assert!(ctl.remove_handler(id));
        ctl.receive(&[0x90, 0x41, 0xFF]).unwrap();
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn overflow_surfaces_and_reset_recovers() {
        let mut ctl = DeviceController::new(DeviceConfig {
            capacity: 8,
            ..DeviceConfig::default()
        })
        .unwrap();

        assert!(matches!(
            ctl.receive(&[0x00; 9]),
            Err(DeviceError::Frame(FrameError::BufferOverflow { .. }))
        ));
        assert_eq!(ctl.link_state(), AssemblerState::Overflowed);
        assert!(matches!(
            ctl.receive(&[0x90, 0x41, 0xFF]),
            Err(DeviceError::Frame(FrameError::Desynchronized))
        ));

        ctl.reset_link();
        assert_eq!(ctl.receive(&[0x90, 0x41, 0xFF]).unwrap(), 1);
    }

    #[test]
    fn power_state_follows_inquiry_reply() {
        let mut ctl = controller();
        assert_eq!(ctl.power_state(), None);

        // Completion payloads are ignored until an inquiry is outstanding.
        ctl.receive(&[0x90, 0x50, 0x03, 0xFF]).unwrap();
        assert_eq!(ctl.power_state(), None);

        ctl.expect_power_reply();
        ctl.receive(&[0x90, 0x41, 0xFF]).unwrap();
        assert_eq!(ctl.power_state(), None);
        ctl.receive(&[0x90, 0x50, 0x02, 0xFF]).unwrap();
        assert_eq!(ctl.power_state(), Some(PowerState::On));

        ctl.expect_power_reply();
        ctl.receive(&[0x90, 0x50, 0x03, 0xFF]).unwrap();
        assert_eq!(ctl.power_state(), Some(PowerState::Standby));
    }

    #[test]
    fn rejected_power_inquiry_keeps_last_state() {
        let mut ctl = controller();
        ctl.expect_power_reply();
        ctl.receive(&[0x90, 0x50, 0x02, 0xFF]).unwrap();

        ctl.expect_power_reply();
        ctl.receive(&[0x90, 0x60, 0x41, 0xFF]).unwrap();
        ctl.receive(&[0x90, 0x50, 0x03, 0xFF]).unwrap();

        assert_eq!(ctl.power_state(), Some(PowerState::On));
    }

    #[test]
    fn building_power_inquiry_does_not_arm_tracking() {
        let mut ctl = controller();
        let frame = ctl.command(CommandKind::PowerInquiry, None).unwrap();
        assert_eq!(frame.to_hex(), "81 09 04 00 FF");

        ctl.receive(&[0x90, 0x50, 0x03, 0xFF]).unwrap();
        assert_eq!(ctl.power_state(), None);
    }

    #[test]
    fn power_reply_from_other_device_is_ignored() {
        let mut ctl = DeviceController::with_address(2).unwrap();
        ctl.expect_power_reply();

        ctl.receive(&[0x90, 0x50, 0x02, 0xFF]).unwrap();
        assert_eq!(ctl.power_state(), None);

        ctl.receive(&[0xA0, 0x50, 0x03, 0xFF]).unwrap();
        assert_eq!(ctl.power_state(), Some(PowerState::Standby));
    }
}
