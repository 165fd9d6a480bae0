use std::io::Cursor;
use std::sync::{Arc, Mutex};

use visca_device::{DeviceConfig, DeviceController, DeviceError};
use visca_frame::{PowerState, Reply, ReplyError};

#[test]
fn session_over_fragmented_replies() {
    let mut camera = DeviceController::new(DeviceConfig {
        address: 2,
        pan_speed: 0x0C,
        tilt_speed: 0x0A,
        zoom_speed: 0x03,
        ..DeviceConfig::default()
    })
    .expect("config should be valid");

    assert_eq!(camera.up().to_hex(), "82 01 06 01 0C 00 03 01 FF");
    assert_eq!(camera.up_right().to_hex(), "82 01 06 01 0C 0A 02 01 FF");
    assert_eq!(camera.zoom_out().to_hex(), "82 01 04 07 33 FF");
    assert_eq!(camera.power_inquiry().to_hex(), "82 09 04 00 FF");
    camera.expect_power_reply();

    let replies = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&replies);
    camera.on_response(move |msg| {
        let kind = match msg.reply() {
            Reply::Ack { .. } => "ack".to_string(),
            Reply::Completion { .. } => "completion".to_string(),
            Reply::Error { error, .. } => format!("error: {error}"),
            Reply::Other => "other".to_string(),
        };
        sink.lock().unwrap().push((msg.source_address(), kind));
    });

    // Device 2 replies with header 0xA0.
    let stream = [
        0xA0, 0x41, 0xFF, 0xA0, 0x51, 0xFF, 0xA0, 0x50, 0x02, 0xFF, 0xA0, 0x60, 0x03, 0xFF,
    ];
    let mut source = Cursor::new(stream.to_vec());
    let mut chunk = [0u8; 3];
    loop {
        let n = std::io::Read::read(&mut source, &mut chunk).unwrap();
        if n == 0 {
            break;
        }
        camera.receive(&chunk[..n]).expect("framing should succeed");
    }

    assert_eq!(
        *replies.lock().unwrap(),
        vec![
            (Some(2), "ack".to_string()),
            (Some(2), "completion".to_string()),
            (Some(2), "completion".to_string()),
            (Some(2), format!("error: {}", ReplyError::CommandBufferFull)),
        ]
    );
    assert_eq!(camera.power_state(), Some(PowerState::On));
}

#[test]
fn invalid_preset_produces_no_frame() {
    let camera = DeviceController::with_address(1).unwrap();
    match camera.recall_preset(0x10) {
        Err(DeviceError::Range(err)) => {
            assert_eq!(err.value, 0x10);
            assert_eq!(err.max, 0x0F);
        }
        other => panic!("expected range error, got {other:?}"),
    }
}

#[test]
fn config_loaded_from_json() {
    let config: DeviceConfig =
        serde_json::from_str(r#"{"address": 4, "zoom_speed": 5, "capacity": 32}"#).unwrap();
    let camera = DeviceController::new(config).unwrap();
    assert_eq!(camera.zoom_in().to_hex(), "84 01 04 07 25 FF");
    assert_eq!(camera.config().capacity, 32);
}
