use std::sync::{Arc, Mutex};

use visca_command::{
    down_right, power_inquiry, power_on, recall_preset, stop_pan_tilt, up, zoom_in, CommandFrame,
};
use visca_frame::{AssemblerState, FrameAssembler, FrameError, DEFAULT_CAPACITY};

fn sample_frames() -> Vec<CommandFrame> {
    vec![
        up(1, 0x18).unwrap(),
        zoom_in(1, 7).unwrap(),
        down_right(3, 0x0C, 0x14).unwrap(),
        stop_pan_tilt(15).unwrap(),
        recall_preset(2, 9).unwrap(),
        power_on(7).unwrap(),
        power_inquiry(1).unwrap(),
    ]
}

fn subscribe_collector(assembler: &mut FrameAssembler) -> Arc<Mutex<Vec<Vec<u8>>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    assembler.subscribe(move |msg| sink.lock().unwrap().push(msg.as_bytes().to_vec()));
    seen
}

#[test]
fn concatenated_frames_survive_every_chunk_size() {
    let frames = sample_frames();
    let wire: Vec<u8> = frames.iter().flat_map(|f| f.as_bytes().to_vec()).collect();
    let expected: Vec<Vec<u8>> = frames.iter().map(|f| f.as_bytes().to_vec()).collect();

    for chunk_size in 1..=wire.len() {
        let mut assembler = FrameAssembler::new();
        let seen = subscribe_collector(&mut assembler);

        let mut delivered = 0;
        for chunk in wire.chunks(chunk_size) {
            delivered += assembler.feed(chunk).unwrap();
        }

        assert_eq!(delivered, frames.len(), "chunk size {chunk_size}");
        assert_eq!(*seen.lock().unwrap(), expected, "chunk size {chunk_size}");
        assert_eq!(assembler.state(), AssemblerState::Empty);
    }
}

#[test]
fn uneven_chunking_of_one_frame_yields_one_message() {
    let frame = down_right(1, 0x18, 0x14).unwrap();
    let bytes = frame.as_bytes();

    for split_a in 0..bytes.len() {
        for split_b in split_a..bytes.len() {
            let mut assembler = FrameAssembler::new();
            let seen = subscribe_collector(&mut assembler);

            assembler.feed(&bytes[..split_a]).unwrap();
            assembler.feed(&bytes[split_a..split_b]).unwrap();
            assembler.feed(&bytes[split_b..]).unwrap();

            assert_eq!(*seen.lock().unwrap(), vec![bytes.to_vec()]);
        }
    }
}

#[test]
fn overflow_reported_once_for_capacity_plus_one() {
    let mut assembler = FrameAssembler::new();
    let seen = subscribe_collector(&mut assembler);

    let mut overflows = 0;
    for byte in std::iter::repeat(0x42u8).take(DEFAULT_CAPACITY + 1) {
        match assembler.feed(&[byte]) {
            Ok(0) => {}
            Ok(n) => panic!("unexpected {n} messages"),
            Err(FrameError::BufferOverflow { .. }) => overflows += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(overflows, 1);
    assert!(seen.lock().unwrap().is_empty());
    assert!(matches!(
        assembler.feed(&[0xFF]),
        Err(FrameError::Desynchronized)
    ));
}

#[test]
fn resynchronize_after_overflow() {
    let mut assembler = FrameAssembler::new();
    let seen = subscribe_collector(&mut assembler);

    assert!(assembler.feed(&[0x00; DEFAULT_CAPACITY + 1]).is_err());
    assembler.reset();

    let frame = power_inquiry(1).unwrap();
    assert_eq!(assembler.feed(frame.as_bytes()).unwrap(), 1);
    assert_eq!(*seen.lock().unwrap(), vec![frame.as_bytes().to_vec()]);
}
