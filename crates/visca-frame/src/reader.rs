use std::io::{ErrorKind, Read};

use crate::assembler::FrameAssembler;
use crate::error::{FrameError, Result};

const READ_CHUNK_SIZE: usize = 256;

/// Pumps bytes from any `Read` source into a [`FrameAssembler`].
///
/// Useful when the link is a blocking serial port or socket; the assembler's
/// observers still run synchronously on the reading thread.
pub struct MessageReader<T> {
    inner: T,
    assembler: FrameAssembler,
}

impl<T: Read> MessageReader<T> {
    /// Create a reader with a default assembler.
    pub fn new(inner: T) -> Self {
        Self::with_assembler(inner, FrameAssembler::new())
    }

    /// Create a reader feeding an existing assembler.
    pub fn with_assembler(inner: T, assembler: FrameAssembler) -> Self {
        Self { inner, assembler }
    }

    /// Read one chunk and feed it.
    ///
    /// Returns the number of messages delivered, or `None` at end of stream.
    pub fn pump(&mut self) -> Result<Option<usize>> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            match self.inner.read(&mut chunk) {
                Ok(0) => return Ok(None),
                Ok(n) => return self.assembler.feed(&chunk[..n]).map(Some),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Pump until end of stream and return the total number of messages.
    ///
    /// Fails with [`FrameError::ConnectionClosed`] if the stream ends inside a
    /// message.
    pub fn run(&mut self) -> Result<usize> {
        let mut total = 0usize;
        while let Some(delivered) = self.pump()? {
            total += delivered;
        }

        match self.assembler.pending_len() {
            0 => Ok(total),
            pending => Err(FrameError::ConnectionClosed { pending }),
        }
    }

    pub fn assembler(&self) -> &FrameAssembler {
        &self.assembler
    }

    /// Mutably borrow the assembler, e.g. to subscribe or reset.
    pub fn assembler_mut(&mut self) -> &mut FrameAssembler {
        &mut self.assembler
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader, returning the stream and the assembler.
    pub fn into_parts(self) -> (T, FrameAssembler) {
        (self.inner, self.assembler)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::codec::AssemblerConfig;

    fn collect(reader: &mut MessageReader<impl Read>) -> Arc<Mutex<Vec<Vec<u8>>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        reader
            .assembler_mut()
            .subscribe(move |msg| sink.lock().unwrap().push(msg.as_bytes().to_vec()));
        seen
    }

    #[test]
    fn reads_all_messages_to_eof() {
        let wire = vec![0x90, 0x41, 0xFF, 0x90, 0x51, 0xFF];
        let mut reader = MessageReader::new(Cursor::new(wire));
        let seen = collect(&mut reader);

        assert_eq!(reader.run().unwrap(), 2);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![vec![0x90, 0x41, 0xFF], vec![0x90, 0x51, 0xFF]]
        );
    }

    #[test]
    fn partial_read_handling() {
        let byte_reader = ByteByByteReader {
            bytes: vec![0x90, 0x50, 0x02, 0xFF],
            pos: 0,
        };
        let mut reader = MessageReader::new(byte_reader);
        let seen = collect(&mut reader);

        assert_eq!(reader.pump().unwrap(), Some(0));
        assert_eq!(reader.run().unwrap(), 1);
        assert_eq!(*seen.lock().unwrap(), vec![vec![0x90, 0x50, 0x02, 0xFF]]);
    }

    #[test]
    fn eof_mid_message() {
        let mut reader = MessageReader::new(Cursor::new(vec![0x90, 0x41, 0xFF, 0x90]));
        let err = reader.run().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed { pending: 1 }));
    }

    #[test]
    fn empty_stream() {
        let mut reader = MessageReader::new(Cursor::new(Vec::<u8>::new()));
        assert_eq!(reader.pump().unwrap(), None);
        assert_eq!(reader.run().unwrap(), 0);
    }

    #[test]
    fn overflow_in_stream() {
        let assembler = FrameAssembler::with_config(AssemblerConfig {
            capacity: 8,
            ..AssemblerConfig::default()
        });
        let mut reader = MessageReader::with_assembler(Cursor::new(vec![0x01; 16]), assembler);
        let err = reader.run().unwrap_err();
        assert!(matches!(err, FrameError::BufferOverflow { .. }));
    }

    #[test]
    fn interrupted_read_retries() {
        let reader = InterruptedThenData {
            interrupted: false,
            bytes: vec![0x90, 0x41, 0xFF],
            pos: 0,
        };
        let mut framed = MessageReader::new(reader);
        assert_eq!(framed.run().unwrap(), 1);
    }

    #[test]
    fn other_io_errors_propagate() {
        let mut framed = MessageReader::new(FailingReader);
        let err = framed.run().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    fn into_parts_keeps_pending_bytes() {
        let mut reader = MessageReader::new(Cursor::new(vec![0x90, 0x50]));
        assert_eq!(reader.pump().unwrap(), Some(0));
        let (_, assembler) = reader.into_parts();
        assert_eq!(assembler.pending(), &[0x90, 0x50]);
    }

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct InterruptedThenData {
        interrupted: bool,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            let remaining = &self.bytes[self.pos..];
            let n = remaining.len().min(buf.len());
            buf[..n].copy_from_slice(&remaining[..n]);
            self.pos += n;
            Ok(n)
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }
    }
}
