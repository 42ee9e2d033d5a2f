use std::{
    io::{BufRead, BufReader, ErrorKind},
    thread,
    time::Duration,
};

use anyhow::Context;
use serialport::SerialPort;

/// How long a read may wait once a line has started arriving.
const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Grace period after opening the port; the board resets on connect and
/// spews its boot banner for a moment.
const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Line-oriented serial connection to the sensor board.
///
/// Opening is the only fatal operation in the program; everything after that
/// degrades to "no new line this frame".
pub struct SerialTransport {
    reader: BufReader<Box<dyn SerialPort>>,
}

impl SerialTransport {
    pub fn open(port: &str, baud: u32) -> anyhow::Result<Self> {
        let handle = serialport::new(port, baud)
            .timeout(READ_TIMEOUT)
            .open()
            .with_context(|| format!("could not open serial port {port} at {baud} baud"))?;

        thread::sleep(SETTLE_DELAY);
        log::info!("connected to {port} at {baud} baud");

        Ok(Self {
            reader: BufReader::new(handle),
        })
    }

    /// Returns one raw line (terminator included) if input is pending,
    /// `None` otherwise. Never blocks longer than the read timeout, and only
    /// reads at all when the port already has buffered bytes.
    pub fn poll_line(&mut self) -> Option<Vec<u8>> {
        if self.reader.buffer().is_empty() {
            match self.reader.get_ref().bytes_to_read() {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }
        }

        let mut raw = Vec::new();
        match self.reader.read_until(b'\n', &mut raw) {
            Ok(0) => None,
            Ok(_) => Some(raw),
            Err(e) if e.kind() == ErrorKind::TimedOut => None,
            Err(e) => {
                log::warn!("serial read failed: {e}");
                None
            }
        }
    }
}
