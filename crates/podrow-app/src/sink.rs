//! Host sink that prints each outbound command as one JSON line.

use std::io::Write;

use serde::Serialize;

use podrow_types::{HostCommand, HostSink};

pub struct JsonLines<W: Write> {
    out: W,
}

impl<W: Write> JsonLines<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Write `value` as a single JSON line and flush.
    pub fn write_line<T: Serialize>(&mut self, value: &T) -> podrow_types::Result<()> {
        serde_json::to_writer(&mut self.out, value)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> HostSink for JsonLines<W> {
    fn send(&mut self, command: HostCommand) {
        if let Err(e) = self.write_line(&command) {
            log::error!("Failed to write host command {}: {e}", command.name());
        }
    }
}
