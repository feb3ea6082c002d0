//! Diagnostic log drain on a dedicated UART TX pin.
//!
//! Keeps diagnostics off the command channel. Requires an external
//! USB-UART adapter (CH340, CP2102, etc) on the drain pin.

use esp_idf_svc::hal::uart::UartTxDriver;

use crate::logging::{format_to_buffer, LogRecord, LogRing, MAX_MSG_LEN};

pub struct UartLogDrain<'d> {
    tx: UartTxDriver<'d>,
}

impl<'d> UartLogDrain<'d> {
    pub fn new(tx: UartTxDriver<'d>) -> Self {
        Self { tx }
    }

    /// Write out everything currently queued. Blocking is fine here; this
    /// runs from the idle loop, never from the command path.
    pub fn drain<const N: usize>(&mut self, ring: &LogRing<N>) {
        while let Some(record) = ring.drain() {
            let mut buf = [0u8; MAX_MSG_LEN + 32];
            let len = format_record(&record, &mut buf);
            let _ = self.tx.write(&buf[..len]);
        }
    }
}

/// Format: `[seq] LEVEL: message\n`
fn format_record(record: &LogRecord, buf: &mut [u8]) -> usize {
    format_to_buffer(
        buf,
        format_args!(
            "[{:6}] {}: {}\n",
            record.seq,
            record.level.as_str(),
            record.text()
        ),
    )
}
