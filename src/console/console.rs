//! Console byte feed: accumulates a command line and dispatches it.

use core::fmt::Write;

use super::commands::{execute, CommandContext};
use super::error::ConsoleError;
use super::line_buffer::LineBuffer;
use super::parser::parse_line;

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// Console state: one line in flight.
pub struct Console {
    line: LineBuffer,
}

impl Console {
    /// Create new console
    pub const fn new() -> Self {
        Self {
            line: LineBuffer::new(),
        }
    }

    /// Process a single input byte.
    ///
    /// Returns Some(result) if a command line was dispatched, None if more
    /// input is needed. Empty and whitespace-only lines are dropped
    /// silently; dispatched lines are echoed back first.
    pub fn process_byte(
        &mut self,
        byte: u8,
        ctx: &mut CommandContext<'_>,
        out: &mut dyn Write,
    ) -> Option<Result<(), ConsoleError>> {
        match byte {
            b'\r' | b'\n' => {
                let result = {
                    let line = self.line.as_str();
                    if line.trim().is_empty() {
                        None
                    } else {
                        let _ = writeln!(out, "[DBG] {}", line.trim());
                        Some(parse_line(line).and_then(|cmd| execute(&cmd, ctx, out)))
                    }
                };
                self.line.clear();
                result
            }

            // Backspace
            0x7F | 0x08 => {
                self.line.backspace();
                None
            }

            // Printable character; overflow beyond the cap is dropped.
            0x20..=0x7E => {
                self.line.push(byte);
                None
            }

            _ => None,
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
