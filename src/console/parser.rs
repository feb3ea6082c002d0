//! Command line parser
//!
//! The first non-whitespace character selects the command kind,
//! case-insensitively; the rest of the line is whitespace-separated
//! hexadecimal fields. Malformed hex is rejected rather than defaulted.

use super::error::ConsoleError;

/// `[1|0]` style argument. Anything else (including nothing) is a status
/// query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
    Show,
}

/// Pause command argument: `1`/`0` set the state, a bare `P` toggles, an
/// unrecognized argument reports status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOp {
    Pause,
    Resume,
    Toggle,
    Show,
}

/// A parsed command, valid for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Write { addr: u16, data: u8 },
    Read { addr: u16 },
    MultiRead { addr: u16, count: u8 },
    Dump,
    Jtag(Switch),
    Pause(PauseOp),
    Continue,
    Breakpoints(Switch),
    Help,
}

/// Parse one trimmed command line.
pub fn parse_line(line: &str) -> Result<Command, ConsoleError> {
    let line = line.trim();
    let mut chars = line.chars();
    let kind = match chars.next() {
        Some(c) => c.to_ascii_uppercase(),
        None => return Err(ConsoleError::UnknownCommand),
    };
    let mut fields = chars.as_str().split_whitespace();

    match kind {
        'W' => {
            const USAGE: &str = "W AAAA DD";
            let addr = hex16(fields.next().ok_or(ConsoleError::BadFormat(USAGE))?)?;
            let data = hex8(fields.next().ok_or(ConsoleError::BadFormat(USAGE))?)?;
            Ok(Command::Write { addr, data })
        }
        'R' => {
            let addr = hex16(fields.next().ok_or(ConsoleError::BadFormat("R AAAA"))?)?;
            Ok(Command::Read { addr })
        }
        'M' => {
            const USAGE: &str = "M AAAA NN";
            let addr = hex16(fields.next().ok_or(ConsoleError::BadFormat(USAGE))?)?;
            let count = hex8(fields.next().ok_or(ConsoleError::BadFormat(USAGE))?)?;
            Ok(Command::MultiRead { addr, count })
        }
        'D' => Ok(Command::Dump),
        'J' => Ok(Command::Jtag(switch_arg(fields.next()))),
        'P' => Ok(Command::Pause(match fields.next() {
            Some("1") => PauseOp::Pause,
            Some("0") => PauseOp::Resume,
            Some(_) => PauseOp::Show,
            None => PauseOp::Toggle,
        })),
        'C' => Ok(Command::Continue),
        'B' => Ok(Command::Breakpoints(switch_arg(fields.next()))),
        'H' | '?' => Ok(Command::Help),
        _ => Err(ConsoleError::UnknownCommand),
    }
}

fn switch_arg(field: Option<&str>) -> Switch {
    match field {
        Some("1") => Switch::On,
        Some("0") => Switch::Off,
        _ => Switch::Show,
    }
}

fn hex16(field: &str) -> Result<u16, ConsoleError> {
    u16::from_str_radix(field, 16).map_err(|_| ConsoleError::BadHex)
}

fn hex8(field: &str) -> Result<u8, ConsoleError> {
    u8::from_str_radix(field, 16).map_err(|_| ConsoleError::BadHex)
}
