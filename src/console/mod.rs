//! Serial debug console
//!
//! Polled from the bridge service loop - no dedicated task.
//! Zero heap allocation - all static buffers.

pub mod commands;
pub mod console;
pub mod error;
pub mod line_buffer;
pub mod parser;

pub use commands::{execute, CommandContext, MULTI_READ_MAX};
pub use console::{Console, VERSION};
pub use error::ConsoleError;
pub use line_buffer::{LineBuffer, LINE_MAX};
pub use parser::{parse_line, Command, PauseOp, Switch};
