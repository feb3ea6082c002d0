//! Console error types

/// Command parse/dispatch error.
///
/// Every variant renders as a single `ERR:` response line; none of them
/// stop the command loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// First character selects no known command.
    UnknownCommand,
    /// Required fields missing; payload is the expected form.
    BadFormat(&'static str),
    /// A field did not parse as hexadecimal.
    BadHex,
}

impl ConsoleError {
    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "Unknown command (H for help)",
            Self::BadFormat(usage) => usage,
            Self::BadHex => "bad hex field",
        }
    }
}

impl core::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}
