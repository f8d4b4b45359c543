//! Installer error types.

use std::fmt;

/// Error raised by any step of the install sequence.
///
/// The message is the exact human-readable reason interpolated into the
/// terminal "Install halted because: ..." / "Fatal error, exiting: ..."
/// lines, so constructors format it fully.
#[derive(Debug)]
pub struct InstallError {
    message: String,
    kind: ErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// User declined an advisory prompt, or requested an orderly stop
    Halted,
    /// External command exited non-zero
    Command,
    /// Required command is not resolvable on the search path
    MissingCommand,
    /// Environment record exists but is malformed
    Config,
    /// External command exceeded its time budget
    Timeout,
    /// Another install holds the installation-directory lock
    Locked,
    /// File system or terminal error
    Io,
}

impl InstallError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Graceful stop requested by the user; not a failure.
    pub fn halted(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Halted, reason)
    }

    /// External command exited with a non-zero code.
    pub fn command(label: &str, code: i32) -> Self {
        Self::new(
            ErrorKind::Command,
            format!("'{}' returned error code {}", label, code),
        )
    }

    /// Required command could not be found on the search path.
    pub fn missing_command(name: &str) -> Self {
        Self::new(
            ErrorKind::MissingCommand,
            format!("The '{}' command is not available.", name),
        )
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// External command ran past the step time budget and was killed.
    pub fn timeout(label: &str, budget_secs: u64) -> Self {
        Self::new(
            ErrorKind::Timeout,
            format!("'{}' exceeded its {} second time budget", label, budget_secs),
        )
    }

    pub fn locked(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Locked, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Whether this error is a graceful halt rather than a fatal failure.
    pub fn is_halt(&self) -> bool {
        self.kind == ErrorKind::Halted
    }
}

impl fmt::Display for InstallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for InstallError {}

impl From<std::io::Error> for InstallError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, InstallError>;
