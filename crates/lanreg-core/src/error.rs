//! Error types for lanreg-core
//!
//! Every failure that can end an invocation is represented here. Transport
//! crates keep their own error enums and convert into [`Error`] at the
//! [`RegisterChannel`](crate::channel::RegisterChannel) and
//! [`DriverInfoQuery`](crate::channel::DriverInfoQuery) seams.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed error from a transport backend
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing command-line input
    Usage,
    /// No interface bound to the expected driver
    Discovery,
    /// Interface reports a different driver than expected
    DriverMismatch,
    /// Transport setup, driver-info query or register transfer failed
    Transfer,
}

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Input is not a valid 32-bit number
    #[error("Invalid number '{input}': {reason}")]
    InvalidNumber { input: String, reason: String },

    /// Input is neither a number nor a known register name
    #[error("Unknown register '{0}' (use a number or a name from `lanreg list`)")]
    UnknownRegister(String),

    /// No network interface is bound to the expected driver
    #[error("No LAN8651 interface found")]
    NoInterface,

    /// The OS network-device listing could not be read
    #[error("Cannot list network interfaces from {}: {source}", .path.display())]
    InterfaceList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Driver-info query reported an unexpected driver
    #[error("Interface {ifname} is not using {expected} driver (reports '{found}')")]
    DriverMismatch {
        ifname: String,
        expected: String,
        found: String,
    },

    /// Driver-info query itself failed
    #[error("Driver info query on {ifname} failed: {source}")]
    DriverInfo {
        ifname: String,
        #[source]
        source: BoxedSource,
    },

    /// Transport could not be opened
    #[error("Failed to open {transport} transport: {source}")]
    TransportOpen {
        transport: String,
        #[source]
        source: BoxedSource,
    },

    /// Register read failed
    #[error("Register read at 0x{address:08X} failed: {source}")]
    ReadFailed {
        address: u32,
        #[source]
        source: BoxedSource,
    },

    /// Register write failed
    #[error("Register write at 0x{address:08X} failed: {source}")]
    WriteFailed {
        address: u32,
        #[source]
        source: BoxedSource,
    },

    /// Every access method of a fallback chain failed
    #[error(
        "All {op} methods failed at 0x{address:08X}, kernel driver extension needed ({})",
        .failures.join("; ")
    )]
    AllMethodsFailed {
        op: &'static str,
        address: u32,
        failures: Vec<String>,
    },
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidNumber { .. } | Self::UnknownRegister(_) => ErrorKind::Usage,
            Self::NoInterface | Self::InterfaceList { .. } => ErrorKind::Discovery,
            Self::DriverMismatch { .. } => ErrorKind::DriverMismatch,
            Self::DriverInfo { .. }
            | Self::TransportOpen { .. }
            | Self::ReadFailed { .. }
            | Self::WriteFailed { .. }
            | Self::AllMethodsFailed { .. } => ErrorKind::Transfer,
        }
    }
}

/// Result type for lanreg-core operations
pub type Result<T> = std::result::Result<T, Error>;
