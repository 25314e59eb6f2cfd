//! Error types for ethtool ioctl operations
//!
//! Messages name the ioctl and the errno only. The interface and register
//! address are added by the core error that wraps these.

use nix::errno::Errno;
use thiserror::Error;

/// ethtool transport errors
#[derive(Debug, Error)]
pub enum EthtoolError {
    /// Interface name does not fit in `struct ifreq`
    #[error("Interface name '{0}' is empty or longer than 15 bytes")]
    InvalidInterfaceName(String),

    /// Control socket could not be created
    #[error("Failed to create control socket: {0}")]
    Socket(#[source] Errno),

    /// ETHTOOL_GDRVINFO failed
    #[error("ETHTOOL_GDRVINFO ioctl failed: {0}")]
    DriverInfo(#[source] Errno),

    /// Private register ioctl failed, usually because the driver lacks the extension
    #[error("{ioctl} ioctl failed (driver extension needed): {source}")]
    Register {
        ioctl: &'static str,
        #[source]
        source: Errno,
    },

    /// ETHTOOL_GREGS failed
    #[error("ETHTOOL_GREGS ioctl failed: {0}")]
    RegisterDump(#[source] Errno),

    /// Driver reports a zero-length register dump
    #[error("Driver does not provide a register dump")]
    NoRegisterDump,

    /// Requested address is not part of the register dump
    #[error("Register not present in the {entries}-entry register dump")]
    NotInDump { entries: usize },

    /// Register dumps cannot be written
    #[error("Register dump is read-only")]
    DumpReadOnly,
}

/// Result type for ethtool operations
pub type Result<T> = std::result::Result<T, EthtoolError>;
