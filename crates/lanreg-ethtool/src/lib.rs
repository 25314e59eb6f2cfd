//! lanreg-ethtool - ethtool private-ioctl register transport
//!
//! This crate talks to the `lan865x` driver through the standard
//! `SIOCETHTOOL` ioctl:
//!
//! - `ETHTOOL_GDRVINFO` verifies the interface's driver
//! - `ETHTOOL_GLANREG` (0x1000) / `ETHTOOL_SLANREG` (0x1001) read and write
//!   a register using a `{cmd, address, value}` payload
//!
//! The two register commands are not part of mainline ethtool. A stock
//! driver rejects them (typically with `EOPNOTSUPP`), which surfaces as a
//! transfer error rather than being retried.
//!
//! [`AccessMethod::RegisterDump`] instead reads registers out of the
//! standard `ETHTOOL_GREGS` dump (what `ethtool -d` shows). It is read-only.
//!
//! # Example
//!
//! ```no_run
//! use lanreg_ethtool::EthtoolSocket;
//!
//! let sock = EthtoolSocket::open("eth0")?;
//! let info = sock.query_driver_info()?;
//! assert_eq!(info.driver, "lan865x");
//! let id_rev = sock.read_register(0x10000)?;
//! println!("ID_REV = 0x{:08X}", id_rev);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # System Requirements
//!
//! - A `lan865x` driver patched to handle the two private commands

pub mod device;
pub mod error;

pub use device::{cmd, EthtoolSocket, LanRegAccess, RegisterDump, RegisterDumpChannel};
pub use error::{EthtoolError, Result};

use lanreg_core::error::Error as CoreError;
use lanreg_core::{
    DriverInfoQuery, DriverResolver, InterfaceSource, RegisterChannel, SysfsNet, Transport,
};

/// Transport name used in diagnostics and on the command line
pub const TRANSPORT_NAME: &str = "ethtool";

/// Name of the register-dump flavour
pub const DUMP_TRANSPORT_NAME: &str = "ethtool-dump";

/// How registers are reached once the driver is verified
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccessMethod {
    /// Private `ETHTOOL_GLANREG`/`ETHTOOL_SLANREG` commands
    #[default]
    PrivateIoctl,
    /// Lookup in the `ETHTOOL_GREGS` register dump (read-only)
    RegisterDump,
}

/// Open an ethtool socket, converting failures into core errors
pub fn open_socket(ifname: &str) -> lanreg_core::Result<EthtoolSocket> {
    EthtoolSocket::open(ifname).map_err(|e| CoreError::TransportOpen {
        transport: TRANSPORT_NAME.to_string(),
        source: Box::new(e),
    })
}

/// ethtool transport with sysfs discovery
#[derive(Debug, Clone, Default)]
pub struct EthtoolTransport {
    net: SysfsNet,
    method: AccessMethod,
}

impl EthtoolTransport {
    /// Create a transport discovering interfaces through `net`
    pub fn new(net: SysfsNet) -> Self {
        Self {
            net,
            method: AccessMethod::default(),
        }
    }

    /// Select the register access method
    pub fn with_method(mut self, method: AccessMethod) -> Self {
        self.method = method;
        self
    }
}

impl Transport for EthtoolTransport {
    fn name(&self) -> &str {
        match self.method {
            AccessMethod::PrivateIoctl => TRANSPORT_NAME,
            AccessMethod::RegisterDump => DUMP_TRANSPORT_NAME,
        }
    }

    fn interface_source(&self) -> &dyn InterfaceSource {
        &self.net
    }

    fn driver_resolver(&self) -> &dyn DriverResolver {
        &self.net
    }

    fn open_driver_info(&self, ifname: &str) -> lanreg_core::Result<Box<dyn DriverInfoQuery>> {
        Ok(Box::new(open_socket(ifname)?))
    }

    fn open_channel(&self, ifname: &str) -> lanreg_core::Result<Box<dyn RegisterChannel>> {
        let socket = open_socket(ifname)?;
        let channel: Box<dyn RegisterChannel> = match self.method {
            AccessMethod::PrivateIoctl => Box::new(socket),
            AccessMethod::RegisterDump => Box::new(RegisterDumpChannel::new(socket)),
        };
        Ok(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_names() {
        let t = EthtoolTransport::default();
        assert_eq!(t.name(), "ethtool");
        let t = t.with_method(AccessMethod::RegisterDump);
        assert_eq!(t.name(), "ethtool-dump");
    }
}
