//! lanreg-debugfs - text-command register file transports
//!
//! Some driver builds expose register access as a text file instead of
//! ethtool commands, either in debugfs or as a `registers` attribute of the
//! SPI device in sysfs. This crate writes a one-line command to that file and
//! reads the reply back.
//!
//! Driver verification still uses `ETHTOOL_GDRVINFO` from `lanreg-ethtool`,
//! which every network driver answers, so the register file is only touched
//! after the interface is known to belong to `lan865x`.
//!
//! # Usage with lanreg CLI
//!
//! ```bash
//! # Probe /sys/kernel/debug/{tc6,lan865x,spi}
//! lanreg -t debugfs read 0x10000
//!
//! # /sys/class/net/<if>/device/spi*/registers
//! lanreg -t sysfs read 0x10000
//!
//! # Explicit register file (or directory containing `registers`)
//! lanreg -t debugfs:path=/sys/kernel/debug/lan865x/spi0.0 write 0x10000 0x0C
//! ```
//!
//! # System Requirements
//!
//! - debugfs mounted: `mount -t debugfs none /sys/kernel/debug`
//! - A `lan865x` driver exposing a `registers` file

pub mod device;
pub mod error;

pub use device::{
    locate, locate_attribute, parse_response, RegisterFile, DEBUGFS_ROOT, PROBE_DIRS,
};
pub use error::{DebugfsError, Result};

use lanreg_core::error::Error as CoreError;
use lanreg_core::{
    DriverInfoQuery, DriverResolver, InterfaceSource, RegisterChannel, SysfsNet, Transport,
};
use std::path::PathBuf;

/// Transport name used in diagnostics and on the command line
pub const TRANSPORT_NAME: &str = "debugfs";

/// Name of the sysfs attribute transport
pub const SYSFS_TRANSPORT_NAME: &str = "sysfs";

/// debugfs transport with sysfs discovery and ethtool verification
#[derive(Debug, Clone)]
pub struct DebugfsTransport {
    net: SysfsNet,
    path: Option<PathBuf>,
    debugfs_root: PathBuf,
}

impl DebugfsTransport {
    /// Create a transport; `path` overrides register file probing
    pub fn new(net: SysfsNet, path: Option<PathBuf>) -> Self {
        Self {
            net,
            path,
            debugfs_root: PathBuf::from(DEBUGFS_ROOT),
        }
    }

    /// Probe under a different debugfs mount point
    pub fn with_debugfs_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.debugfs_root = root.into();
        self
    }
}

impl Transport for DebugfsTransport {
    fn name(&self) -> &str {
        TRANSPORT_NAME
    }

    fn interface_source(&self) -> &dyn InterfaceSource {
        &self.net
    }

    fn driver_resolver(&self) -> &dyn DriverResolver {
        &self.net
    }

    fn open_driver_info(&self, ifname: &str) -> lanreg_core::Result<Box<dyn DriverInfoQuery>> {
        Ok(Box::new(lanreg_ethtool::open_socket(ifname)?))
    }

    fn open_channel(&self, _ifname: &str) -> lanreg_core::Result<Box<dyn RegisterChannel>> {
        let path = locate(self.path.as_deref(), &self.debugfs_root).map_err(|e| {
            CoreError::TransportOpen {
                transport: TRANSPORT_NAME.to_string(),
                source: Box::new(e),
            }
        })?;
        Ok(Box::new(RegisterFile::new(path)))
    }
}

/// sysfs `registers` attribute transport
///
/// The register file is looked up below the verified interface's device,
/// so each interface gets its own file.
#[derive(Debug, Clone, Default)]
pub struct SysfsAttrTransport {
    net: SysfsNet,
}

impl SysfsAttrTransport {
    /// Create a transport rooted at `net`'s sysfs mount
    pub fn new(net: SysfsNet) -> Self {
        Self { net }
    }
}

impl Transport for SysfsAttrTransport {
    fn name(&self) -> &str {
        SYSFS_TRANSPORT_NAME
    }

    fn interface_source(&self) -> &dyn InterfaceSource {
        &self.net
    }

    fn driver_resolver(&self) -> &dyn DriverResolver {
        &self.net
    }

    fn open_driver_info(&self, ifname: &str) -> lanreg_core::Result<Box<dyn DriverInfoQuery>> {
        Ok(Box::new(lanreg_ethtool::open_socket(ifname)?))
    }

    fn open_channel(&self, ifname: &str) -> lanreg_core::Result<Box<dyn RegisterChannel>> {
        let path = locate_attribute(&self.net.device_dir(ifname)).map_err(|e| {
            CoreError::TransportOpen {
                transport: SYSFS_TRANSPORT_NAME.to_string(),
                source: Box::new(e),
            }
        })?;
        Ok(Box::new(RegisterFile::new(path)))
    }
}
