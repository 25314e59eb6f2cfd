//! Interface discovery
//!
//! Finds the network interface bound to the MAC-PHY driver. The search
//! itself is OS independent and works on two capabilities:
//! - [`InterfaceSource`] lists interface names in enumeration order
//! - [`DriverResolver`] maps an interface name to its driver module
//!
//! [`SysfsNet`] implements both on Linux using `/proc/net/dev` and the
//! `device/driver/module` symlink under `/sys/class/net`.

use crate::error::{Error, Result};
use log::{debug, trace};
use std::path::{Path, PathBuf};

/// Interface names must contain this to be considered
pub const INTERFACE_PATTERN: &str = "eth";

/// Kernel driver serving LAN8650/8651 chips
pub const DEFAULT_DRIVER: &str = "lan865x";

/// Network-device listing
pub trait InterfaceSource {
    /// All interface names, in enumeration order
    fn interfaces(&self) -> Result<Vec<String>>;
}

/// Interface-to-driver resolution
pub trait DriverResolver {
    /// Name of the driver module bound to `ifname`, if any
    fn resolve(&self, ifname: &str) -> Option<String>;
}

/// Find the first interface bound to `driver`
///
/// Candidates must contain [`INTERFACE_PATTERN`] and resolve to a driver
/// whose name contains `driver`. Ties go to enumeration order.
pub fn find_interface<S, R>(source: &S, resolver: &R, driver: &str) -> Result<String>
where
    S: InterfaceSource + ?Sized,
    R: DriverResolver + ?Sized,
{
    for ifname in source.interfaces()? {
        if !ifname.contains(INTERFACE_PATTERN) {
            trace!("Skipping {}: name does not match '{}'", ifname, INTERFACE_PATTERN);
            continue;
        }

        match resolver.resolve(&ifname) {
            Some(module) if module.contains(driver) => {
                debug!("Found {} bound to {}", ifname, module);
                return Ok(ifname);
            }
            Some(module) => debug!("Skipping {}: bound to {}", ifname, module),
            None => debug!("Skipping {}: no driver link", ifname),
        }
    }

    Err(Error::NoInterface)
}

/// Linux procfs/sysfs discovery backend
#[derive(Debug, Clone)]
pub struct SysfsNet {
    procfs_root: PathBuf,
    sysfs_root: PathBuf,
}

impl Default for SysfsNet {
    fn default() -> Self {
        Self::new("/proc", "/sys")
    }
}

impl SysfsNet {
    /// Create a backend rooted at the given procfs and sysfs mount points
    pub fn new(procfs_root: impl Into<PathBuf>, sysfs_root: impl Into<PathBuf>) -> Self {
        Self {
            procfs_root: procfs_root.into(),
            sysfs_root: sysfs_root.into(),
        }
    }

    /// sysfs directory of the device behind `ifname`
    pub fn device_dir(&self, ifname: &str) -> PathBuf {
        self.sysfs_root
            .join("class/net")
            .join(ifname)
            .join("device")
    }
}

/// Parse the interface names out of `/proc/net/dev` content
///
/// The first two lines are column headers. Every other line is
/// `<name>: <counters...>` with the name right-aligned.
pub fn parse_proc_net_dev(content: &str) -> Vec<String> {
    content
        .lines()
        .skip(2)
        .filter_map(|line| line.split_once(':'))
        .map(|(name, _)| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Last path component of a symlink target
fn link_name(path: &Path) -> Option<String> {
    let target = std::fs::read_link(path).ok()?;
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| target.to_string_lossy().into_owned());
    Some(name)
}

impl InterfaceSource for SysfsNet {
    fn interfaces(&self) -> Result<Vec<String>> {
        let path = self.procfs_root.join("net/dev");
        let content =
            std::fs::read_to_string(&path).map_err(|source| Error::InterfaceList {
                path: path.clone(),
                source,
            })?;
        Ok(parse_proc_net_dev(&content))
    }
}

impl DriverResolver for SysfsNet {
    fn resolve(&self, ifname: &str) -> Option<String> {
        let device = self.device_dir(ifname);

        // Built-in drivers have no module link; fall back to the driver itself
        link_name(&device.join("driver/module")).or_else(|| link_name(&device.join("driver")))
    }
}
