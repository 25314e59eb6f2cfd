//! Transport traits
//!
//! A transport is split into two capabilities:
//! - [`DriverInfoQuery`] reports which kernel driver owns an interface
//! - [`RegisterChannel`] moves one register value to or from the chip
//!
//! Both are bound to a single interface when opened. [`Transport`] ties
//! them together with interface discovery so the command layer never needs
//! to know which backend it is talking to.

use crate::discovery::{DriverResolver, InterfaceSource};
use crate::error::Result;
use crate::number::{RegisterAddress, RegisterValue};

/// Driver identity reported for an interface
///
/// Mirrors the string fields of the kernel's `struct ethtool_drvinfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverInfo {
    /// Driver name (e.g. "lan865x")
    pub driver: String,
    /// Driver version string
    pub version: String,
    /// Firmware version string
    pub fw_version: String,
    /// Bus address of the device (e.g. "spi0.0")
    pub bus_info: String,
}

impl DriverInfo {
    /// Create a driver info record carrying only the driver name
    pub fn new(driver: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            ..Default::default()
        }
    }
}

/// Driver identity query, bound to one interface
pub trait DriverInfoQuery {
    /// Query the driver bound to the interface
    fn driver_info(&mut self) -> Result<DriverInfo>;
}

/// Single register read/write, bound to one interface
///
/// A successful `write` means the driver accepted the request. It does not
/// imply the value was read back.
pub trait RegisterChannel {
    /// Read a register
    fn read(&mut self, address: RegisterAddress) -> Result<RegisterValue>;

    /// Write a register
    fn write(&mut self, address: RegisterAddress, value: RegisterValue) -> Result<()>;
}

/// A complete register access backend
pub trait Transport {
    /// Transport name, used in diagnostics
    fn name(&self) -> &str;

    /// Network-device listing used for discovery
    fn interface_source(&self) -> &dyn InterfaceSource;

    /// Interface-to-driver resolution used for discovery
    fn driver_resolver(&self) -> &dyn DriverResolver;

    /// Open a driver-info query for `ifname`
    fn open_driver_info(&self, ifname: &str) -> Result<Box<dyn DriverInfoQuery>>;

    /// Open a register channel for `ifname`
    ///
    /// Only called after the driver has been verified.
    fn open_channel(&self, ifname: &str) -> Result<Box<dyn RegisterChannel>>;
}
