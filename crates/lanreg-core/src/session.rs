//! Verified register access
//!
//! [`RegisterSession`] is the only way to reach a [`RegisterChannel`] from
//! the command layer, and it can only be built after the interface's driver
//! has been confirmed. A mismatch therefore never opens a channel, let alone
//! issues a transfer.

use crate::channel::{DriverInfo, DriverInfoQuery, RegisterChannel, Transport};
use crate::discovery::{find_interface, DEFAULT_DRIVER};
use crate::error::{Error, Result};
use crate::number::{format_hex, RegisterAddress, RegisterValue};
use log::{debug, info};

/// Access configuration shared by every command
#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// Driver the interface must be bound to
    pub driver: String,
    /// Use this interface instead of discovering one
    pub interface: Option<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            driver: DEFAULT_DRIVER.to_string(),
            interface: None,
        }
    }
}

impl AccessConfig {
    /// Interface named by the configuration, or the first one discovered
    pub fn select_interface<T: Transport + ?Sized>(&self, transport: &T) -> Result<String> {
        match &self.interface {
            Some(ifname) => {
                debug!("Using interface {} from command line", ifname);
                Ok(ifname.clone())
            }
            None => find_interface(
                transport.interface_source(),
                transport.driver_resolver(),
                &self.driver,
            ),
        }
    }
}

/// Confirm `ifname` is driven by exactly `expected`
pub fn verify_driver<Q>(query: &mut Q, ifname: &str, expected: &str) -> Result<DriverInfo>
where
    Q: DriverInfoQuery + ?Sized,
{
    let info = query.driver_info()?;
    debug!(
        "{}: driver='{}' version='{}' bus='{}'",
        ifname, info.driver, info.version, info.bus_info
    );

    if info.driver != expected {
        return Err(Error::DriverMismatch {
            ifname: ifname.to_string(),
            expected: expected.to_string(),
            found: info.driver,
        });
    }

    Ok(info)
}

/// Register channel on an interface whose driver has been verified
pub struct RegisterSession {
    ifname: String,
    driver: DriverInfo,
    channel: Box<dyn RegisterChannel>,
}

impl RegisterSession {
    /// Verify the driver of `ifname`, then open its register channel
    pub fn open<T: Transport + ?Sized>(
        transport: &T,
        ifname: &str,
        expected_driver: &str,
    ) -> Result<Self> {
        let mut query = transport.open_driver_info(ifname)?;
        let driver = verify_driver(query.as_mut(), ifname, expected_driver)?;
        drop(query);

        let channel = transport.open_channel(ifname)?;
        info!(
            "Opened {} register channel on {}",
            transport.name(),
            ifname
        );

        Ok(Self {
            ifname: ifname.to_string(),
            driver,
            channel,
        })
    }

    /// Verified interface name
    pub fn interface(&self) -> &str {
        &self.ifname
    }

    /// Driver info returned by verification
    pub fn driver_info(&self) -> &DriverInfo {
        &self.driver
    }

    /// Read one register
    pub fn read(&mut self, address: RegisterAddress) -> Result<RegisterValue> {
        let value = self.channel.read(address)?;
        debug!("{}: read {} -> {}", self.ifname, format_hex(address), format_hex(value));
        Ok(value)
    }

    /// Write one register
    ///
    /// Success means the driver accepted the request; nothing is read back.
    pub fn write(&mut self, address: RegisterAddress, value: RegisterValue) -> Result<()> {
        self.channel.write(address, value)?;
        debug!("{}: wrote {} <- {}", self.ifname, format_hex(address), format_hex(value));
        Ok(())
    }
}
