//! lanreg-dummy - In-memory LAN8651 emulator for testing
//!
//! This crate provides a complete fake [`Transport`]: an interface table for
//! discovery, driver-info answers for verification and a register file for
//! transfers. It's useful for testing and development without real hardware.

use lanreg_core::error::Error;
use lanreg_core::{
    DriverInfo, DriverInfoQuery, DriverResolver, InterfaceSource, RegisterAddress, RegisterChannel,
    RegisterValue, Result, Transport, DEFAULT_DRIVER,
};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Transport name used on the command line
pub const TRANSPORT_NAME: &str = "dummy";

/// Register contents after reset
pub const RESET_VALUES: &[(u32, u32)] = &[(0x0001_0000, 0x0000_000C)];

/// One emulated network interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DummyInterface {
    /// Interface name
    pub name: String,
    /// Bound driver, `None` for virtual interfaces
    pub driver: Option<String>,
}

impl DummyInterface {
    /// Interface bound to `driver`
    pub fn new(name: impl Into<String>, driver: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            driver: Some(driver.into()),
        }
    }

    /// Interface with no device behind it (e.g. `lo`)
    pub fn virtual_if(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            driver: None,
        }
    }
}

/// Configuration for the dummy host
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Interfaces in enumeration order
    pub interfaces: Vec<DummyInterface>,
    /// Driver version reported by driver-info
    pub version: String,
    /// Bus info reported by driver-info
    pub bus_info: String,
    /// Reject every register write
    pub reject_writes: bool,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            interfaces: vec![
                DummyInterface::virtual_if("lo"),
                DummyInterface::new("eth0", DEFAULT_DRIVER),
            ],
            version: "dummy".to_string(),
            bus_info: "spi0.0".to_string(),
            reject_writes: false,
        }
    }
}

/// A recorded register transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read(u32),
    Write(u32, u32),
}

#[derive(Debug, Default)]
struct DummyState {
    registers: BTreeMap<u32, u32>,
    accesses: Vec<Access>,
}

/// Emulated host with one or more LAN8651s
pub struct DummyHost {
    config: DummyConfig,
    state: Rc<RefCell<DummyState>>,
}

impl DummyHost {
    /// Create a host with the given configuration and reset register values
    pub fn new(config: DummyConfig) -> Self {
        let state = DummyState {
            registers: RESET_VALUES.iter().copied().collect(),
            accesses: Vec::new(),
        };
        Self {
            config,
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Create a host with default configuration (`eth0` on `lan865x`)
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Preset a register
    pub fn with_register(self, address: u32, value: u32) -> Self {
        self.state.borrow_mut().registers.insert(address, value);
        self
    }

    /// Current register value (unwritten registers read as 0)
    pub fn register(&self, address: u32) -> u32 {
        self.state
            .borrow()
            .registers
            .get(&address)
            .copied()
            .unwrap_or(0)
    }

    /// Every transfer issued so far
    pub fn accesses(&self) -> Vec<Access> {
        self.state.borrow().accesses.clone()
    }

    fn find(&self, ifname: &str) -> Result<&DummyInterface> {
        self.config
            .interfaces
            .iter()
            .find(|i| i.name == ifname)
            .ok_or_else(|| Error::TransportOpen {
                transport: TRANSPORT_NAME.to_string(),
                source: format!("{}: No such device", ifname).into(),
            })
    }

    fn port(&self, ifname: &str) -> Result<DummyPort> {
        let iface = self.find(ifname)?;
        Ok(DummyPort {
            info: DriverInfo {
                driver: iface.driver.clone().unwrap_or_default(),
                version: self.config.version.clone(),
                fw_version: String::new(),
                bus_info: self.config.bus_info.clone(),
            },
            reject_writes: self.config.reject_writes,
            state: Rc::clone(&self.state),
        })
    }
}

impl InterfaceSource for DummyHost {
    fn interfaces(&self) -> Result<Vec<String>> {
        Ok(self
            .config
            .interfaces
            .iter()
            .map(|i| i.name.clone())
            .collect())
    }
}

impl DriverResolver for DummyHost {
    fn resolve(&self, ifname: &str) -> Option<String> {
        self.find(ifname).ok().and_then(|i| i.driver.clone())
    }
}

impl Transport for DummyHost {
    fn name(&self) -> &str {
        TRANSPORT_NAME
    }

    fn interface_source(&self) -> &dyn InterfaceSource {
        self
    }

    fn driver_resolver(&self) -> &dyn DriverResolver {
        self
    }

    fn open_driver_info(&self, ifname: &str) -> Result<Box<dyn DriverInfoQuery>> {
        Ok(Box::new(self.port(ifname)?))
    }

    fn open_channel(&self, ifname: &str) -> Result<Box<dyn RegisterChannel>> {
        Ok(Box::new(self.port(ifname)?))
    }
}

/// Handle on one emulated interface
pub struct DummyPort {
    info: DriverInfo,
    reject_writes: bool,
    state: Rc<RefCell<DummyState>>,
}

impl DriverInfoQuery for DummyPort {
    fn driver_info(&mut self) -> Result<DriverInfo> {
        Ok(self.info.clone())
    }
}

impl RegisterChannel for DummyPort {
    fn read(&mut self, address: RegisterAddress) -> Result<RegisterValue> {
        let mut state = self.state.borrow_mut();
        state.accesses.push(Access::Read(address));
        Ok(state.registers.get(&address).copied().unwrap_or(0))
    }

    fn write(&mut self, address: RegisterAddress, value: RegisterValue) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.accesses.push(Access::Write(address, value));
        if self.reject_writes {
            log::debug!("dummy: rejecting write to 0x{:08X}", address);
            return Err(Error::WriteFailed {
                address,
                source: "Operation not supported".into(),
            });
        }
        state.registers.insert(address, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanreg_core::{AccessConfig, RegisterSession};

    #[test]
    fn test_discovers_eth0() {
        let host = DummyHost::new_default();
        let ifname = AccessConfig::default().select_interface(&host).unwrap();
        assert_eq!(ifname, "eth0");
    }

    #[test]
    fn test_read_write() {
        let host = DummyHost::new_default();
        let mut session = RegisterSession::open(&host, "eth0", DEFAULT_DRIVER).unwrap();

        assert_eq!(session.read(0x10000).unwrap(), 0x0C);
        session.write(0x10003, 0x24).unwrap();
        assert_eq!(session.read(0x10003).unwrap(), 0x24);

        assert_eq!(host.register(0x10003), 0x24);
        assert_eq!(
            host.accesses(),
            vec![
                Access::Read(0x10000),
                Access::Write(0x10003, 0x24),
                Access::Read(0x10003)
            ]
        );
    }

    #[test]
    fn test_rejected_write_leaves_register() {
        let host = DummyHost::new(DummyConfig {
            reject_writes: true,
            ..Default::default()
        });
        let mut session = RegisterSession::open(&host, "eth0", DEFAULT_DRIVER).unwrap();
        assert!(session.write(0x10000, 0xFF).is_err());
        assert_eq!(host.register(0x10000), 0x0C);
    }

    #[test]
    fn test_foreign_driver_is_not_accessed() {
        let host = DummyHost::new(DummyConfig {
            interfaces: vec![DummyInterface::new("eth0", "e1000e")],
            ..Default::default()
        });
        assert!(AccessConfig::default().select_interface(&host).is_err());
        assert!(RegisterSession::open(&host, "eth0", DEFAULT_DRIVER).is_err());
        assert!(host.accesses().is_empty());
    }

    #[test]
    fn test_unknown_interface() {
        let host = DummyHost::new_default();
        assert!(matches!(
            RegisterSession::open(&host, "eth9", DEFAULT_DRIVER),
            Err(Error::TransportOpen { .. })
        ));
    }
}
