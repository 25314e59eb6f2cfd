//! Ordered fallback across transports
//!
//! [`FallbackTransport`] chains several transports for one interface. The
//! first transport handles discovery and driver verification. Every
//! transport that can open a channel joins a [`FallbackChannel`], which
//! tries each channel in order until one succeeds.

use crate::channel::{DriverInfoQuery, RegisterChannel, Transport};
use crate::discovery::{DriverResolver, InterfaceSource};
use crate::error::{Error, Result};
use crate::number::{RegisterAddress, RegisterValue};
use log::{debug, info};

/// Transport name of the chain
pub const FALLBACK_NAME: &str = "auto";

/// Several transports tried in order
pub struct FallbackTransport {
    primary: Box<dyn Transport>,
    fallbacks: Vec<Box<dyn Transport>>,
}

impl FallbackTransport {
    /// Start a chain; `primary` also does discovery and verification
    pub fn new(primary: Box<dyn Transport>) -> Self {
        Self {
            primary,
            fallbacks: Vec::new(),
        }
    }

    /// Append a transport to try after the ones already in the chain
    pub fn or_else(mut self, next: Box<dyn Transport>) -> Self {
        self.fallbacks.push(next);
        self
    }

    /// Transport names in the order they are tried
    pub fn names(&self) -> Vec<&str> {
        self.members().map(|t| t.name()).collect()
    }

    fn members(&self) -> impl Iterator<Item = &Box<dyn Transport>> {
        std::iter::once(&self.primary).chain(self.fallbacks.iter())
    }
}

impl Transport for FallbackTransport {
    fn name(&self) -> &str {
        FALLBACK_NAME
    }

    fn interface_source(&self) -> &dyn InterfaceSource {
        self.primary.interface_source()
    }

    fn driver_resolver(&self) -> &dyn DriverResolver {
        self.primary.driver_resolver()
    }

    fn open_driver_info(&self, ifname: &str) -> Result<Box<dyn DriverInfoQuery>> {
        self.primary.open_driver_info(ifname)
    }

    fn open_channel(&self, ifname: &str) -> Result<Box<dyn RegisterChannel>> {
        let mut channels = Vec::new();
        let mut unavailable = Vec::new();

        for transport in self.members() {
            match transport.open_channel(ifname) {
                Ok(channel) => channels.push((transport.name().to_string(), channel)),
                Err(e) => {
                    debug!("{}: {} unavailable: {}", ifname, transport.name(), e);
                    unavailable.push(format!("{}: {}", transport.name(), e));
                }
            }
        }

        if channels.is_empty() {
            return Err(Error::TransportOpen {
                transport: FALLBACK_NAME.to_string(),
                source: format!("no access method available ({})", unavailable.join("; ")).into(),
            });
        }

        Ok(Box::new(FallbackChannel { channels }))
    }
}

/// Register channels tried in order
pub struct FallbackChannel {
    channels: Vec<(String, Box<dyn RegisterChannel>)>,
}

impl FallbackChannel {
    /// Build a chain from named channels
    pub fn new(channels: Vec<(String, Box<dyn RegisterChannel>)>) -> Self {
        Self { channels }
    }
}

impl RegisterChannel for FallbackChannel {
    fn read(&mut self, address: RegisterAddress) -> Result<RegisterValue> {
        let mut failures = Vec::new();
        for (name, channel) in &mut self.channels {
            match channel.read(address) {
                Ok(value) => {
                    info!("Read via {}", name);
                    return Ok(value);
                }
                Err(e) => {
                    debug!("{} read failed: {}", name, e);
                    failures.push(format!("{}: {}", name, e));
                }
            }
        }
        Err(Error::AllMethodsFailed {
            op: "read",
            address,
            failures,
        })
    }

    fn write(&mut self, address: RegisterAddress, value: RegisterValue) -> Result<()> {
        let mut failures = Vec::new();
        for (name, channel) in &mut self.channels {
            match channel.write(address, value) {
                Ok(()) => {
                    info!("Wrote via {}", name);
                    return Ok(());
                }
                Err(e) => {
                    debug!("{} write failed: {}", name, e);
                    failures.push(format!("{}: {}", name, e));
                }
            }
        }
        Err(Error::AllMethodsFailed {
            op: "write",
            address,
            failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::DriverInfo;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    /// Channel that answers `value` or fails, recording each attempt
    struct Scripted {
        name: &'static str,
        value: Option<u32>,
        log: Log,
    }

    impl RegisterChannel for Scripted {
        fn read(&mut self, address: u32) -> Result<u32> {
            self.log.borrow_mut().push(self.name);
            self.value.ok_or_else(|| Error::ReadFailed {
                address,
                source: "Operation not supported".into(),
            })
        }

        fn write(&mut self, address: u32, _value: u32) -> Result<()> {
            self.log.borrow_mut().push(self.name);
            match self.value {
                Some(_) => Ok(()),
                None => Err(Error::WriteFailed {
                    address,
                    source: "Operation not supported".into(),
                }),
            }
        }
    }

    /// Transport whose channel either opens as `Scripted` or not at all
    struct Method {
        name: &'static str,
        opens: bool,
        value: Option<u32>,
        log: Log,
    }

    impl InterfaceSource for Method {
        fn interfaces(&self) -> Result<Vec<String>> {
            Ok(vec![format!("eth-{}", self.name)])
        }
    }

    impl DriverResolver for Method {
        fn resolve(&self, _ifname: &str) -> Option<String> {
            Some("lan865x".to_string())
        }
    }

    struct Query(&'static str);

    impl DriverInfoQuery for Query {
        fn driver_info(&mut self) -> Result<DriverInfo> {
            Ok(DriverInfo::new(self.0))
        }
    }

    impl Transport for Method {
        fn name(&self) -> &str {
            self.name
        }

        fn interface_source(&self) -> &dyn InterfaceSource {
            self
        }

        fn driver_resolver(&self) -> &dyn DriverResolver {
            self
        }

        fn open_driver_info(&self, _ifname: &str) -> Result<Box<dyn DriverInfoQuery>> {
            Ok(Box::new(Query(self.name)))
        }

        fn open_channel(&self, _ifname: &str) -> Result<Box<dyn RegisterChannel>> {
            if !self.opens {
                return Err(Error::TransportOpen {
                    transport: self.name.to_string(),
                    source: "No such file or directory".into(),
                });
            }
            Ok(Box::new(Scripted {
                name: self.name,
                value: self.value,
                log: self.log.clone(),
            }))
        }
    }

    fn method(
        name: &'static str,
        opens: bool,
        value: Option<u32>,
        log: &Log,
    ) -> Box<dyn Transport> {
        Box::new(Method {
            name,
            opens,
            value,
            log: log.clone(),
        })
    }

    #[test]
    fn test_first_working_method_answers() {
        let log = Log::default();
        let chain = FallbackTransport::new(method("debugfs", false, None, &log))
            .or_else(method("sysfs", true, None, &log))
            .or_else(method("ethtool", true, Some(0x0C), &log))
            .or_else(method("ethtool-dump", true, Some(0xFF), &log));

        assert_eq!(chain.names(), vec!["debugfs", "sysfs", "ethtool", "ethtool-dump"]);

        let mut channel = chain.open_channel("eth0").unwrap();
        assert_eq!(channel.read(0x10000).unwrap(), 0x0C);
        assert_eq!(*log.borrow(), vec!["sysfs", "ethtool"]);
    }

    #[test]
    fn test_primary_does_discovery_and_verification() {
        let log = Log::default();
        let chain = FallbackTransport::new(method("debugfs", false, None, &log))
            .or_else(method("ethtool", true, Some(1), &log));

        assert_eq!(chain.name(), "auto");
        assert_eq!(
            chain.interface_source().interfaces().unwrap(),
            vec!["eth-debugfs"]
        );
        let info = chain.open_driver_info("eth0").unwrap().driver_info().unwrap();
        assert_eq!(info.driver, "debugfs");
    }

    #[test]
    fn test_all_methods_fail() {
        let log = Log::default();
        let chain = FallbackTransport::new(method("sysfs", true, None, &log))
            .or_else(method("ethtool", true, None, &log));

        let mut channel = chain.open_channel("eth0").unwrap();
        let err = channel.write(0x10003, 0x24).unwrap_err();
        match err {
            Error::AllMethodsFailed { op, failures, .. } => {
                assert_eq!(op, "write");
                assert_eq!(failures.len(), 2);
                assert!(failures[0].starts_with("sysfs: "));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nothing_opens() {
        let log = Log::default();
        let chain = FallbackTransport::new(method("debugfs", false, None, &log))
            .or_else(method("sysfs", false, None, &log));

        assert!(matches!(
            chain.open_channel("eth0"),
            Err(Error::TransportOpen { .. })
        ));
    }
}
