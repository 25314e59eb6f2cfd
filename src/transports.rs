//! Transport registration and dispatch
//!
//! This module provides a centralized registry for all transports, with
//! support for feature-gated inclusion, and turns a `-t` string into an
//! opened [`Transport`].

use lanreg_core::{SysfsNet, Transport};
use std::collections::HashMap;

/// Information about a transport
pub struct TransportInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Get information about all available transports (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_transports() -> Vec<TransportInfo> {
    let mut transports = Vec::new();

    #[cfg(feature = "ethtool")]
    transports.push(TransportInfo {
        name: "ethtool",
        aliases: &["ioctl"],
        description: "ethtool private ioctls ETHTOOL_GLANREG/SLANREG (needs patched driver)",
    });

    #[cfg(feature = "ethtool")]
    transports.push(TransportInfo {
        name: "ethtool-dump",
        aliases: &["gregs"],
        description: "ETHTOOL_GREGS register dump lookup (read-only)",
    });

    #[cfg(feature = "debugfs")]
    transports.push(TransportInfo {
        name: "debugfs",
        aliases: &[],
        description: "debugfs register file (path=<file|dir>,root=<debugfs mount>)",
    });

    #[cfg(feature = "debugfs")]
    transports.push(TransportInfo {
        name: "sysfs",
        aliases: &[],
        description: "SPI device attribute /sys/class/net/<if>/device/spi*/registers",
    });

    #[cfg(all(feature = "ethtool", feature = "debugfs"))]
    transports.push(TransportInfo {
        name: "auto",
        aliases: &[],
        description: "Try debugfs, sysfs, ethtool, ethtool-dump in order (root=<debugfs mount>)",
    });

    #[cfg(feature = "dummy")]
    transports.push(TransportInfo {
        name: "dummy",
        aliases: &[],
        description: "In-memory LAN8651 emulator (ifname=<name>,driver=<name>,readonly=1)",
    });

    transports
}

/// Parsed transport parameters
pub struct TransportParams {
    /// Transport name (as given)
    pub name: String,
    /// Key-value parameters
    pub params: HashMap<String, String>,
}

/// Parse a transport string into name and parameters
///
/// Format: "name" or "name:key1=value1,key2=value2"
///
/// # Example
/// ```ignore
/// let params = parse_transport_params("debugfs:path=/sys/kernel/debug/lan865x")?;
/// assert_eq!(params.name, "debugfs");
/// assert_eq!(params.params.get("path"), Some(&"/sys/kernel/debug/lan865x".to_string()));
/// ```
pub fn parse_transport_params(s: &str) -> Result<TransportParams, Box<dyn std::error::Error>> {
    let (name, opts_str) = s.split_once(':').unwrap_or((s, ""));

    let mut params = HashMap::new();
    if !opts_str.is_empty() {
        for opt in opts_str.split(',') {
            if let Some((key, value)) = opt.split_once('=') {
                params.insert(key.to_string(), value.to_string());
            } else {
                return Err(
                    format!("Invalid parameter format: '{}' (expected key=value)", opt).into(),
                );
            }
        }
    }

    Ok(TransportParams {
        name: name.to_string(),
        params,
    })
}

/// Open a transport
///
/// # Arguments
/// * `name` - Transport string (e.g., "ethtool" or "debugfs:path=/sys/kernel/debug/tc6")
/// * `net` - Discovery backend for the kernel transports
pub fn open_transport(
    name: &str,
    net: SysfsNet,
) -> Result<Box<dyn Transport>, Box<dyn std::error::Error>> {
    let params = parse_transport_params(name)?;
    log::debug!("Opening transport {}", params.name);

    match params.name.as_str() {
        #[cfg(feature = "ethtool")]
        "ethtool" | "ioctl" => {
            open_ethtool(&params, net, lanreg_ethtool::AccessMethod::PrivateIoctl)
        }

        #[cfg(feature = "ethtool")]
        "ethtool-dump" | "gregs" => {
            open_ethtool(&params, net, lanreg_ethtool::AccessMethod::RegisterDump)
        }

        #[cfg(feature = "debugfs")]
        "debugfs" => open_debugfs(&params, net),

        #[cfg(feature = "debugfs")]
        "sysfs" => open_sysfs(&params, net),

        #[cfg(all(feature = "ethtool", feature = "debugfs"))]
        "auto" => open_auto(&params, net),

        #[cfg(feature = "dummy")]
        "dummy" => open_dummy(&params),

        _ => Err(format!("Unknown transport: {}", params.name).into()),
    }
}

/// Warn about parameters a transport does not understand
fn warn_unknown(params: &TransportParams, known: &[&str]) {
    for (key, value) in &params.params {
        if !known.contains(&key.as_str()) {
            log::warn!("Unknown {} option: {}={}", params.name, key, value);
        }
    }
}

#[cfg(feature = "ethtool")]
fn open_ethtool(
    params: &TransportParams,
    net: SysfsNet,
    method: lanreg_ethtool::AccessMethod,
) -> Result<Box<dyn Transport>, Box<dyn std::error::Error>> {
    warn_unknown(params, &[]);
    Ok(Box::new(
        lanreg_ethtool::EthtoolTransport::new(net).with_method(method),
    ))
}

#[cfg(feature = "debugfs")]
fn open_debugfs(
    params: &TransportParams,
    net: SysfsNet,
) -> Result<Box<dyn Transport>, Box<dyn std::error::Error>> {
    use std::path::PathBuf;

    warn_unknown(params, &["path", "root"]);

    let path = params.params.get("path").map(PathBuf::from);
    let mut transport = lanreg_debugfs::DebugfsTransport::new(net, path);
    if let Some(root) = params.params.get("root") {
        transport = transport.with_debugfs_root(root);
    }
    Ok(Box::new(transport))
}

#[cfg(feature = "debugfs")]
fn open_sysfs(
    params: &TransportParams,
    net: SysfsNet,
) -> Result<Box<dyn Transport>, Box<dyn std::error::Error>> {
    warn_unknown(params, &[]);
    Ok(Box::new(lanreg_debugfs::SysfsAttrTransport::new(net)))
}

#[cfg(all(feature = "ethtool", feature = "debugfs"))]
fn open_auto(
    params: &TransportParams,
    net: SysfsNet,
) -> Result<Box<dyn Transport>, Box<dyn std::error::Error>> {
    use lanreg_core::FallbackTransport;
    use lanreg_ethtool::{AccessMethod, EthtoolTransport};

    warn_unknown(params, &["root"]);

    let mut debugfs = lanreg_debugfs::DebugfsTransport::new(net.clone(), None);
    if let Some(root) = params.params.get("root") {
        debugfs = debugfs.with_debugfs_root(root);
    }

    let chain = FallbackTransport::new(Box::new(debugfs))
        .or_else(Box::new(lanreg_debugfs::SysfsAttrTransport::new(net.clone())))
        .or_else(Box::new(EthtoolTransport::new(net.clone())))
        .or_else(Box::new(
            EthtoolTransport::new(net).with_method(AccessMethod::RegisterDump),
        ));
    log::debug!("auto: trying {}", chain.names().join(", "));
    Ok(Box::new(chain))
}

#[cfg(feature = "dummy")]
fn open_dummy(params: &TransportParams) -> Result<Box<dyn Transport>, Box<dyn std::error::Error>> {
    use lanreg_dummy::{DummyConfig, DummyHost, DummyInterface};

    warn_unknown(params, &["ifname", "driver", "readonly"]);

    let ifname = params.params.get("ifname").map_or("eth0", String::as_str);
    let driver = params
        .params
        .get("driver")
        .map_or(lanreg_core::DEFAULT_DRIVER, String::as_str);
    let reject_writes = match params.params.get("readonly").map(String::as_str) {
        None | Some("0") | Some("false") => false,
        Some("1") | Some("true") => true,
        Some(other) => return Err(format!("Invalid readonly value: '{}'", other).into()),
    };

    let config = DummyConfig {
        interfaces: vec![
            DummyInterface::virtual_if("lo"),
            DummyInterface::new(ifname, driver),
        ],
        reject_writes,
        ..Default::default()
    };
    Ok(Box::new(DummyHost::new(config)))
}
