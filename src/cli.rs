//! CLI argument parsing

use clap::{Parser, Subcommand};
use lanreg_core::{parse_u32, regs, AccessConfig, SysfsNet, DEFAULT_DRIVER};
use std::path::PathBuf;

/// Parse a register address: a known register name, hex or decimal
fn parse_address(s: &str) -> Result<u32, String> {
    if let Some(reg) = regs::lookup_name(s) {
        return Ok(reg.address);
    }
    parse_u32(s).map_err(|e| e.to_string())
}

/// Parse a register value as hex or decimal
fn parse_value(s: &str) -> Result<u32, String> {
    parse_u32(s).map_err(|e| e.to_string())
}

#[derive(Parser, Debug)]
#[command(name = "lanreg")]
#[command(author, version, about = "LAN865x 10BASE-T1S MAC-PHY register access", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Transport to use [available: ethtool, ethtool-dump, debugfs[:path=<file|dir>,root=<dir>],
    /// sysfs, auto[:root=<dir>], dummy[:ifname=<name>,driver=<name>,readonly=1]]
    #[arg(short, long, global = true, default_value = "ethtool")]
    pub transport: String,

    /// Use this interface instead of searching for one (driver is still verified)
    #[arg(short, long, global = true)]
    pub interface: Option<String>,

    /// Kernel driver the interface must be bound to
    #[arg(long, global = true, default_value = DEFAULT_DRIVER)]
    pub driver: String,

    /// procfs mount point used for interface listing
    #[arg(long, global = true, default_value = "/proc")]
    pub procfs_root: PathBuf,

    /// sysfs mount point used for driver resolution
    #[arg(long, global = true, default_value = "/sys")]
    pub sysfs_root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Interface selection and driver verification settings
    pub fn access_config(&self) -> AccessConfig {
        AccessConfig {
            driver: self.driver.clone(),
            interface: self.interface.clone(),
        }
    }

    /// Discovery backend rooted at the configured mount points
    pub fn sysfs_net(&self) -> SysfsNet {
        SysfsNet::new(&self.procfs_root, &self.sysfs_root)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read a register
    Read {
        /// Register address (hex, decimal or a name from `list`, e.g. 0x10000)
        #[arg(value_parser = parse_address)]
        address: u32,

        /// Decode the value (binary form and known register fields)
        #[arg(long)]
        decode: bool,
    },

    /// Write a register
    Write {
        /// Register address (hex, decimal or a name from `list`)
        #[arg(value_parser = parse_address)]
        address: u32,

        /// Value to write (hex or decimal, e.g. 0x0C)
        #[arg(value_parser = parse_value)]
        value: u32,
    },

    /// Show the interface and driver information without touching registers
    Info,

    /// List known LAN8651 registers
    List,

    /// List supported transports
    ListTransports,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_args() {
        let cli = Cli::try_parse_from(["lanreg", "read", "0x10000"]).unwrap();
        assert_eq!(cli.transport, "ethtool");
        assert_eq!(cli.driver, "lan865x");
        assert!(matches!(
            cli.command,
            Commands::Read {
                address: 0x10000,
                decode: false
            }
        ));
    }

    #[test]
    fn test_write_args() {
        let cli = Cli::try_parse_from(["lanreg", "write", "65536", "0x0C"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Write {
                address: 0x10000,
                value: 0x0C
            }
        ));
    }

    #[test]
    fn test_register_name_as_address() {
        let cli = Cli::try_parse_from(["lanreg", "read", "config0", "--decode"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Read {
                address: regs::CONFIG0,
                decode: true
            }
        ));
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli =
            Cli::try_parse_from(["lanreg", "read", "0x10000", "-t", "dummy", "-i", "eth1"])
                .unwrap();
        assert_eq!(cli.transport, "dummy");
        assert_eq!(cli.access_config().interface.as_deref(), Some("eth1"));
    }

    #[test]
    fn test_usage_errors() {
        assert!(Cli::try_parse_from(["lanreg"]).is_err());
        assert!(Cli::try_parse_from(["lanreg", "read"]).is_err());
        assert!(Cli::try_parse_from(["lanreg", "read", "0xZZ"]).is_err());
        assert!(Cli::try_parse_from(["lanreg", "write", "0x10000"]).is_err());
        assert!(Cli::try_parse_from(["lanreg", "write", "0x10000", "NOT_A_VALUE"]).is_err());
        assert!(Cli::try_parse_from(["lanreg", "erase", "0x10000"]).is_err());
    }
}
