//! lanreg-core - Register access core for LAN865x 10BASE-T1S MAC-PHYs
//!
//! This crate holds everything that does not depend on a particular kernel
//! interface:
//!
//! - **Discovery** ([`discovery`]): pick the network interface bound to the
//!   `lan865x` driver
//! - **Verification** ([`session`]): confirm the driver before any transfer
//! - **Transport traits** ([`channel`]): the seam between the command layer
//!   and the ethtool, debugfs or dummy backends
//! - **Fallback** ([`fallback`]): try several transports in order
//! - **Register map** ([`regs`]): names and field decoding for well-known
//!   registers
//!
//! The TC6 protocol itself lives in the kernel driver; this crate only ever
//! forwards an address and a value.
//!
//! # Example
//!
//! ```ignore
//! use lanreg_core::{AccessConfig, RegisterSession};
//!
//! let cfg = AccessConfig::default();
//! let ifname = cfg.select_interface(&transport)?;
//! let mut session = RegisterSession::open(&transport, &ifname, &cfg.driver)?;
//! let id_rev = session.read(lanreg_core::regs::ID_REV)?;
//! ```

pub mod channel;
pub mod discovery;
pub mod error;
pub mod fallback;
pub mod number;
pub mod regs;
pub mod session;

pub use channel::{DriverInfo, DriverInfoQuery, RegisterChannel, Transport};
pub use discovery::{
    find_interface, DriverResolver, InterfaceSource, SysfsNet, DEFAULT_DRIVER, INTERFACE_PATTERN,
};
pub use error::{BoxedSource, Error, ErrorKind, Result};
pub use fallback::{FallbackChannel, FallbackTransport};
pub use number::{format_hex, parse_u32, RegisterAddress, RegisterValue};
pub use session::{verify_driver, AccessConfig, RegisterSession};
