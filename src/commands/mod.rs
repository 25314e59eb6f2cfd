//! CLI command implementations
//!
//! Register commands work against any [`Transport`]. They all follow the
//! same path: select the interface, announce it, verify the driver, then do
//! at most one transfer.
//!
//! Output goes to a caller-supplied writer so the exact stdout contract can
//! be tested against the dummy transport.

mod info;
mod list;
mod read;
mod write;

pub use info::run_info;
pub use list::{list_registers, list_transports};
pub use read::run_read;
pub use write::run_write;

use lanreg_core::{AccessConfig, RegisterSession, Transport};
use std::io::Write;

/// Select and announce the interface, then verify its driver
fn connect(
    transport: &dyn Transport,
    cfg: &AccessConfig,
    out: &mut dyn Write,
) -> Result<RegisterSession, Box<dyn std::error::Error>> {
    let ifname = cfg.select_interface(transport)?;
    writeln!(out, "Using interface: {}", ifname)?;
    Ok(RegisterSession::open(transport, &ifname, &cfg.driver)?)
}
