//! Write command implementation

use lanreg_core::{format_hex, AccessConfig, Transport};
use std::io::Write;

/// Run the write command
///
/// "OK" means the driver accepted the request. The register is not read
/// back, so a driver that silently drops the write still reports success.
pub fn run_write(
    transport: &dyn Transport,
    cfg: &AccessConfig,
    address: u32,
    value: u32,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = super::connect(transport, cfg, out)?;
    session.write(address, value)?;

    writeln!(
        out,
        "WRITE {} = {} - OK",
        format_hex(address),
        format_hex(value)
    )?;

    Ok(())
}
