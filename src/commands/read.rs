//! Read command implementation

use lanreg_core::{format_hex, regs, AccessConfig, Transport};
use std::io::Write;

/// Run the read command
pub fn run_read(
    transport: &dyn Transport,
    cfg: &AccessConfig,
    address: u32,
    decode: bool,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = super::connect(transport, cfg, out)?;
    let value = session.read(address)?;

    writeln!(
        out,
        "READ {} = {} ({})",
        format_hex(address),
        format_hex(value),
        value
    )?;

    if decode {
        writeln!(out)?;
        for line in regs::decode(address, value) {
            writeln!(out, "{}", line)?;
        }
    }

    Ok(())
}
