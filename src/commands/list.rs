//! List commands implementation

use crate::transports::available_transports;
use lanreg_core::regs::KNOWN_REGISTERS;
use std::io::Write;

/// List the registers that can be named on the command line
pub fn list_registers(out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "Known LAN8651 registers:")?;
    writeln!(out)?;
    for reg in KNOWN_REGISTERS {
        writeln!(
            out,
            "  0x{:08x} - {:<12} - {}",
            reg.address, reg.name, reg.description
        )?;
    }
    Ok(())
}

/// List transports compiled into this binary
pub fn list_transports(out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "Supported transports:")?;
    writeln!(out)?;
    for t in available_transports() {
        let name = if t.aliases.is_empty() {
            t.name.to_string()
        } else {
            format!("{} ({})", t.name, t.aliases.join(", "))
        };
        writeln!(out, "  {:<18} - {}", name, t.description)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_registers() {
        let mut out = Vec::new();
        list_registers(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("  0x00010000 - ID_REV       - "));
        assert!(text.contains("  0x00010003 - CONFIG0      - "));
        assert_eq!(
            text.lines().filter(|l| l.starts_with("  0x")).count(),
            KNOWN_REGISTERS.len()
        );
    }

    #[cfg(feature = "ethtool")]
    #[test]
    fn test_list_transports_shows_aliases() {
        let mut out = Vec::new();
        list_transports(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("  ethtool (ioctl)"));
    }
}
