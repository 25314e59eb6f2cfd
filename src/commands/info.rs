//! Info command implementation

use lanreg_core::{AccessConfig, Transport};
use std::io::Write;

/// Show the selected interface and what its driver reports
///
/// Goes through the same verification as a register access but issues no
/// transfer.
pub fn run_info(
    transport: &dyn Transport,
    cfg: &AccessConfig,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = super::connect(transport, cfg, out)?;
    let info = session.driver_info();

    writeln!(out)?;
    writeln!(out, "Transport:   {}", transport.name())?;
    writeln!(out, "Driver:      {}", info.driver)?;
    writeln!(out, "Version:     {}", or_dash(&info.version))?;
    writeln!(out, "Firmware:    {}", or_dash(&info.fw_version))?;
    writeln!(out, "Bus info:    {}", or_dash(&info.bus_info))?;

    Ok(())
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanreg_dummy::DummyHost;

    #[test]
    fn test_info_output() {
        let host = DummyHost::new_default();
        let mut out = Vec::new();

        run_info(&host, &AccessConfig::default(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Using interface: eth0\n"));
        assert!(text.contains("Transport:   dummy\n"));
        assert!(text.contains("Driver:      lan865x\n"));
        assert!(text.contains("Firmware:    -\n"));
        assert!(text.contains("Bus info:    spi0.0\n"));
        assert!(host.accesses().is_empty());
    }
}
