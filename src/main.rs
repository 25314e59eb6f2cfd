//! lanreg - LAN865x 10BASE-T1S MAC-PHY register access
//!
//! Reads or writes one register of a LAN8651 through the running `lan865x`
//! network driver.
//!
//! # Architecture
//!
//! Every register command goes through the same steps, whatever the
//! transport:
//! - **Discovery** - the first interface whose name contains `eth` and whose
//!   sysfs driver link names `lan865x` is selected (or `--interface`)
//! - **Verification** - `ETHTOOL_GDRVINFO` must report exactly `lan865x`
//!   before any register transfer is issued
//! - **Transfer** - one read or write over the chosen transport (ethtool
//!   private ioctls, a debugfs register file, or the in-memory dummy)

mod cli;
mod commands;
mod transports;

use clap::Parser;
use cli::{Cli, Commands};
use lanreg_core::ErrorKind;
use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(cli.verbose);

    let stdout = std::io::stdout();
    let result = run(cli, &mut stdout.lock());
    ExitCode::from(report(result, &mut std::io::stderr()))
}

/// Initialize the logger
///
/// Only warnings are shown by default so stdout carries nothing but the
/// command output. `RUST_LOG` still overrides.
fn init_logging(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Info);
        }
        2 => {
            builder.filter_level(log::LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
        }
    }
    builder.init();
}

fn run(cli: Cli, out: &mut dyn Write) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::List => return Ok(commands::list_registers(out)?),
        Commands::ListTransports => return Ok(commands::list_transports(out)?),
        _ => {}
    }

    let cfg = cli.access_config();
    let transport = transports::open_transport(&cli.transport, cli.sysfs_net())?;
    log::info!("Using {} transport", transport.name());

    match cli.command {
        Commands::Read { address, decode } => {
            commands::run_read(transport.as_ref(), &cfg, address, decode, out)
        }
        Commands::Write { address, value } => {
            commands::run_write(transport.as_ref(), &cfg, address, value, out)
        }
        Commands::Info => commands::run_info(transport.as_ref(), &cfg, out),
        Commands::List | Commands::ListTransports => Ok(()),
    }
}

/// Print a failure to `err` and turn the outcome into an exit status
fn report(result: Result<(), Box<dyn std::error::Error>>, err: &mut dyn Write) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            let _ = writeln!(err, "{}", e);
            if let Some(hint) = hint(e.as_ref()) {
                let _ = writeln!(err, "hint: {}", hint);
            }
            1
        }
    }
}

/// Follow-up advice for errors the user can act on
fn hint(e: &(dyn std::error::Error + 'static)) -> Option<&'static str> {
    match e.downcast_ref::<lanreg_core::Error>()?.kind() {
        ErrorKind::DriverMismatch => Some(
            "pass --driver to expect a different driver, or --interface to pick another device",
        ),
        ErrorKind::Transfer => Some(
            "register access needs driver support; `lanreg list-transports` shows other methods",
        ),
        ErrorKind::Usage | ErrorKind::Discovery => None,
    }
}
