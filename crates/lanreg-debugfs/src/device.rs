//! Text register files
//!
//! A patched driver exposes a `registers` file, either in debugfs or as a
//! sysfs attribute of its SPI device. Commands are written as a single text
//! line and the result is read back from the same file:
//!
//! ```text
//! read 0x00010000            -> "0x0000000c" or "0x00010000 = 0x0000000c"
//! write 0x00010000 0x0000000c
//! ```

use crate::error::{DebugfsError, Result};

use lanreg_core::error::Error as CoreError;
use lanreg_core::{parse_u32, RegisterAddress, RegisterChannel, RegisterValue};

use log::{debug, trace};
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Default debugfs mount point
pub const DEBUGFS_ROOT: &str = "/sys/kernel/debug";

/// Driver directories probed under the debugfs root, in order
pub const PROBE_DIRS: &[&str] = &["tc6", "lan865x", "spi"];

/// Prefix of SPI device directories below a network device
pub const SPI_DEVICE_PREFIX: &str = "spi";

/// Register file name inside a driver directory
pub const REGISTERS_FILE: &str = "registers";

/// Find the register file
///
/// An explicit `path` may name the file itself or a directory holding it.
/// Without one, each of [`PROBE_DIRS`] under `debugfs_root` is tried.
pub fn locate(path: Option<&Path>, debugfs_root: &Path) -> Result<PathBuf> {
    let candidates: Vec<PathBuf> = match path {
        Some(p) if p.is_dir() => vec![p.join(REGISTERS_FILE)],
        Some(p) => vec![p.to_path_buf()],
        None => PROBE_DIRS
            .iter()
            .map(|d| debugfs_root.join(d).join(REGISTERS_FILE))
            .collect(),
    };

    for candidate in &candidates {
        trace!("debugfs: trying {}", candidate.display());
        if candidate.is_file() {
            debug!("debugfs: using {}", candidate.display());
            return Ok(candidate.clone());
        }
    }

    Err(DebugfsError::NotFound {
        searched: candidates,
    })
}

/// Find the `registers` attribute below a network device's sysfs directory
///
/// Looks at `<device_dir>/spi*/registers`; the lexically first match wins.
pub fn locate_attribute(device_dir: &Path) -> Result<PathBuf> {
    let pattern = device_dir
        .join(format!("{}*", SPI_DEVICE_PREFIX))
        .join(REGISTERS_FILE);
    let not_found = || DebugfsError::NotFound {
        searched: vec![pattern.clone()],
    };

    let entries = match std::fs::read_dir(device_dir) {
        Ok(entries) => entries,
        Err(e) => {
            trace!("sysfs: cannot list {}: {}", device_dir.display(), e);
            return Err(not_found());
        }
    };

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with(SPI_DEVICE_PREFIX)
        })
        .map(|entry| entry.path().join(REGISTERS_FILE))
        .filter(|path| path.is_file())
        .collect();
    candidates.sort();

    match candidates.into_iter().next() {
        Some(path) => {
            debug!("sysfs: using {}", path.display());
            Ok(path)
        }
        None => Err(not_found()),
    }
}

/// Text command for a register read
pub fn read_command(address: u32) -> String {
    format!("read 0x{:08x}\n", address)
}

/// Text command for a register write
pub fn write_command(address: u32, value: u32) -> String {
    format!("write 0x{:08x} 0x{:08x}\n", address, value)
}

/// Extract the value from a read response
///
/// Uses the last non-empty line. If it contains `=`, the first token after
/// the last `=` is the value; otherwise the first token of the line is.
pub fn parse_response(response: &str) -> Option<u32> {
    let line = response.lines().rev().find(|l| !l.trim().is_empty())?;
    let tail = match line.rsplit_once('=') {
        Some((_, rhs)) => rhs,
        None => line,
    };
    let token = tail.split_whitespace().next()?;
    parse_u32(token).ok()
}

/// Register channel backed by a text register file
#[derive(Debug, Clone)]
pub struct RegisterFile {
    path: PathBuf,
}

impl RegisterFile {
    /// Use the register file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> DebugfsError {
        DebugfsError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn send(&self, command: &str) -> Result<()> {
        trace!("debugfs: > {}", command.trim_end());
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.write_all(command.as_bytes())
            .map_err(|e| self.io_error(e))
    }

    fn receive(&self) -> Result<String> {
        let mut response = String::new();
        OpenOptions::new()
            .read(true)
            .open(&self.path)
            .and_then(|mut f| f.read_to_string(&mut response))
            .map_err(|e| self.io_error(e))?;
        trace!("debugfs: < {}", response.trim_end());
        Ok(response)
    }

    /// Read a register
    pub fn read_register(&self, address: RegisterAddress) -> Result<RegisterValue> {
        self.send(&read_command(address))?;
        let response = self.receive()?;
        parse_response(&response).ok_or_else(|| DebugfsError::BadResponse {
            path: self.path.clone(),
            response: response.trim().to_string(),
        })
    }

    /// Write a register
    pub fn write_register(&self, address: RegisterAddress, value: RegisterValue) -> Result<()> {
        self.send(&write_command(address, value))
    }
}

impl RegisterChannel for RegisterFile {
    fn read(&mut self, address: RegisterAddress) -> lanreg_core::Result<RegisterValue> {
        self.read_register(address)
            .map_err(|e| CoreError::ReadFailed {
                address,
                source: Box::new(e),
            })
    }

    fn write(&mut self, address: RegisterAddress, value: RegisterValue) -> lanreg_core::Result<()> {
        self.write_register(address, value)
            .map_err(|e| CoreError::WriteFailed {
                address,
                source: Box::new(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scratch directory under the system temp dir, removed on drop
    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new(tag: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "lanreg-debugfs-{}-{}",
                tag,
                std::process::id()
            ));
            let _ = std::fs::remove_dir_all(&path);
            std::fs::create_dir_all(&path).unwrap();
            Self(path)
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_commands() {
        assert_eq!(read_command(0x10000), "read 0x00010000\n");
        assert_eq!(write_command(0x10000, 0x0C), "write 0x00010000 0x0000000c\n");
    }

    #[test]
    fn test_parse_response() {
        assert_eq!(parse_response("0x0000000c\n"), Some(0x0C));
        assert_eq!(parse_response("12"), Some(12));
        assert_eq!(parse_response("0x00010000 = 0x0000000c\n"), Some(0x0C));
        assert_eq!(
            parse_response("READ 0x00010000 = 0x0000000C (12)\n\n"),
            Some(0x0C)
        );
        assert_eq!(parse_response("header\nreg=0x5"), Some(5));
        assert_eq!(parse_response(""), None);
        assert_eq!(parse_response("error: -EIO"), None);
    }

    fn touch_registers(dir: &Path) -> PathBuf {
        std::fs::create_dir_all(dir).unwrap();
        let file = dir.join(REGISTERS_FILE);
        std::fs::write(&file, "").unwrap();
        file
    }

    #[test]
    fn test_locate_probes_in_order() {
        let root = ScratchDir::new("probe");

        let spi = touch_registers(&root.0.join("spi"));
        assert_eq!(locate(None, &root.0).unwrap(), spi);

        let lan865x = touch_registers(&root.0.join("lan865x"));
        assert_eq!(locate(None, &root.0).unwrap(), lan865x);

        let tc6 = touch_registers(&root.0.join("tc6"));
        assert_eq!(locate(None, &root.0).unwrap(), tc6);
    }

    #[test]
    fn test_locate_attribute() {
        let root = ScratchDir::new("attr");
        let device = root.0.join("device");
        std::fs::create_dir_all(device.join("driver")).unwrap();
        std::fs::create_dir_all(device.join("spi0.1")).unwrap();

        assert!(matches!(
            locate_attribute(&device),
            Err(DebugfsError::NotFound { .. })
        ));

        let second = touch_registers(&device.join("spi1.0"));
        assert_eq!(locate_attribute(&device).unwrap(), second);

        let first = touch_registers(&device.join("spi0.0"));
        assert_eq!(locate_attribute(&device).unwrap(), first);
    }

    #[test]
    fn test_locate_attribute_without_device() {
        let root = ScratchDir::new("nodevice");
        let err = locate_attribute(&root.0.join("missing")).unwrap_err();
        assert!(err.to_string().contains("spi*"));
    }

    #[test]
    fn test_locate_explicit_dir_and_file() {
        let root = ScratchDir::new("explicit");
        let file = root.0.join(REGISTERS_FILE);
        std::fs::write(&file, "").unwrap();

        assert_eq!(locate(Some(&root.0), Path::new("/nonexistent")).unwrap(), file);
        assert_eq!(locate(Some(&file), Path::new("/nonexistent")).unwrap(), file);
    }

    #[test]
    fn test_locate_not_found() {
        let root = ScratchDir::new("missing");
        let err = locate(None, &root.0).unwrap_err();
        match err {
            DebugfsError::NotFound { searched } => assert_eq!(searched.len(), PROBE_DIRS.len()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_write_sends_command() {
        let root = ScratchDir::new("write");
        let file = root.0.join(REGISTERS_FILE);
        std::fs::write(&file, "stale content that is longer than the command\n").unwrap();

        let mut channel = RegisterFile::new(&file);
        channel.write(0x10003, 0x24).unwrap();

        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "write 0x00010003 0x00000024\n"
        );
    }

    #[test]
    fn test_read_without_driver_reply_is_rejected() {
        // A plain file echoes the command back, which carries no value
        let root = ScratchDir::new("echo");
        let file = root.0.join(REGISTERS_FILE);
        std::fs::write(&file, "").unwrap();

        let err = RegisterFile::new(&file).read_register(0x10000).unwrap_err();
        assert!(matches!(err, DebugfsError::BadResponse { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let root = ScratchDir::new("nofile");
        let mut channel = RegisterFile::new(root.0.join(REGISTERS_FILE));
        let err = channel.read(0x10000).unwrap_err();
        assert!(matches!(err, CoreError::ReadFailed { address: 0x10000, .. }));
    }
}
