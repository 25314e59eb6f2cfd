//! ethtool control socket
//!
//! All requests go through `SIOCETHTOOL` on an `AF_INET` datagram socket,
//! with `ifr_data` pointing at a command-tagged payload. Register access
//! uses two private command codes that a patched `lan865x` driver handles.
//! Drivers that only implement the standard register dump can still be
//! read through `ETHTOOL_GREGS`.

use crate::error::{EthtoolError, Result};

use lanreg_core::error::Error as CoreError;
use lanreg_core::{DriverInfo, DriverInfoQuery, RegisterAddress, RegisterChannel, RegisterValue};

use log::{debug, trace};
use nix::sys::socket::{socket, AddressFamily, SockFlag, SockType};
use std::os::fd::{AsRawFd, OwnedFd};

/// ethtool command codes
pub mod cmd {
    /// Get driver information (linux/ethtool.h)
    pub const ETHTOOL_GDRVINFO: u32 = 0x0000_0003;
    /// Get the driver's register dump (linux/ethtool.h)
    pub const ETHTOOL_GREGS: u32 = 0x0000_0004;
    /// Get LAN865x register (driver private)
    pub const ETHTOOL_GLANREG: u32 = 0x0000_1000;
    /// Set LAN865x register (driver private)
    pub const ETHTOOL_SLANREG: u32 = 0x0000_1001;
}

mod ioctl {
    use nix::ioctl_readwrite_bad;

    /// SIOCETHTOOL from linux/sockios.h
    pub const SIOCETHTOOL: libc::c_ulong = 0x8946;

    ioctl_readwrite_bad!(siocethtool, SIOCETHTOOL, super::IfReq);
}

/// Size of the string fields in `struct ethtool_drvinfo`
const DRVINFO_STR_LEN: usize = 32;

/// Longest interface name the kernel accepts (excluding the NUL)
const MAX_IFNAME_LEN: usize = libc::IFNAMSIZ - 1;

/// `struct ethtool_regs` header: cmd, version, len
const REGS_HEADER_WORDS: usize = 3;

/// Matches the kernel's `struct ifreq` when used with a data pointer
#[repr(C)]
pub(crate) struct IfReq {
    ifr_name: [u8; libc::IFNAMSIZ],
    ifr_data: *mut libc::c_void,
    // rest of the ifr_ifru union
    _pad: [u8; 16],
}

/// Matches `struct ethtool_drvinfo` from linux/ethtool.h
#[repr(C)]
#[allow(dead_code)]
struct EthtoolDrvInfo {
    cmd: u32,
    driver: [u8; DRVINFO_STR_LEN],
    version: [u8; DRVINFO_STR_LEN],
    fw_version: [u8; DRVINFO_STR_LEN],
    bus_info: [u8; DRVINFO_STR_LEN],
    erom_version: [u8; DRVINFO_STR_LEN],
    reserved2: [u8; 12],
    n_priv_flags: u32,
    n_stats: u32,
    testinfo_len: u32,
    eedump_len: u32,
    regdump_len: u32,
}

impl EthtoolDrvInfo {
    fn request() -> Self {
        Self {
            cmd: cmd::ETHTOOL_GDRVINFO,
            driver: [0; DRVINFO_STR_LEN],
            version: [0; DRVINFO_STR_LEN],
            fw_version: [0; DRVINFO_STR_LEN],
            bus_info: [0; DRVINFO_STR_LEN],
            erom_version: [0; DRVINFO_STR_LEN],
            reserved2: [0; 12],
            n_priv_flags: 0,
            n_stats: 0,
            testinfo_len: 0,
            eedump_len: 0,
            regdump_len: 0,
        }
    }
}

/// Register access payload shared with the driver
///
/// `{cmd, address, value}`, three native-endian u32s.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LanRegAccess {
    pub cmd: u32,
    pub address: u32,
    pub value: u32,
}

/// Register dump returned by `ETHTOOL_GREGS`
///
/// The dump is read as native-endian `{address, value}` u32 pairs. A
/// trailing partial pair is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterDump {
    /// Dump layout version reported by the driver
    pub version: u32,
    data: Vec<u8>,
}

impl RegisterDump {
    /// Wrap raw dump bytes
    pub fn new(version: u32, data: Vec<u8>) -> Self {
        Self { version, data }
    }

    /// All `(address, value)` pairs in dump order
    pub fn entries(&self) -> impl Iterator<Item = (RegisterAddress, RegisterValue)> + '_ {
        self.data.chunks_exact(8).map(|pair| {
            let (address, value) = pair.split_at(4);
            (word(address), word(value))
        })
    }

    /// Value recorded for `address`, first occurrence wins
    pub fn lookup(&self, address: RegisterAddress) -> Option<RegisterValue> {
        self.entries()
            .find(|&(a, _)| a == address)
            .map(|(_, v)| v)
    }

    /// Number of complete pairs
    pub fn len(&self) -> usize {
        self.data.len() / 8
    }

    /// True when the dump holds no complete pair
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn word(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_ne_bytes(buf)
}

/// Convert a NUL-padded C string field
fn c_string(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

/// Copy an interface name into the fixed `ifr_name` field
fn ifr_name(ifname: &str) -> Result<[u8; libc::IFNAMSIZ]> {
    let bytes = ifname.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_IFNAME_LEN || bytes.contains(&0) {
        return Err(EthtoolError::InvalidInterfaceName(ifname.to_string()));
    }

    let mut name = [0u8; libc::IFNAMSIZ];
    name[..bytes.len()].copy_from_slice(bytes);
    Ok(name)
}

/// ethtool control socket bound to one interface
pub struct EthtoolSocket {
    fd: OwnedFd,
    ifname: String,
    ifr_name: [u8; libc::IFNAMSIZ],
}

impl EthtoolSocket {
    /// Open a control socket for `ifname`
    pub fn open(ifname: &str) -> Result<Self> {
        let name = ifr_name(ifname)?;
        let fd = socket(
            AddressFamily::Inet,
            SockType::Datagram,
            SockFlag::SOCK_CLOEXEC,
            None,
        )
        .map_err(EthtoolError::Socket)?;

        debug!("ethtool: control socket open for {}", ifname);

        Ok(Self {
            fd,
            ifname: ifname.to_string(),
            ifr_name: name,
        })
    }

    /// Issue SIOCETHTOOL with `data` as ifr_data
    ///
    /// # Safety
    ///
    /// `data` must point at a live, writable buffer laid out as the kernel
    /// expects for the command code in its first word.
    unsafe fn ethtool_raw(&self, data: *mut libc::c_void) -> nix::Result<()> {
        let mut ifr = IfReq {
            ifr_name: self.ifr_name,
            ifr_data: data,
            _pad: [0; 16],
        };
        ioctl::siocethtool(self.fd.as_raw_fd(), &mut ifr)?;
        Ok(())
    }

    /// Issue SIOCETHTOOL with `payload` as ifr_data
    fn ethtool<T>(&self, payload: &mut T) -> nix::Result<()> {
        // SAFETY: payload is a live repr(C) struct whose layout matches the
        // command code it carries.
        unsafe { self.ethtool_raw((payload as *mut T).cast()) }
    }

    fn drvinfo(&self) -> Result<EthtoolDrvInfo> {
        let mut drvinfo = EthtoolDrvInfo::request();
        self.ethtool(&mut drvinfo)
            .map_err(EthtoolError::DriverInfo)?;
        Ok(drvinfo)
    }

    /// Query driver information (ETHTOOL_GDRVINFO)
    pub fn query_driver_info(&self) -> Result<DriverInfo> {
        let drvinfo = self.drvinfo()?;
        Ok(DriverInfo {
            driver: c_string(&drvinfo.driver),
            version: c_string(&drvinfo.version),
            fw_version: c_string(&drvinfo.fw_version),
            bus_info: c_string(&drvinfo.bus_info),
        })
    }

    /// Read a register (ETHTOOL_GLANREG)
    pub fn read_register(&self, address: RegisterAddress) -> Result<RegisterValue> {
        let mut access = LanRegAccess {
            cmd: cmd::ETHTOOL_GLANREG,
            address,
            value: 0,
        };
        trace!("ethtool: {:?}", access);

        self.ethtool(&mut access)
            .map_err(|source| EthtoolError::Register {
                ioctl: "ETHTOOL_GLANREG",
                source,
            })?;

        Ok(access.value)
    }

    /// Write a register (ETHTOOL_SLANREG)
    pub fn write_register(&self, address: RegisterAddress, value: RegisterValue) -> Result<()> {
        let mut access = LanRegAccess {
            cmd: cmd::ETHTOOL_SLANREG,
            address,
            value,
        };
        trace!("ethtool: {:?}", access);

        self.ethtool(&mut access)
            .map_err(|source| EthtoolError::Register {
                ioctl: "ETHTOOL_SLANREG",
                source,
            })
    }

    /// Fetch the driver's register dump (ETHTOOL_GREGS)
    ///
    /// The dump size comes from `regdump_len` in the driver info.
    pub fn read_register_dump(&self) -> Result<RegisterDump> {
        let len = self.drvinfo()?.regdump_len as usize;
        if len == 0 {
            return Err(EthtoolError::NoRegisterDump);
        }

        // u32 words keep the header aligned
        let mut buf = vec![0u32; REGS_HEADER_WORDS + len.div_ceil(4)];
        buf[0] = cmd::ETHTOOL_GREGS;
        buf[2] = len as u32;

        // SAFETY: buf holds a struct ethtool_regs header followed by at
        // least `len` bytes, and the kernel never copies more than `len`.
        unsafe { self.ethtool_raw(buf.as_mut_ptr().cast()) }
            .map_err(EthtoolError::RegisterDump)?;

        let version = buf[1];
        let returned = (buf[2] as usize).min(len);
        let mut data: Vec<u8> = buf[REGS_HEADER_WORDS..]
            .iter()
            .flat_map(|w| w.to_ne_bytes())
            .collect();
        data.truncate(returned);

        debug!(
            "ethtool: {} register dump v{} ({} bytes)",
            self.ifname, version, returned
        );
        Ok(RegisterDump::new(version, data))
    }
}

impl DriverInfoQuery for EthtoolSocket {
    fn driver_info(&mut self) -> lanreg_core::Result<DriverInfo> {
        self.query_driver_info()
            .map_err(|e| CoreError::DriverInfo {
                ifname: self.ifname.clone(),
                source: Box::new(e),
            })
    }
}

impl RegisterChannel for EthtoolSocket {
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

/// Read-only register channel backed by `ETHTOOL_GREGS`
///
/// Every read fetches a fresh dump and looks the address up in it.
pub struct RegisterDumpChannel {
    socket: EthtoolSocket,
}

impl RegisterDumpChannel {
    /// Use `socket` for dump requests
    pub fn new(socket: EthtoolSocket) -> Self {
        Self { socket }
    }

    /// Read a register from a fresh dump
    pub fn read_register(&self, address: RegisterAddress) -> Result<RegisterValue> {
        let dump = self.socket.read_register_dump()?;
        dump.lookup(address)
            .ok_or(EthtoolError::NotInDump {
                entries: dump.len(),
            })
    }
}

impl RegisterChannel for RegisterDumpChannel {
    fn read(&mut self, address: RegisterAddress) -> lanreg_core::Result<RegisterValue> {
        self.read_register(address)
            .map_err(|e| CoreError::ReadFailed {
                address,
                source: Box::new(e),
            })
    }

    fn write(&mut self, address: RegisterAddress, _value: RegisterValue) -> lanreg_core::Result<()> {
        Err(CoreError::WriteFailed {
            address,
            source: Box::new(EthtoolError::DumpReadOnly),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::errno::Errno;
    use std::mem::size_of;

    fn dump_bytes(pairs: &[(u32, u32)]) -> Vec<u8> {
        pairs
            .iter()
            .flat_map(|(a, v)| a.to_ne_bytes().into_iter().chain(v.to_ne_bytes()))
            .collect()
    }

    #[test]
    fn test_payload_layouts() {
        assert_eq!(size_of::<LanRegAccess>(), 12);
        assert_eq!(size_of::<EthtoolDrvInfo>(), 196);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(size_of::<IfReq>(), 40);
    }

    #[test]
    fn test_command_codes() {
        assert_eq!(cmd::ETHTOOL_GREGS, 4);
        assert_eq!(cmd::ETHTOOL_GLANREG, 0x1000);
        assert_eq!(cmd::ETHTOOL_SLANREG, 0x1001);
        assert_eq!(EthtoolDrvInfo::request().cmd, 3);
    }

    #[test]
    fn test_c_string() {
        let mut field = [0u8; DRVINFO_STR_LEN];
        field[..7].copy_from_slice(b"lan865x");
        assert_eq!(c_string(&field), "lan865x");
        assert_eq!(c_string(&[b'a'; 4]), "aaaa");
        assert_eq!(c_string(&[0u8; 4]), "");
    }

    #[test]
    fn test_ifr_name() {
        let name = ifr_name("eth0").unwrap();
        assert_eq!(&name[..5], b"eth0\0");

        assert!(ifr_name("").is_err());
        assert!(ifr_name("a-very-long-ifname").is_err());
        assert!(ifr_name("fifteen-chars-x").is_ok());
    }

    #[test]
    fn test_register_dump_lookup() {
        let dump = RegisterDump::new(
            1,
            dump_bytes(&[(0x10000, 0x0C), (0x10003, 0x24), (0x10003, 0xFF)]),
        );
        assert_eq!(dump.len(), 3);
        assert_eq!(dump.lookup(0x10000), Some(0x0C));
        assert_eq!(dump.lookup(0x10003), Some(0x24));
        assert_eq!(dump.lookup(0x10021), None);
    }

    #[test]
    fn test_register_dump_ignores_partial_pair() {
        let mut data = dump_bytes(&[(0x10001, 0x20)]);
        data.extend_from_slice(&0x10002u32.to_ne_bytes());
        let dump = RegisterDump::new(0, data);

        assert_eq!(dump.entries().collect::<Vec<_>>(), vec![(0x10001, 0x20)]);
        assert_eq!(dump.lookup(0x10002), None);
        assert!(RegisterDump::default().is_empty());
    }

    #[test]
    fn test_error_chain_names_interface_once() {
        let err = CoreError::DriverInfo {
            ifname: "eth0".into(),
            source: Box::new(EthtoolError::DriverInfo(Errno::ENODEV)),
        };
        let text = err.to_string();
        assert_eq!(text.matches("eth0").count(), 1);
        assert!(text.contains("ETHTOOL_GDRVINFO ioctl failed"));

        let err = CoreError::ReadFailed {
            address: 0x10000,
            source: Box::new(EthtoolError::Register {
                ioctl: "ETHTOOL_GLANREG",
                source: Errno::EOPNOTSUPP,
            }),
        };
        let text = err.to_string();
        assert_eq!(text.matches("read").count(), 1);
        assert!(text.starts_with("Register read at 0x00010000 failed: ETHTOOL_GLANREG ioctl failed"));
    }
}
