//! Known LAN8651 registers and field decoding
//!
//! The transfer path never interprets addresses; this table only feeds the
//! `list` command, register-name lookup and `read --decode`.

use bitflags::bitflags;

/// A register with a well-known name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownRegister {
    /// Register address
    pub address: u32,
    /// Short register name
    pub name: &'static str,
    /// Human readable description
    pub description: &'static str,
}

pub const ID_REV: u32 = 0x0001_0000;
pub const STATUS0: u32 = 0x0001_0001;
pub const STATUS1: u32 = 0x0001_0002;
pub const CONFIG0: u32 = 0x0001_0003;
pub const CONFIG1: u32 = 0x0001_0004;
pub const CONFIG2: u32 = 0x0001_0005;
pub const CONFIG3: u32 = 0x0001_0006;
pub const CONFIG4: u32 = 0x0001_0007;
pub const FIFO_SIZE: u32 = 0x0001_0020;
pub const CHUNK_SIZE: u32 = 0x0001_0021;

/// All registers known by name, in address order
pub const KNOWN_REGISTERS: &[KnownRegister] = &[
    KnownRegister {
        address: ID_REV,
        name: "ID_REV",
        description: "Chip and Revision ID",
    },
    KnownRegister {
        address: STATUS0,
        name: "STATUS0",
        description: "Status Register 0",
    },
    KnownRegister {
        address: STATUS1,
        name: "STATUS1",
        description: "Status Register 1",
    },
    KnownRegister {
        address: CONFIG0,
        name: "CONFIG0",
        description: "Configuration Register 0",
    },
    KnownRegister {
        address: CONFIG1,
        name: "CONFIG1",
        description: "Configuration Register 1",
    },
    KnownRegister {
        address: CONFIG2,
        name: "CONFIG2",
        description: "Configuration Register 2",
    },
    KnownRegister {
        address: CONFIG3,
        name: "CONFIG3",
        description: "Configuration Register 3",
    },
    KnownRegister {
        address: CONFIG4,
        name: "CONFIG4",
        description: "Configuration Register 4",
    },
    KnownRegister {
        address: FIFO_SIZE,
        name: "FIFO_SIZE",
        description: "FIFO Size Configuration",
    },
    KnownRegister {
        address: CHUNK_SIZE,
        name: "CHUNK_SIZE",
        description: "Chunk Size Configuration",
    },
];

bitflags! {
    /// STATUS0 error bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status0: u32 {
        const TX_FRAME_CHECK_SEQUENCE_ERROR = 1 << 0;
        const TX_FRAME_ERROR = 1 << 1;
        const TX_BUFFER_OVERFLOW_ERROR = 1 << 2;
        const TX_FIFO_UNDERFLOW = 1 << 3;
        const RX_FIFO_OVERFLOW = 1 << 4;
        const RX_HEADER_ERROR = 1 << 5;
    }
}

bitflags! {
    /// CONFIG0 control bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Config0: u32 {
        const PROTECTED = 1 << 2;
        const TX_CUT_THROUGH = 1 << 4;
        const RX_CUT_THROUGH = 1 << 5;
    }
}

/// Look up a register by address
pub fn lookup(address: u32) -> Option<&'static KnownRegister> {
    KNOWN_REGISTERS.iter().find(|r| r.address == address)
}

/// Look up a register by name (case-insensitive)
pub fn lookup_name(name: &str) -> Option<&'static KnownRegister> {
    KNOWN_REGISTERS
        .iter()
        .find(|r| r.name.eq_ignore_ascii_case(name))
}

/// Per-bit report for a flags register, every defined bit listed as 0 or 1
fn flag_lines<F>(value: F) -> Vec<String>
where
    F: bitflags::Flags<Bits = u32> + Copy,
{
    F::FLAGS
        .iter()
        .map(|flag| {
            let set = value.contains(*flag.value());
            format!("{}: {}", flag.name(), u8::from(set))
        })
        .collect()
}

/// Decode a register value into human readable lines
///
/// The first line is always the binary form. A name line and field lines
/// follow for registers in [`KNOWN_REGISTERS`].
pub fn decode(address: u32, value: u32) -> Vec<String> {
    let mut lines = vec![format!("Binary: {:032b}", value)];

    let Some(reg) = lookup(address) else {
        return lines;
    };
    lines.push(format!("Name: {}", reg.name));

    match address {
        ID_REV => {
            let chip_id = (value >> 16) & 0xFFFF;
            let rev_id = value & 0xFFFF;
            lines.push(format!(
                "Chip ID: 0x{:04x}, Revision: 0x{:04x}",
                chip_id, rev_id
            ));
        }
        STATUS0 => lines.extend(flag_lines(Status0::from_bits_retain(value))),
        CONFIG0 => lines.extend(flag_lines(Config0::from_bits_retain(value))),
        _ => {}
    }

    lines
}
