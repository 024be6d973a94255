//! Controller command and reply model
//!
//! Every request to the management controller is a fixed-shape message:
//!
//! ```text
//! [family] [opcode] [bus] [addr] [register] [value]
//! ```
//!
//! - `family`: protocol family identifier, constant for this platform
//! - `opcode`: operation code (read / write / diagnostic probe)
//! - `bus`: controller-side bus the target device answers on
//! - `addr`: 7-bit device address
//! - `register`: register within the device
//! - `value`: write data; for reads and probes the byte is carried but unused
//!
//! Replies lead with a status byte. A status of [`STATUS_NOT_PRESENT`] means
//! the controller itself answered but the addressed sub-device is not
//! installed, which callers treat differently from an outright failure.

/// Protocol family identifier carried in every wire message.
pub const PROTOCOL_FAMILY: u8 = 0x38;

/// Reply status for a completed exchange with no error.
pub const STATUS_OK: u8 = 0x00;

/// Reply status marking the addressed sub-device as not installed.
pub const STATUS_NOT_PRESENT: u8 = 0xC1;

/// Operation requested from the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Read one register byte.
    Read,
    /// Write one register byte.
    Write,
    /// Diagnostic probe: like a read, but also used to distinguish
    /// "controller not installed" from "controller present but failing".
    Diagnostic,
}

impl Operation {
    /// Wire opcode for this operation.
    pub fn opcode(&self) -> u8 {
        match self {
            Operation::Read => 0x02,
            Operation::Write => 0x03,
            Operation::Diagnostic => 0x1A,
        }
    }
}

/// One register operation addressed to a device behind the controller.
///
/// Immutable once built; a command is sent exactly once per attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    /// Controller-side bus identifier
    pub bus: u8,
    /// 7-bit device address
    pub addr: u8,
    /// Register within the device
    pub register: u8,
    /// Write data (unused for reads and probes)
    pub value: u8,
    /// Requested operation
    pub operation: Operation,
}

impl Command {
    /// Build a register read.
    pub fn read(bus: u8, addr: u8, register: u8) -> Self {
        Self {
            bus,
            addr,
            register,
            value: 0,
            operation: Operation::Read,
        }
    }

    /// Build a register write.
    pub fn write(bus: u8, addr: u8, register: u8, value: u8) -> Self {
        Self {
            bus,
            addr,
            register,
            value,
            operation: Operation::Write,
        }
    }

    /// Build a diagnostic probe of a device.
    pub fn probe(bus: u8, addr: u8, register: u8) -> Self {
        Self {
            bus,
            addr,
            register,
            value: 0,
            operation: Operation::Diagnostic,
        }
    }

    /// Frame this command for the management link.
    pub fn to_wire(&self) -> WireMessage {
        WireMessage {
            family: PROTOCOL_FAMILY,
            opcode: self.operation.opcode(),
            payload: [self.bus, self.addr, self.register, self.value],
        }
    }
}

/// A framed request as handed to the management link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireMessage {
    /// Protocol family identifier
    pub family: u8,
    /// Operation code
    pub opcode: u8,
    /// `[bus, addr, register, value]`
    pub payload: [u8; 4],
}

impl WireMessage {
    /// Target bus carried in the payload.
    pub fn bus(&self) -> u8 {
        self.payload[0]
    }

    /// Target device address carried in the payload.
    pub fn addr(&self) -> u8 {
        self.payload[1]
    }

    /// Target register carried in the payload.
    pub fn register(&self) -> u8 {
        self.payload[2]
    }

    /// Write data carried in the payload.
    pub fn value(&self) -> u8 {
        self.payload[3]
    }

    /// Whether this message carries a write opcode.
    pub fn is_write(&self) -> bool {
        self.opcode == Operation::Write.opcode()
    }
}

/// Reply to one exchange: a status byte and a data byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    /// Leading status byte
    pub status: u8,
    /// Data byte (meaningful for reads and probes)
    pub value: u8,
}

impl Reply {
    /// A successful reply carrying `value`.
    pub fn ok(value: u8) -> Self {
        Self {
            status: STATUS_OK,
            value,
        }
    }

    /// A reply marking the addressed sub-device as not installed.
    pub fn not_present() -> Self {
        Self {
            status: STATUS_NOT_PRESENT,
            value: 0,
        }
    }

    /// A reply with a controller-reported error status.
    pub fn failed(status: u8) -> Self {
        Self { status, value: 0 }
    }

    /// Whether the status marks the sub-device as not installed.
    pub fn is_not_present(&self) -> bool {
        self.status == STATUS_NOT_PRESENT
    }

    /// Whether the exchange completed without a controller-reported error.
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}
