//! Simulated local-bus register file

use std::collections::HashMap;
use std::io;
use std::sync::Mutex;

use swb_protocol::RegisterClient;

/// An in-memory [`RegisterClient`] for devices on the local bus.
///
/// Reads of untouched registers return 0, matching a blank PLD image.
#[derive(Debug, Default)]
pub struct SimRegisterFile {
    registers: Mutex<HashMap<(u8, u8, u8), u8>>,
    fail_reads: Mutex<bool>,
}

impl SimRegisterFile {
    /// Create an empty register file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload a register value.
    pub fn set(&self, bus: u8, addr: u8, register: u8, value: u8) {
        self.registers
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .insert((bus, addr, register), value);
    }

    /// Current value of a register, if anything wrote it.
    pub fn get(&self, bus: u8, addr: u8, register: u8) -> Option<u8> {
        self.registers
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .get(&(bus, addr, register))
            .copied()
    }

    /// Script read failures (writes still succeed).
    pub fn fail_reads(&self, fail: bool) {
        *self
            .fail_reads
            .lock()
            .unwrap_or_else(|poison| poison.into_inner()) = fail;
    }
}

impl RegisterClient for SimRegisterFile {
    fn read_byte(&self, bus: u8, addr: u8, register: u8) -> io::Result<u8> {
        if *self
            .fail_reads
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
        {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "scripted read failure",
            ));
        }
        Ok(self.get(bus, addr, register).unwrap_or(0))
    }

    fn write_byte(&self, bus: u8, addr: u8, register: u8, value: u8) -> io::Result<()> {
        self.set(bus, addr, register, value);
        Ok(())
    }
}
