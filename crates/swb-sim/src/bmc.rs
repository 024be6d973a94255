//! Virtual management controller
//!
//! Behaves like the real thing at the link boundary: accepts (or refuses)
//! registration, executes register reads/writes against an in-memory
//! register file, and delivers each reply through the completion token.
//! Fault knobs let tests script the failure modes the control plane must
//! survive.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use swb_bmc::{Completion, ManagementInterface, ManagementLink, RegisterError, SubmitError};
use swb_protocol::{Reply, WireMessage};

#[derive(Debug, Default)]
struct Faults {
    refuse_registration: bool,
    fail_all_submits: bool,
    fail_register: Option<u8>,
    absent_addrs: HashSet<u8>,
    silent: bool,
}

#[derive(Debug, Default)]
struct Inner {
    registers: HashMap<(u8, u8, u8), u8>,
    journal: Vec<WireMessage>,
    faults: Faults,
    parked: Vec<Completion>,
}

/// A simulated controller with a register file and a request journal.
///
/// Clones share the same state, so a test can keep one handle for scripting
/// and hand another to the session.
#[derive(Debug, Clone, Default)]
pub struct VirtualBmc {
    core: Arc<Mutex<Inner>>,
}

struct VirtualLink {
    core: Arc<Mutex<Inner>>,
}

impl VirtualBmc {
    /// Create a controller with an empty register file and no faults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload a register value.
    pub fn set_register(&self, bus: u8, addr: u8, register: u8, value: u8) {
        self.lock().registers.insert((bus, addr, register), value);
    }

    /// Current value of a register, if any write or preload touched it.
    pub fn register_value(&self, bus: u8, addr: u8, register: u8) -> Option<u8> {
        self.lock().registers.get(&(bus, addr, register)).copied()
    }

    /// Every request executed so far, in wire order. Failed submissions
    /// never reach the journal — nothing was transmitted for them.
    pub fn journal(&self) -> Vec<WireMessage> {
        self.lock().journal.clone()
    }

    /// Drop the journal contents.
    pub fn clear_journal(&self) {
        self.lock().journal.clear();
    }

    /// Script registration refusal.
    pub fn refuse_registration(&self, refuse: bool) {
        self.lock().faults.refuse_registration = refuse;
    }

    /// Script submission failure for every request.
    pub fn fail_submits(&self, fail: bool) {
        self.lock().faults.fail_all_submits = fail;
    }

    /// Script submission failure for requests addressing one register.
    pub fn fail_submits_to_register(&self, register: Option<u8>) {
        self.lock().faults.fail_register = register;
    }

    /// Mark a device address as not installed; reads and probes of it get
    /// the "not present" status.
    pub fn mark_absent(&self, addr: u8) {
        self.lock().faults.absent_addrs.insert(addr);
    }

    /// Accept submissions but never deliver completions.
    pub fn go_silent(&self, silent: bool) {
        self.lock().faults.silent = silent;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.core.lock().unwrap_or_else(|poison| poison.into_inner())
    }
}

impl ManagementInterface for VirtualBmc {
    fn register(&self) -> Result<Arc<dyn ManagementLink>, RegisterError> {
        if self.lock().faults.refuse_registration {
            return Err(RegisterError("virtual interface scripted to refuse".into()));
        }
        Ok(Arc::new(VirtualLink {
            core: self.core.clone(),
        }))
    }
}

impl ManagementLink for VirtualLink {
    fn submit(&self, request: &WireMessage, done: Completion) -> Result<(), SubmitError> {
        let mut inner = self
            .core
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());

        if inner.faults.fail_all_submits {
            return Err(SubmitError("scripted submit failure".into()));
        }
        if inner.faults.fail_register == Some(request.register()) {
            return Err(SubmitError(format!(
                "scripted submit failure for register 0x{:02X}",
                request.register()
            )));
        }

        inner.journal.push(*request);

        if inner.faults.silent {
            // Park the token unanswered; the caller is left to its timeout.
            inner.parked.push(done);
            return Ok(());
        }

        let key = (request.bus(), request.addr(), request.register());
        let reply = if request.is_write() {
            inner.registers.insert(key, request.value());
            Reply::ok(0)
        } else if inner.faults.absent_addrs.contains(&request.addr()) {
            Reply::not_present()
        } else {
            Reply::ok(inner.registers.get(&key).copied().unwrap_or(0))
        };

        drop(inner);
        done.complete(reply);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swb_bmc::{ControllerChannel, ControllerSession};
    use swb_protocol::Command;

    fn channel(bmc: &VirtualBmc) -> ControllerChannel {
        ControllerChannel::new(ControllerSession::register(&[bmc]))
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let bmc = VirtualBmc::new();
        let ch = channel(&bmc);

        ch.send(&Command::write(2, 0x73, 0x21, 0x60)).unwrap();
        assert_eq!(ch.send(&Command::read(2, 0x73, 0x21)).unwrap(), 0x60);
        assert_eq!(bmc.register_value(2, 0x73, 0x21), Some(0x60));
    }

    #[test]
    fn test_journal_records_wire_order() {
        let bmc = VirtualBmc::new();
        let ch = channel(&bmc);

        ch.send(&Command::write(2, 0x6A, 0x64, 0x3F)).unwrap();
        ch.send(&Command::read(2, 0x73, 0x20)).unwrap();

        let journal = bmc.journal();
        assert_eq!(journal.len(), 2);
        assert!(journal[0].is_write());
        assert_eq!(journal[0].register(), 0x64);
        assert_eq!(journal[1].register(), 0x20);
    }

    #[test]
    fn test_failed_submit_is_not_journaled() {
        let bmc = VirtualBmc::new();
        let ch = channel(&bmc);

        bmc.fail_submits(true);
        ch.send(&Command::read(2, 0x73, 0x20)).unwrap_err();

        assert!(bmc.journal().is_empty());
    }

    #[test]
    fn test_absent_addr_answers_not_present() {
        let bmc = VirtualBmc::new();
        bmc.mark_absent(0x50);
        let ch = channel(&bmc);

        let err = ch.send(&Command::read(2, 0x50, 0x00)).unwrap_err();
        assert_eq!(err, swb_bmc::BmcError::Absent);
    }

    #[test]
    fn test_refused_registration_leaves_session_unregistered() {
        let bmc = VirtualBmc::new();
        bmc.refuse_registration(true);

        let session = ControllerSession::register(&[&bmc]);
        assert!(!session.is_registered());
    }
}
