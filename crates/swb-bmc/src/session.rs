//! Controller session and global serialization
//!
//! One session exists per process, shared by reference count between every
//! component that talks to the controller. The session owns the single
//! mutual-exclusion guard that keeps commands from interleaving: ordinary
//! exchanges take it per command, mux programming takes it across a whole
//! multi-command sequence.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::link::{ManagementInterface, ManagementLink};

/// Upper bound on management-interface instances tried at registration.
pub const MAX_MANAGEMENT_INTERFACES: usize = 4;

/// The process-wide conversation endpoint with the management controller.
pub struct ControllerSession {
    link: Option<Arc<dyn ManagementLink>>,
    serial: Mutex<()>,
}

/// Exclusive access to the controller conversation.
///
/// Holding the guard is what makes a multi-command sequence contiguous on
/// the wire; it is released on every exit path by normal drop.
pub struct SessionGuard<'a> {
    _lock: MutexGuard<'a, ()>,
}

impl ControllerSession {
    /// Register against the first candidate interface that accepts.
    ///
    /// Candidates beyond [`MAX_MANAGEMENT_INTERFACES`] are not tried. If
    /// none accept, the session is still returned — unregistered — and
    /// every later exchange fails fast instead of blocking.
    pub fn register(candidates: &[&dyn ManagementInterface]) -> Arc<Self> {
        let mut link = None;

        for (index, iface) in candidates
            .iter()
            .take(MAX_MANAGEMENT_INTERFACES)
            .enumerate()
        {
            match iface.register() {
                Ok(l) => {
                    info!("management interface {index} accepted registration");
                    link = Some(l);
                    break;
                }
                Err(e) => {
                    debug!("management interface {index} refused registration: {e}");
                }
            }
        }

        if link.is_none() {
            warn!("no management interface accepted registration; controller exchanges will fail fast");
        }

        Arc::new(Self {
            link,
            serial: Mutex::new(()),
        })
    }

    /// A session with no registered link, for hosts without a controller.
    pub fn unregistered() -> Arc<Self> {
        Arc::new(Self {
            link: None,
            serial: Mutex::new(()),
        })
    }

    /// Whether a management interface accepted registration.
    pub fn is_registered(&self) -> bool {
        self.link.is_some()
    }

    /// Take exclusive access to the conversation.
    ///
    /// Blocks until any in-flight command or sequence finishes. A poisoned
    /// lock is recovered: the session holds no data behind the mutex.
    pub fn guard(&self) -> SessionGuard<'_> {
        SessionGuard {
            _lock: self
                .serial
                .lock()
                .unwrap_or_else(|poison| poison.into_inner()),
        }
    }

    pub(crate) fn link(&self) -> Option<&Arc<dyn ManagementLink>> {
        self.link.as_ref()
    }
}

impl std::fmt::Debug for ControllerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerSession")
            .field("registered", &self.is_registered())
            .finish()
    }
}
