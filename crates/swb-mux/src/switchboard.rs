//! The switchboard façade
//!
//! Callers address muxes by handle, the way the host environment addresses
//! adapters by number. The switchboard also owns the attribute read path:
//! fetch a raw byte on the local bus, decode the masked field, render it
//! the way the user-facing register files expect.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use swb_protocol::{AttributeSpec, RegisterClient};

use crate::endpoint::MuxEndpoint;
use crate::error::MuxError;

/// Rendered output when the raw register fetch fails. Kept as a literal
/// sentinel so callers can tell it from numeric output.
pub const READ_ERROR: &str = "READ ERROR\n";

/// Unique identifier for a mux registered with the switchboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MuxHandle(pub u32);

impl MuxHandle {
    /// Get the raw handle value.
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

/// Registry of mux endpoints plus the local-bus attribute read path.
pub struct Switchboard {
    local: Arc<dyn RegisterClient>,
    muxes: HashMap<MuxHandle, MuxEndpoint>,
    next_handle: u32,
}

impl Switchboard {
    /// Create a switchboard over the given local-bus register client.
    pub fn new(local: Arc<dyn RegisterClient>) -> Self {
        Self {
            local,
            muxes: HashMap::new(),
            next_handle: 1,
        }
    }

    /// Register a mux endpoint.
    pub fn add_mux(&mut self, endpoint: MuxEndpoint) -> MuxHandle {
        let handle = MuxHandle(self.next_handle);
        self.next_handle += 1;

        info!(
            "registered {} mux '{}' ({} channels, handle {})",
            endpoint.family().name(),
            endpoint.name(),
            endpoint.channels().count(),
            handle.0
        );
        self.muxes.insert(handle, endpoint);
        handle
    }

    /// Remove a mux endpoint.
    pub fn remove_mux(&mut self, handle: MuxHandle) -> Option<MuxEndpoint> {
        self.muxes.remove(&handle)
    }

    /// Look up a registered endpoint.
    pub fn mux(&self, handle: MuxHandle) -> Option<&MuxEndpoint> {
        self.muxes.get(&handle)
    }

    /// Iterate over registered endpoints.
    pub fn muxes(&self) -> impl Iterator<Item = (MuxHandle, &MuxEndpoint)> {
        self.muxes.iter().map(|(h, e)| (*h, e))
    }

    /// Route a mux to a channel.
    pub fn select_channel(&self, handle: MuxHandle, channel: u32) -> Result<(), MuxError> {
        self.muxes
            .get(&handle)
            .ok_or(MuxError::UnknownMux(handle.0))?
            .select(channel)
    }

    /// Park a mux.
    pub fn deselect_channel(&self, handle: MuxHandle, channel: u32) -> Result<(), MuxError> {
        self.muxes
            .get(&handle)
            .ok_or(MuxError::UnknownMux(handle.0))?
            .deselect(channel)
    }

    /// Fetch and decode one register attribute.
    pub fn read_register_field(&self, spec: &AttributeSpec) -> Result<u8, MuxError> {
        let raw = self.local.read_byte(spec.bus, spec.addr, spec.register)?;
        Ok(spec.decode(raw))
    }

    /// Render an attribute for the user-facing register files.
    ///
    /// Full-byte fields render as `0x%02x`, narrower fields as unsigned
    /// decimal; the value line ends with a newline and the note, when one
    /// is defined, follows on its own line. A failed fetch renders the
    /// [`READ_ERROR`] sentinel instead of a number.
    pub fn render_attribute(&self, spec: &AttributeSpec) -> String {
        let value = match self.read_register_field(spec) {
            Ok(v) => v,
            Err(e) => {
                warn!(
                    register = spec.register,
                    "attribute read failed: {e}"
                );
                return READ_ERROR.to_string();
            }
        };

        let body = if spec.is_full_byte() {
            format!("0x{value:02x}")
        } else {
            value.to_string()
        };

        match spec.note {
            Some(note) => format!("{body}\n{note}\n"),
            None => format!("{body}\n"),
        }
    }
}

impl std::fmt::Debug for Switchboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Switchboard")
            .field("muxes", &self.muxes.len())
            .finish()
    }
}
