//! Mux endpoints and their programming sequences
//!
//! One [`MuxEndpoint`] exists per logical multiplexer segment. Segment
//! endpoints share the controller session; the root endpoint writes its
//! selector PLD directly on the local bus.
//!
//! Selection is deliberately split into "make safe" writes before "make
//! live" writes. Selection is not atomic at the hardware level; ordering
//! the presence/disable step first keeps two downstream ports from both
//! believing they are selected during the switch window, and aborting on
//! the first failed step keeps a half-programmed state from being reported
//! as success.

use std::sync::Arc;

use tracing::{debug, info};

use swb_bmc::ControllerChannel;
use swb_protocol::{Command, RegisterClient};

use crate::error::MuxError;
use crate::family::{
    fanout_select_value, ChannelRange, MuxFamily, PldMap, BAY_ACTIVE, BAY_DISABLED,
    CHANNELS_DISABLED, MODULE_PRESENT_ALL, ROOT_PATH_EEPROM, ROOT_PATH_MUX,
};
use crate::sequence::run_to_first_failure;

/// What actually carries an endpoint's register traffic.
enum Backing {
    /// Directly reachable selector PLD on the local bus.
    Root {
        client: Arc<dyn RegisterClient>,
        bus: u8,
        addr: u8,
        register: u8,
    },
    /// Module bays programmed through the controller.
    ModuleBay {
        channel: ControllerChannel,
        pld: PldMap,
    },
    /// Port fan-out programmed through the controller.
    PortFanout {
        channel: ControllerChannel,
        pld: PldMap,
    },
}

/// One logical multiplexer segment exposed to callers.
///
/// Immutable after creation; selection and deselection go through the
/// family-specific sequences below.
pub struct MuxEndpoint {
    name: String,
    channels: ChannelRange,
    backing: Backing,
}

impl MuxEndpoint {
    /// A root selector endpoint (2 channels, local bus).
    pub fn root(
        name: impl Into<String>,
        client: Arc<dyn RegisterClient>,
        bus: u8,
        addr: u8,
        register: u8,
        channels: ChannelRange,
    ) -> Self {
        Self {
            name: name.into(),
            channels,
            backing: Backing::Root {
                client,
                bus,
                addr,
                register,
            },
        }
    }

    /// A module-bay endpoint programmed through the controller.
    pub fn module_bay(
        name: impl Into<String>,
        channel: ControllerChannel,
        pld: PldMap,
        channels: ChannelRange,
    ) -> Self {
        Self {
            name: name.into(),
            channels,
            backing: Backing::ModuleBay { channel, pld },
        }
    }

    /// A port fan-out endpoint programmed through the controller.
    pub fn port_fanout(
        name: impl Into<String>,
        channel: ControllerChannel,
        pld: PldMap,
        channels: ChannelRange,
    ) -> Self {
        Self {
            name: name.into(),
            channels,
            backing: Backing::PortFanout { channel, pld },
        }
    }

    /// Endpoint display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Which family this endpoint belongs to.
    pub fn family(&self) -> MuxFamily {
        match self.backing {
            Backing::Root { .. } => MuxFamily::Root,
            Backing::ModuleBay { .. } => MuxFamily::ModuleBay,
            Backing::PortFanout { .. } => MuxFamily::PortFanout,
        }
    }

    /// The endpoint's channel domain.
    pub fn channels(&self) -> ChannelRange {
        self.channels
    }

    /// Route the endpoint to `channel`.
    ///
    /// Multi-step sequences hold the session guard throughout and abort at
    /// the first failed step, leaving the hardware indeterminate; callers
    /// recover by deselecting and retrying, never by assuming partial
    /// success.
    pub fn select(&self, channel: u32) -> Result<(), MuxError> {
        match &self.backing {
            Backing::Root {
                client,
                bus,
                addr,
                register,
            } => {
                // Out-of-domain indices share channel 0's path.
                let value = if channel == 1 {
                    ROOT_PATH_MUX
                } else {
                    ROOT_PATH_EEPROM
                };
                client.write_byte(*bus, *addr, *register, value)?;
                debug!(mux = %self.name, channel, value, "root path selected");
                Ok(())
            }
            Backing::ModuleBay { channel: ch, pld } => {
                let in_domain = self.channels.contains(channel);
                let steps = if in_domain {
                    bay_select_steps(pld, channel).to_vec()
                } else {
                    // Out-of-domain falls back to disabling every bay.
                    segment_deselect_steps(pld).to_vec()
                };
                let guard = ch.session().guard();
                run_to_first_failure(ch, &guard, &steps)?;
                if in_domain {
                    info!(mux = %self.name, channel, "module bay selected");
                } else {
                    debug!(mux = %self.name, channel, "out-of-domain bay select disabled all bays");
                }
                Ok(())
            }
            Backing::PortFanout { channel: ch, pld } => {
                let steps = fanout_select_steps(pld, channel);
                let guard = ch.session().guard();
                run_to_first_failure(ch, &guard, &steps)?;
                debug!(
                    mux = %self.name,
                    channel,
                    value = fanout_select_value(channel),
                    "fan-out port selected"
                );
                Ok(())
            }
        }
    }

    /// Return the endpoint to its disabled state.
    ///
    /// The channel argument is accepted for interface symmetry and ignored:
    /// deselection always parks the whole segment. The root selector has
    /// nothing to park and deselect is a no-op there.
    pub fn deselect(&self, _channel: u32) -> Result<(), MuxError> {
        match &self.backing {
            Backing::Root { .. } => Ok(()),
            Backing::ModuleBay { channel: ch, pld }
            | Backing::PortFanout { channel: ch, pld } => {
                let steps = segment_deselect_steps(pld);
                let guard = ch.session().guard();
                run_to_first_failure(ch, &guard, &steps)?;
                debug!(mux = %self.name, "segment deselected");
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for MuxEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MuxEndpoint")
            .field("name", &self.name)
            .field("family", &self.family())
            .field("channels", &self.channels)
            .finish()
    }
}

/// The three ordered writes that route a module bay.
///
/// 1. clear the bay's bit in the module-present mask (presence first, so
///    dependent logic sees the module before traffic arrives)
/// 2. route the shared enable register to the bays
/// 3. program the bay select register with the raw channel index
fn bay_select_steps(pld: &PldMap, channel: u32) -> [Command; 3] {
    let present = MODULE_PRESENT_ALL & !(1u8 << (channel as u8));
    [
        Command::write(pld.bus, pld.presence_addr, pld.presence_register, present),
        Command::write(pld.bus, pld.mux_addr, pld.shared_enable_register, BAY_ACTIVE),
        Command::write(pld.bus, pld.mux_addr, pld.bay_select_register, channel as u8),
    ]
}

/// The two ordered writes that route a fan-out port.
///
/// The module-present mask is returned to its fully-inactive default first,
/// then the banded composite value lands in the shared select register.
fn fanout_select_steps(pld: &PldMap, channel: u32) -> [Command; 2] {
    [
        Command::write(
            pld.bus,
            pld.presence_addr,
            pld.presence_register,
            MODULE_PRESENT_ALL,
        ),
        Command::write(
            pld.bus,
            pld.mux_addr,
            pld.shared_enable_register,
            fanout_select_value(channel),
        ),
    ]
}

/// The two ordered writes that park a segment: disable the bay mux, then
/// disable every downstream channel on the shared enable register.
fn segment_deselect_steps(pld: &PldMap) -> [Command; 2] {
    [
        Command::write(pld.bus, pld.mux_addr, pld.bay_select_register, BAY_DISABLED),
        Command::write(
            pld.bus,
            pld.mux_addr,
            pld.shared_enable_register,
            CHANNELS_DISABLED,
        ),
    ]
}
