//! Mux families, channel ranges, and the fan-out band table
//!
//! Three multiplexer families exist on this platform, each with its own
//! programming rules:
//!
//! - **Root**: a 2-channel selector PLD in front of the local bus. One
//!   register write, directly reachable, no relay.
//! - **ModuleBay**: cages for pluggable optical modules. Selection also
//!   maintains a module-present mask so downstream logic sees exactly one
//!   bay responding.
//! - **PortFanout**: a wide simple-port mux. The select register encodes a
//!   band-enable code in the high nibble and the channel's offset within
//!   that band in the low nibble.

use serde::{Deserialize, Serialize};

use crate::error::MuxError;

/// Which family an endpoint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MuxFamily {
    /// Front-end selector on the local bus
    Root,
    /// Pluggable module bays with presence signalling
    ModuleBay,
    /// Banded simple-port fan-out
    PortFanout,
}

impl MuxFamily {
    /// Human-readable family name.
    pub fn name(&self) -> &'static str {
        match self {
            MuxFamily::Root => "root",
            MuxFamily::ModuleBay => "module-bay",
            MuxFamily::PortFanout => "port-fanout",
        }
    }
}

/// The channel domain of one mux endpoint, validated at construction.
///
/// Channel indices are 0-based and local to the endpoint; `base` is the
/// downstream bus number channel 0 maps to in the host's numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelRange {
    pub(crate) base: u32,
    pub(crate) count: u32,
}

impl ChannelRange {
    /// Build a range of `count` channels whose first downstream bus is `base`.
    pub fn new(base: u32, count: u32) -> Result<Self, MuxError> {
        if count == 0 {
            return Err(MuxError::InvalidChannelRange(
                "channel count must be at least 1".into(),
            ));
        }
        Ok(Self { base, count })
    }

    /// First downstream bus number.
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Number of channels in the domain.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Whether a channel index is inside the declared domain.
    pub fn contains(&self, channel: u32) -> bool {
        channel < self.count
    }

    /// Downstream bus number a channel maps to.
    pub fn downstream_bus(&self, channel: u32) -> u32 {
        self.base + channel
    }
}

/// Register map of the relayed port PLD pair.
///
/// One PLD carries the module-present mask; the other carries the bay
/// select register and the enable register shared between the bay mux and
/// the fan-out mux.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PldMap {
    /// Controller-side bus both PLDs answer on
    pub bus: u8,
    /// PLD carrying the module-present mask
    pub presence_addr: u8,
    /// Module-present mask register
    pub presence_register: u8,
    /// PLD carrying the mux registers
    pub mux_addr: u8,
    /// Bay select register
    pub bay_select_register: u8,
    /// Shared channel-enable register (doubles as the fan-out select)
    pub shared_enable_register: u8,
}

/// Module-present mask with every bay marked inactive (bits set = absent).
pub const MODULE_PRESENT_ALL: u8 = 0x3F;

/// Enable code routing the shared channel register to the module bays.
pub const BAY_ACTIVE: u8 = 0x60;

/// Bay select code parking the bay mux.
pub const BAY_DISABLED: u8 = 0x10;

/// Shared enable register code disabling every downstream channel.
pub const CHANNELS_DISABLED: u8 = 0xFF;

/// Fan-out select code with no port enabled.
pub const FANOUT_DISABLED: u8 = 0x70;

/// Root selector code for the identification-EEPROM path.
pub const ROOT_PATH_EEPROM: u8 = 0xFC;

/// Root selector code for the mux-tree path.
pub const ROOT_PATH_MUX: u8 = 0xFF;

/// One contiguous fan-out band.
struct Band {
    start: u32,
    width: u32,
    code: u8,
}

/// The five fan-out bands, in channel order.
const FANOUT_BANDS: [Band; 5] = [
    Band { start: 0, width: 9, code: 0x00 },
    Band { start: 9, width: 10, code: 0x10 },
    Band { start: 19, width: 10, code: 0x20 },
    Band { start: 29, width: 10, code: 0x30 },
    Band { start: 39, width: 7, code: 0x40 },
];

/// Compose the fan-out select value for a channel.
///
/// The band-enable code is OR'd with the channel's zero-based offset within
/// its band. Channels past the last band compose to [`FANOUT_DISABLED`]
/// rather than erroring, so the mapping is total.
pub fn fanout_select_value(channel: u32) -> u8 {
    for band in &FANOUT_BANDS {
        if channel >= band.start && channel < band.start + band.width {
            return band.code | (channel - band.start) as u8;
        }
    }
    FANOUT_DISABLED
}
