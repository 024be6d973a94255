//! Shipped platform description
//!
//! Addresses, register numbers, and channel bases for the one platform this
//! control plane currently ships on. Everything here is table data; the
//! behavior lives in the family and endpoint modules.

use std::sync::Arc;

use swb_bmc::ControllerChannel;
use swb_protocol::{AttributeSpec, RegisterClient};

use crate::endpoint::MuxEndpoint;
use crate::family::{ChannelRange, PldMap};

/// Local bus the root selector PLD answers on.
pub const ROOT_BUS: u8 = 0;
/// Root selector PLD address.
pub const ROOT_PLD_ADDR: u8 = 0x31;
/// Root path-select register.
pub const ROOT_SELECT_REG: u8 = 0x14;

/// Controller-side bus the port PLD pair answers on.
pub const PORT_PLD_BUS: u8 = 2;
/// PLD carrying the module-present mask.
pub const PRESENCE_PLD_ADDR: u8 = 0x6A;
/// Module-present mask register.
pub const PRESENCE_REG: u8 = 0x64;
/// PLD carrying the mux registers.
pub const MUX_PLD_ADDR: u8 = 0x73;
/// Bay select register.
pub const BAY_SELECT_REG: u8 = 0x20;
/// Shared channel-enable register (also the fan-out select).
pub const SHARED_ENABLE_REG: u8 = 0x21;

const ROOT_RANGE: ChannelRange = ChannelRange { base: 1, count: 2 };
const MODULE_BAY_RANGE: ChannelRange = ChannelRange { base: 41, count: 6 };
const PORT_FANOUT_RANGE: ChannelRange = ChannelRange { base: 51, count: 46 };

/// Register map of the relayed port PLD pair.
pub fn port_pld_map() -> PldMap {
    PldMap {
        bus: PORT_PLD_BUS,
        presence_addr: PRESENCE_PLD_ADDR,
        presence_register: PRESENCE_REG,
        mux_addr: MUX_PLD_ADDR,
        bay_select_register: BAY_SELECT_REG,
        shared_enable_register: SHARED_ENABLE_REG,
    }
}

/// The root selector endpoint (identification EEPROM vs. the mux tree).
pub fn root_endpoint(client: Arc<dyn RegisterClient>) -> MuxEndpoint {
    MuxEndpoint::root(
        "root selector",
        client,
        ROOT_BUS,
        ROOT_PLD_ADDR,
        ROOT_SELECT_REG,
        ROOT_RANGE,
    )
}

/// The six-channel module-bay endpoint.
pub fn module_bay_endpoint(channel: ControllerChannel) -> MuxEndpoint {
    MuxEndpoint::module_bay("module bays", channel, port_pld_map(), MODULE_BAY_RANGE)
}

/// The 46-channel port fan-out endpoint.
pub fn port_fanout_endpoint(channel: ControllerChannel) -> MuxEndpoint {
    MuxEndpoint::port_fanout("port fan-out", channel, port_pld_map(), PORT_FANOUT_RANGE)
}

/// System PLD revision, readable on the local bus.
pub const SYSTEM_PLD_VERSION: AttributeSpec = AttributeSpec {
    bus: 3,
    addr: 0x31,
    register: 0x03,
    mask: 0xFF,
    note: Some("System PLD revision, set by the PLD build."),
};

/// Every register attribute the platform exposes.
pub const ATTRIBUTES: &[AttributeSpec] = &[SYSTEM_PLD_VERSION];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_are_well_formed() {
        assert_eq!(ROOT_RANGE.count(), 2);
        assert_eq!(MODULE_BAY_RANGE.downstream_bus(0), 41);
        assert_eq!(MODULE_BAY_RANGE.downstream_bus(5), 46);
        assert_eq!(PORT_FANOUT_RANGE.downstream_bus(45), 96);
    }

    #[test]
    fn test_version_attribute_renders_as_hex() {
        assert!(SYSTEM_PLD_VERSION.is_full_byte());
    }
}
