//! Switchboard Mux Engine
//!
//! This crate provides the channel-selection state machines for the
//! platform's PLD-backed bus multiplexers. The mux chips themselves are not
//! addressable on the local bus; routing one means emitting an ordered
//! sequence of register writes through the management controller.
//!
//! # Architecture
//!
//! Three mux families, each with its own sequencing rules:
//!
//! - **Root**: 2-channel selector, one local register write
//! - **ModuleBay**: presence mask, then enable, then select — 3 writes
//! - **PortFanout**: presence reset, then a banded composite select — 2 writes
//!
//! All multi-step sequences run through one run-to-first-failure executor
//! while holding the controller session guard, so concurrent selections
//! can never interleave their programming steps and a failed step never
//! leaves a sequence silently half-applied.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use swb_bmc::{ControllerChannel, ControllerSession};
//! use swb_mux::{platform, Switchboard};
//! # fn local_client() -> Arc<dyn swb_protocol::RegisterClient> { unimplemented!() }
//!
//! let session = ControllerSession::unregistered();
//! let channel = ControllerChannel::new(session);
//!
//! let mut board = Switchboard::new(local_client());
//! let bays = board.add_mux(platform::module_bay_endpoint(channel));
//!
//! // Route bay 2 to the shared bus
//! let _ = board.select_channel(bays, 2);
//! ```

pub mod endpoint;
pub mod error;
pub mod family;
pub mod platform;
pub mod sequence;
pub mod switchboard;

pub use endpoint::MuxEndpoint;
pub use error::MuxError;
pub use family::{fanout_select_value, ChannelRange, MuxFamily, PldMap};
pub use sequence::run_to_first_failure;
pub use switchboard::{MuxHandle, Switchboard, READ_ERROR};
