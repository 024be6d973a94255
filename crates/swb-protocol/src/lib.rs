//! Switchboard Protocol Library
//!
//! This crate provides the command/reply model for talking to the remote
//! management controller that programs the platform's bus multiplexers and
//! programmable-logic devices (PLDs) on our behalf:
//!
//! - **Commands**: typed register read/write/probe requests and their framing
//!   into wire messages (protocol family id, opcode, 4 payload bytes)
//! - **Replies**: status-byte interpretation, including the "sub-device not
//!   present" marker
//! - **Register decode**: extraction of an arbitrarily-positioned bitfield
//!   from a raw register byte, with the shift derived from the mask itself
//!
//! Everything here is pure data transformation. The blocking conversation
//! with the controller lives in `swb-bmc`; the mux state machines live in
//! `swb-mux`.
//!
//! # Example
//!
//! ```rust
//! use swb_protocol::{Command, field};
//!
//! let cmd = Command::write(2, 0x73, 0x21, 0x60);
//! let msg = cmd.to_wire();
//! assert_eq!(msg.payload, [2, 0x73, 0x21, 0x60]);
//!
//! // Decode bits 3..=2 of a status register
//! assert_eq!(field(0b0000_1100, 0x0C), 3);
//! ```

pub mod client;
pub mod command;
pub mod register;

pub use client::RegisterClient;
pub use command::{
    Command, Operation, Reply, WireMessage, PROTOCOL_FAMILY, STATUS_NOT_PRESENT, STATUS_OK,
};
pub use register::{field, AttributeSpec};
