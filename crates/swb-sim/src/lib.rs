//! Switchboard Simulation Library
//!
//! This crate provides a simulation layer for exercising the control plane
//! without platform hardware:
//!
//! - **VirtualBmc**: an in-memory management controller with a register
//!   file, a journal of every request it executed, and scriptable faults
//!   (refused registration, failed submission, absent devices, silence)
//! - **SimRegisterFile**: a local-bus register client for devices in front
//!   of the mux tree
//!
//! # Example
//!
//! ```rust
//! use swb_sim::VirtualBmc;
//! use swb_bmc::{ControllerChannel, ControllerSession};
//! use swb_protocol::Command;
//!
//! let bmc = VirtualBmc::new();
//! bmc.set_register(2, 0x73, 0x20, 0x04);
//!
//! let session = ControllerSession::register(&[&bmc]);
//! let channel = ControllerChannel::new(session);
//!
//! assert_eq!(channel.send(&Command::read(2, 0x73, 0x20)).unwrap(), 0x04);
//! assert_eq!(bmc.journal().len(), 1);
//! ```

pub mod bmc;
pub mod registers;

pub use bmc::VirtualBmc;
pub use registers::SimRegisterFile;
