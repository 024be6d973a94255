//! Switchboard Management-Controller Conversation
//!
//! The platform's port multiplexers hang off PLDs that are not addressable
//! on the local bus; every register access to them is relayed through a
//! remote management controller (BMC). This crate owns that conversation:
//!
//! - **Session registration**: at start-up, registration is attempted
//!   against a bounded number of candidate management interfaces until one
//!   accepts. No interface accepting is a soft failure, not fatal — the
//!   session simply fails every later exchange fast.
//! - **Serialized exchanges**: at most one command is in flight to the
//!   controller at any instant, system-wide. Multi-command programming
//!   sequences hold the same guard across the whole sequence.
//! - **Completion signaling**: each exchange creates a one-shot completion
//!   token, submits the request, and blocks the calling thread until the
//!   link delivers the reply or a bounded timeout expires.
//!
//! # Example
//!
//! ```rust,no_run
//! use swb_bmc::{ControllerChannel, ControllerSession, ManagementInterface};
//! use swb_protocol::Command;
//!
//! fn select(iface: &dyn ManagementInterface) -> Result<(), swb_bmc::BmcError> {
//!     let session = ControllerSession::register(&[iface]);
//!     let channel = ControllerChannel::new(session);
//!     channel.send(&Command::write(2, 0x73, 0x21, 0x60))?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod error;
pub mod link;
pub mod session;

pub use channel::{BmcConfig, ControllerChannel};
pub use error::BmcError;
pub use link::{Completion, ManagementInterface, ManagementLink, RegisterError, SubmitError};
pub use session::{ControllerSession, SessionGuard, MAX_MANAGEMENT_INTERFACES};
