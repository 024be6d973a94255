//! The serialized request/reply channel
//!
//! [`ControllerChannel::send`] is the single suspension point of the whole
//! control plane: it submits one framed command and blocks the calling
//! thread until the management layer signals completion or the configured
//! bound expires. No retries happen here; retry policy belongs to callers.

use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use swb_protocol::{Command, Operation, Reply};

use crate::error::BmcError;
use crate::link::Completion;
use crate::session::{ControllerSession, SessionGuard};

/// Controller channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmcConfig {
    /// Bound on the wait for a completion, in milliseconds.
    pub reply_timeout_ms: u64,
}

impl Default for BmcConfig {
    fn default() -> Self {
        Self {
            reply_timeout_ms: 2_000,
        }
    }
}

/// A handle for sending commands over the shared controller session.
///
/// Cheap to clone per component; every clone serializes through the same
/// session guard.
#[derive(Debug, Clone)]
pub struct ControllerChannel {
    session: Arc<ControllerSession>,
    config: BmcConfig,
}

impl ControllerChannel {
    /// Create a channel with the default configuration.
    pub fn new(session: Arc<ControllerSession>) -> Self {
        Self::with_config(session, BmcConfig::default())
    }

    /// Create a channel with a custom configuration.
    pub fn with_config(session: Arc<ControllerSession>, config: BmcConfig) -> Self {
        Self { session, config }
    }

    /// The shared session this channel sends through.
    pub fn session(&self) -> &Arc<ControllerSession> {
        &self.session
    }

    /// Send one command and block for its reply.
    ///
    /// Takes the session guard for the duration of the exchange, so no two
    /// commands are ever outstanding concurrently.
    pub fn send(&self, cmd: &Command) -> Result<u8, BmcError> {
        let guard = self.session.guard();
        self.send_with(&guard, cmd)
    }

    /// Send one command under an already-held session guard.
    ///
    /// Used by multi-command programming sequences that must stay contiguous
    /// on the wire; the guard proves the caller holds the serialization lock.
    pub fn send_with(&self, _guard: &SessionGuard<'_>, cmd: &Command) -> Result<u8, BmcError> {
        let reply = self.exchange(cmd)?;

        match cmd.operation {
            Operation::Read => {
                if reply.is_not_present() {
                    return Err(BmcError::Absent);
                }
                Ok(reply.value)
            }
            Operation::Write => {
                if reply.is_ok() {
                    Ok(0)
                } else {
                    warn!(
                        register = cmd.register,
                        status = reply.status,
                        "controller rejected write"
                    );
                    Err(BmcError::Remote {
                        status: reply.status,
                    })
                }
            }
            Operation::Diagnostic => {
                // Absence first: a probe exists to tell "not installed"
                // apart from "installed but failing".
                if reply.is_not_present() {
                    return Err(BmcError::Absent);
                }
                if reply.is_ok() {
                    Ok(reply.value)
                } else {
                    Err(BmcError::Remote {
                        status: reply.status,
                    })
                }
            }
        }
    }

    fn exchange(&self, cmd: &Command) -> Result<Reply, BmcError> {
        let link = self
            .session
            .link()
            .ok_or_else(|| BmcError::Transport("session not registered".into()))?;

        let message = cmd.to_wire();
        let (done, reply_rx) = Completion::new();

        link.submit(&message, done)
            .map_err(|e| BmcError::Transport(e.to_string()))?;

        match reply_rx.recv_timeout(Duration::from_millis(self.config.reply_timeout_ms)) {
            Ok(reply) => {
                debug!(
                    opcode = message.opcode,
                    register = cmd.register,
                    status = reply.status,
                    "controller exchange complete"
                );
                Ok(reply)
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    opcode = message.opcode,
                    register = cmd.register,
                    timeout_ms = self.config.reply_timeout_ms,
                    "controller exchange timed out"
                );
                Err(BmcError::Timeout(self.config.reply_timeout_ms))
            }
            Err(RecvTimeoutError::Disconnected) => {
                // The link accepted the request but dropped the token.
                Err(BmcError::Transport("completion token dropped".into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::{
        ManagementInterface, ManagementLink, RegisterError, SubmitError,
    };
    use swb_protocol::WireMessage;

    /// Inline test link: completes every exchange with a scripted reply.
    struct ScriptedLink {
        reply: Reply,
    }

    impl ManagementLink for ScriptedLink {
        fn submit(&self, _request: &WireMessage, done: Completion) -> Result<(), SubmitError> {
            done.complete(self.reply);
            Ok(())
        }
    }

    struct ScriptedInterface {
        reply: Reply,
    }

    impl ManagementInterface for ScriptedInterface {
        fn register(&self) -> Result<Arc<dyn ManagementLink>, RegisterError> {
            Ok(Arc::new(ScriptedLink { reply: self.reply }))
        }
    }

    /// Accepts submissions, parks the token, never completes it.
    #[derive(Default)]
    struct SilentLink {
        parked: std::sync::Mutex<Vec<Completion>>,
    }

    impl ManagementLink for SilentLink {
        fn submit(&self, _request: &WireMessage, done: Completion) -> Result<(), SubmitError> {
            self.parked.lock().unwrap().push(done);
            Ok(())
        }
    }

    struct SilentInterface;

    impl ManagementInterface for SilentInterface {
        fn register(&self) -> Result<Arc<dyn ManagementLink>, RegisterError> {
            Ok(Arc::new(SilentLink::default()))
        }
    }

    fn channel_with_reply(reply: Reply) -> ControllerChannel {
        let session = ControllerSession::register(&[&ScriptedInterface { reply }]);
        ControllerChannel::new(session)
    }

    #[test]
    fn test_read_returns_data_byte() {
        let channel = channel_with_reply(Reply::ok(0x5A));
        let value = channel.send(&Command::read(2, 0x73, 0x20)).unwrap();
        assert_eq!(value, 0x5A);
    }

    #[test]
    fn test_read_not_present_maps_to_absent() {
        let channel = channel_with_reply(Reply::not_present());
        let err = channel.send(&Command::read(2, 0x73, 0x20)).unwrap_err();
        assert_eq!(err, BmcError::Absent);
    }

    #[test]
    fn test_write_failure_maps_to_remote() {
        let channel = channel_with_reply(Reply::failed(0x05));
        let err = channel
            .send(&Command::write(2, 0x73, 0x21, 0x60))
            .unwrap_err();
        assert_eq!(err, BmcError::Remote { status: 0x05 });
    }

    #[test]
    fn test_probe_distinguishes_absent_from_failing() {
        let absent = channel_with_reply(Reply::not_present());
        assert_eq!(
            absent.send(&Command::probe(2, 0x73, 0x01)).unwrap_err(),
            BmcError::Absent
        );

        let failing = channel_with_reply(Reply::failed(0x07));
        assert_eq!(
            failing.send(&Command::probe(2, 0x73, 0x01)).unwrap_err(),
            BmcError::Remote { status: 0x07 }
        );
    }

    #[test]
    fn test_unregistered_session_fails_fast() {
        let channel = ControllerChannel::new(ControllerSession::unregistered());
        let err = channel.send(&Command::read(2, 0x73, 0x20)).unwrap_err();
        assert!(matches!(err, BmcError::Transport(_)));
    }

    #[test]
    fn test_silent_link_times_out_within_bound() {
        let session = ControllerSession::register(&[&SilentInterface]);
        let channel = ControllerChannel::with_config(
            session,
            BmcConfig {
                reply_timeout_ms: 25,
            },
        );

        let start = std::time::Instant::now();
        let err = channel.send(&Command::read(2, 0x73, 0x20)).unwrap_err();

        assert_eq!(err, BmcError::Timeout(25));
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = BmcConfig {
            reply_timeout_ms: 750,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: BmcConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.reply_timeout_ms, 750);
    }
}
