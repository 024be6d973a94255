//! Run-to-first-failure sequence execution
//!
//! Every multi-step programming action is an ordered list of commands run
//! by this one executor, so the abort-on-first-failure contract is enforced
//! centrally instead of per family. The caller supplies the session guard;
//! holding it across the whole list is what keeps two concurrent sequences
//! from interleaving on the wire.

use tracing::warn;

use swb_bmc::{ControllerChannel, SessionGuard};
use swb_protocol::Command;

use crate::error::MuxError;

/// Execute `steps` in order, stopping at the first failure.
///
/// On failure nothing after the failing step is sent; the error records the
/// 1-based step index so callers can log exactly where programming stopped.
pub fn run_to_first_failure(
    channel: &ControllerChannel,
    guard: &SessionGuard<'_>,
    steps: &[Command],
) -> Result<(), MuxError> {
    let total = steps.len();
    for (index, step) in steps.iter().enumerate() {
        if let Err(source) = channel.send_with(guard, step) {
            warn!(
                step = index + 1,
                total,
                register = step.register,
                "programming sequence aborted: {source}"
            );
            return Err(MuxError::Io {
                step: index + 1,
                total,
                source,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex;

    use swb_bmc::{
        Completion, ControllerSession, ManagementInterface, ManagementLink, RegisterError,
        SubmitError,
    };
    use swb_protocol::{Reply, WireMessage};

    /// Link that refuses submissions addressing one register and records
    /// the rest.
    struct PickyLink {
        refuse_register: u8,
        seen: Mutex<Vec<u8>>,
    }

    impl ManagementLink for PickyLink {
        fn submit(&self, request: &WireMessage, done: Completion) -> Result<(), SubmitError> {
            if request.register() == self.refuse_register {
                return Err(SubmitError("refused".into()));
            }
            self.seen
                .lock()
                .unwrap_or_else(|poison| poison.into_inner())
                .push(request.register());
            done.complete(Reply::ok(0));
            Ok(())
        }
    }

    struct PickyInterface {
        link: Arc<PickyLink>,
    }

    impl ManagementInterface for PickyInterface {
        fn register(&self) -> Result<Arc<dyn ManagementLink>, RegisterError> {
            Ok(self.link.clone())
        }
    }

    fn steps() -> Vec<Command> {
        vec![
            Command::write(2, 0x6A, 0x64, 0x3B),
            Command::write(2, 0x73, 0x21, 0x60),
            Command::write(2, 0x73, 0x20, 0x02),
        ]
    }

    fn channel_refusing(register: u8) -> (ControllerChannel, Arc<PickyLink>) {
        let link = Arc::new(PickyLink {
            refuse_register: register,
            seen: Mutex::new(Vec::new()),
        });
        let session = ControllerSession::register(&[&PickyInterface { link: link.clone() }]);
        (ControllerChannel::new(session), link)
    }

    #[test]
    fn test_all_steps_run_in_order() {
        let (channel, link) = channel_refusing(0xEE);
        let guard = channel.session().guard();

        run_to_first_failure(&channel, &guard, &steps()).unwrap();

        let seen = link.seen.lock().unwrap();
        assert_eq!(*seen, vec![0x64, 0x21, 0x20]);
    }

    #[test]
    fn test_failure_reports_step_index_and_stops() {
        let (channel, link) = channel_refusing(0x21);
        let guard = channel.session().guard();

        let err = run_to_first_failure(&channel, &guard, &steps()).unwrap_err();

        match err {
            MuxError::Io { step, total, .. } => {
                assert_eq!(step, 2);
                assert_eq!(total, 3);
            }
            other => panic!("expected Io, got {other:?}"),
        }
        // Only the first step made it onto the wire
        let seen = link.seen.lock().unwrap();
        assert_eq!(*seen, vec![0x64]);
    }

    #[test]
    fn test_first_step_failure_sends_nothing_else() {
        let (channel, link) = channel_refusing(0x64);
        let guard = channel.session().guard();

        let err = run_to_first_failure(&channel, &guard, &steps()).unwrap_err();

        assert!(matches!(err, MuxError::Io { step: 1, .. }));
        assert!(link.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_empty_sequence_is_a_no_op() {
        let (channel, _link) = channel_refusing(0xEE);
        let guard = channel.session().guard();
        run_to_first_failure(&channel, &guard, &[]).unwrap();
    }
}
