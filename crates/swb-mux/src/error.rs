//! Error types for mux programming

use thiserror::Error;

use swb_bmc::BmcError;

/// Errors that can occur while programming the multiplexer tree.
#[derive(Debug, Error)]
pub enum MuxError {
    /// No mux registered under this handle
    #[error("mux not found: handle {0}")]
    UnknownMux(u32),

    /// Channel range rejected at construction
    #[error("invalid channel range: {0}")]
    InvalidChannelRange(String),

    /// A programming step failed. The sequence was aborted at that step and
    /// the mux is in an indeterminate state until a deselect/select cycle
    /// succeeds.
    #[error("register write failed at step {step}/{total}: {source}")]
    Io {
        /// 1-based index of the step that failed
        step: usize,
        /// Steps the sequence would have run
        total: usize,
        /// Underlying controller failure
        #[source]
        source: BmcError,
    },

    /// Local bus access failed
    #[error("local bus error: {0}")]
    Bus(#[from] std::io::Error),
}
