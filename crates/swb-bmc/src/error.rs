//! Error types for controller exchanges

use thiserror::Error;

/// Errors that can come out of one request/reply exchange.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BmcError {
    /// The request could not be handed to the management layer at all.
    /// Nothing was transmitted; not retried here.
    #[error("transport error: {0}")]
    Transport(String),

    /// The controller accepted the request but reported a failure.
    #[error("controller reported failure (status 0x{status:02X})")]
    Remote {
        /// Status byte from the reply
        status: u8,
    },

    /// The controller says the addressed sub-device is not installed.
    /// Expected on partially-populated platforms; callers usually treat
    /// this as "absent", not as an alarm.
    #[error("controller reports device not present")]
    Absent,

    /// No completion arrived within the configured bound.
    #[error("no completion from controller within {0}ms")]
    Timeout(u64),
}
