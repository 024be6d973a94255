//! Error types for sensor reads

use thiserror::Error;

use crate::sensor::SensorId;

/// Errors that can occur while reading a sensor.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// No sensor is defined under this id
    #[error("unknown sensor id: {0:?}")]
    UnknownSensor(SensorId),

    /// The reading was judged untrustworthy: the controller exchange
    /// failed, or it reported a flat zero, which on this hardware means
    /// "no reading", not zero degrees.
    #[error("sensor '{name}' reading not trustworthy")]
    Untrusted {
        /// Sensor display name
        name: String,
    },

    /// Local file access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
