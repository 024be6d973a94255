//! Sensor reads
//!
//! Local sensors come from host-exposed numeric files (hwmon-style, one
//! integer per file, already in milli-units). Controller-resident sensors
//! are one register read away, scaled by the spec's multiplier. A remote
//! read of zero is treated as "no reading", never as a real temperature.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use swb_bmc::ControllerChannel;
use swb_protocol::Command;

use crate::error::TelemetryError;
use crate::sensor::{platform_sensors, Milli, SensorId, SensorKind, SensorSpec};

/// Read every candidate path and return the maximum successfully parsed
/// value. Unreadable or unparseable candidates are skipped; only all of
/// them failing is an error.
pub fn read_int_max<P: AsRef<Path>>(paths: &[P]) -> io::Result<i64> {
    let mut best: Option<i64> = None;

    for path in paths {
        let Ok(text) = fs::read_to_string(path) else {
            continue;
        };
        if let Ok(value) = text.trim().parse::<i64>() {
            best = Some(best.map_or(value, |b| b.max(value)));
        }
    }

    best.ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "no candidate file yielded an integer",
        )
    })
}

/// Reads sensors from the shipped table, or a custom one.
pub struct SensorReader {
    channel: ControllerChannel,
    sensors: Vec<SensorSpec>,
}

impl SensorReader {
    /// Create a reader over the shipped platform sensor table.
    pub fn new(channel: ControllerChannel) -> Self {
        Self::with_sensors(channel, platform_sensors())
    }

    /// Create a reader over a custom sensor table.
    pub fn with_sensors(channel: ControllerChannel, sensors: Vec<SensorSpec>) -> Self {
        Self { channel, sensors }
    }

    /// The sensor table this reader serves.
    pub fn sensors(&self) -> &[SensorSpec] {
        &self.sensors
    }

    /// Read one sensor in milli-units.
    pub fn read(&self, id: SensorId) -> Result<Milli, TelemetryError> {
        let spec = self
            .sensors
            .iter()
            .find(|s| s.id == id)
            .ok_or(TelemetryError::UnknownSensor(id))?;

        match &spec.kind {
            SensorKind::Local { candidates } => {
                let value = read_int_max(candidates)?;
                debug!(sensor = %spec.name, value, "local sensor read");
                Ok(Milli(value))
            }
            SensorKind::Remote {
                bus,
                addr,
                register,
                multiplier,
            } => {
                let raw = match self.channel.send(&Command::read(*bus, *addr, *register)) {
                    Ok(raw) => raw,
                    Err(e) => {
                        warn!(sensor = %spec.name, "controller sensor read failed: {e}");
                        return Err(TelemetryError::Untrusted {
                            name: spec.name.clone(),
                        });
                    }
                };
                if raw == 0 {
                    return Err(TelemetryError::Untrusted {
                        name: spec.name.clone(),
                    });
                }
                debug!(sensor = %spec.name, raw, "controller sensor read");
                Ok(Milli(i64::from(raw) * multiplier))
            }
        }
    }
}
