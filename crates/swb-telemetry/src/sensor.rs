//! Sensor classification and the shipped sensor table

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Unique identifier for a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SensorId(pub u32);

/// A reading in milli-units (milli-degrees Celsius for thermal sensors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Milli(pub i64);

/// How a sensor's value is obtained.
#[derive(Debug, Clone)]
pub enum SensorKind {
    /// Host-exposed numeric files; the reading is the maximum across all
    /// candidates that parse (multi-die packages expose one file per die).
    Local {
        /// Candidate file paths, tried in order
        candidates: Vec<PathBuf>,
    },
    /// Controller-resident register, scaled into milli-units.
    Remote {
        /// Controller-side bus
        bus: u8,
        /// Sensor device address
        addr: u8,
        /// Temperature register
        register: u8,
        /// Scale from register units to milli-units
        multiplier: i64,
    },
}

/// One sensor the platform exposes.
#[derive(Debug, Clone)]
pub struct SensorSpec {
    /// Identifier callers use
    pub id: SensorId,
    /// Display name
    pub name: String,
    /// Where and how to read it
    pub kind: SensorKind,
}

/// Scale factor from whole units to milli-units.
pub const MILLI_PER_UNIT: i64 = 1000;

/// The shipped sensor table: one local CPU package sensor plus the board
/// and PSU sensors that live behind the controller.
pub fn platform_sensors() -> Vec<SensorSpec> {
    let coretemp: Vec<PathBuf> = (1..=9)
        .map(|n| {
            PathBuf::from(format!(
                "/sys/devices/platform/coretemp.0/hwmon/hwmon0/temp{n}_input"
            ))
        })
        .collect();

    vec![
        SensorSpec {
            id: SensorId(1),
            name: "CPU package".into(),
            kind: SensorKind::Local {
                candidates: coretemp,
            },
        },
        SensorSpec {
            id: SensorId(2),
            name: "Fan board sensor".into(),
            kind: SensorKind::Remote {
                bus: 2,
                addr: 0x4D,
                register: 0x00,
                multiplier: MILLI_PER_UNIT,
            },
        },
        SensorSpec {
            id: SensorId(3),
            name: "Main board sensor (switch near)".into(),
            kind: SensorKind::Remote {
                bus: 2,
                addr: 0x4E,
                register: 0x00,
                multiplier: MILLI_PER_UNIT,
            },
        },
        SensorSpec {
            id: SensorId(4),
            name: "Main board sensor (switch far)".into(),
            kind: SensorKind::Remote {
                bus: 2,
                addr: 0x4F,
                register: 0x00,
                multiplier: MILLI_PER_UNIT,
            },
        },
        SensorSpec {
            id: SensorId(5),
            name: "PSU 1 internal sensor".into(),
            kind: SensorKind::Remote {
                bus: 2,
                addr: 0x58,
                register: 0x8D,
                multiplier: MILLI_PER_UNIT,
            },
        },
        SensorSpec {
            id: SensorId(6),
            name: "PSU 2 internal sensor".into(),
            kind: SensorKind::Remote {
                bus: 2,
                addr: 0x59,
                register: 0x8D,
                multiplier: MILLI_PER_UNIT,
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_table_ids_are_unique() {
        let sensors = platform_sensors();
        let mut ids: Vec<u32> = sensors.iter().map(|s| s.id.0).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), sensors.len());
    }

    #[test]
    fn test_cpu_sensor_has_candidate_files() {
        let sensors = platform_sensors();
        match &sensors[0].kind {
            SensorKind::Local { candidates } => assert_eq!(candidates.len(), 9),
            other => panic!("expected local CPU sensor, got {other:?}"),
        }
    }
}
