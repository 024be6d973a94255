//! Switchboard Telemetry
//!
//! Thermal sensor reads for the platform. Sensors are statically classified
//! as either **local** (host-exposed numeric files, read directly) or
//! **remote** (resident on the management controller, read through the
//! shared [`ControllerChannel`](swb_bmc::ControllerChannel) and scaled into
//! milli-units).
//!
//! A remote reading of zero is reported as untrustworthy rather than as a
//! temperature — a powered sensor on this platform never legitimately
//! reads exactly zero.

pub mod error;
pub mod reader;
pub mod sensor;

pub use error::TelemetryError;
pub use reader::{read_int_max, SensorReader};
pub use sensor::{platform_sensors, Milli, SensorId, SensorKind, SensorSpec, MILLI_PER_UNIT};
