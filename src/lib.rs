//! Anode dissipation estimator and RF pulse interlock for high-power
//! tetrode amplifiers.
//!
//! Six scaled instrumentation readings (anode current and voltage, RF
//! anode voltage amplitude, cathode and screen grid currents, grid
//! drive) feed a class-C conduction-angle model of the power dissipated
//! in the tube anode. A periodic monitor re-estimates the power of
//! every managed amplifier and, when a configured limit is exceeded,
//! disables the RF enable outputs of the timing device.
//!
//! Transport to the external instrumentation is out of scope here: the
//! core is generic over the capability traits in [`interface`], with
//! one adapter per deployment.

pub mod channel;
pub mod device;
pub mod estimator;
pub mod interface;
pub mod monitor;
pub mod settings;
pub mod telemetry;

#[cfg(test)]
pub mod testing;

pub use channel::{resolve_scale, Channel, Scales};
pub use device::{Device, EstimateError, ShutdownReport, State};
pub use estimator::{estimate, ComputeError, PowerEstimate, Quality, Samples};
pub use interface::{AnalogSource, ConfigStore, TimingDevice};
pub use monitor::{Monitor, Registry, Sleep};
pub use settings::Settings;
pub use telemetry::Report;
