//! Capability interfaces to the external devices the core drives.
//!
//! The core never speaks a wire protocol. A deployment supplies one
//! adapter per transport implementing these traits; devices and the
//! monitor depend only on the interface.
//!
//! None of these calls carry a timeout in the core: the monitor tick
//! blocks for their duration. Adapters are expected to bound the
//! duration of every call themselves.

use heapless::String;

/// Attribute metadata reported by the analog source for one channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeInfo {
    /// Display unit of the channel. By site convention this holds the
    /// stringified scale coefficient (e.g. `"0.001"`), not a unit name.
    pub display_unit: String<32>,
}

/// Source of the scaled instrumentation samples, keyed by channel name.
pub trait AnalogSource {
    type Error: core::fmt::Debug;

    /// Fetch attribute metadata for a named channel.
    fn attribute_info(&mut self, name: &str) -> Result<AttributeInfo, Self::Error>;

    /// Read the current raw sample of a named channel.
    fn read(&mut self, name: &str) -> Result<f64, Self::Error>;
}

/// Trigger generator whose enable outputs gate the RF drive.
pub trait TimingDevice {
    type Error: core::fmt::Debug;

    /// Enable or disable one trigger output.
    fn set_channel_enable(&mut self, index: u8, enabled: bool) -> Result<(), Self::Error>;
}

/// Persistent store for per-device numeric configuration values.
pub trait ConfigStore {
    type Error: core::fmt::Debug;

    /// Look up a stored value, `None` if the key has never been set.
    fn get(&mut self, key: &str) -> Result<Option<f64>, Self::Error>;

    /// Store `value` under `key`.
    fn set(&mut self, key: &str, value: f64) -> Result<(), Self::Error>;
}
