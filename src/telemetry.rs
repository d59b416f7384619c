//! Reporting of the exposed attribute surface.
//!
//! The core does not own a transport; whatever exposes attributes
//! serializes a [`Report`] produced by
//! [`Device::report`](crate::device::Device::report) on demand.

use serde::Serialize;

use crate::device::State;
use crate::estimator::{Quality, Samples};

/// Snapshot of one device's observable state.
#[derive(Copy, Clone, Debug, Serialize)]
pub struct Report {
    /// Most recent anode dissipation estimate, kW.
    pub anode_power: f64,
    /// Most recent RF output power estimate, kW.
    pub rf_power: f64,
    /// Validity of both power fields.
    pub quality: Quality,
    /// Configured interlock limit, kW.
    pub power_limit: f64,
    /// Device lifecycle state.
    pub state: State,
    /// Scaled samples of the last acquisition, for diagnostics.
    pub samples: Samples,
}
