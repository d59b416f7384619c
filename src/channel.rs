//! The six instrumentation channels of one amplifier and their scale
//! coefficients.

use serde::{Deserialize, Serialize};

use crate::interface::AnalogSource;

/// Logical instrumentation channels, in the fixed acquisition order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    /// Anode (plate) current
    Ia,
    /// Anode supply voltage
    Ea,
    /// Anode RF voltage amplitude
    Ua,
    /// Cathode current
    Ic,
    /// Screen grid current
    Iscr,
    /// Control grid drive voltage
    Ug1,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::Ia,
        Channel::Ea,
        Channel::Ua,
        Channel::Ic,
        Channel::Iscr,
        Channel::Ug1,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Channel::Ia => "ia",
            Channel::Ea => "ea",
            Channel::Ua => "ua",
            Channel::Ic => "ic",
            Channel::Iscr => "iscr",
            Channel::Ug1 => "ug1",
        }
    }

    /// Default attribute name of the channel on the analog source.
    pub fn default_binding(&self) -> &'static str {
        match self {
            Channel::Ia => "chan1",
            Channel::Ea => "chan2",
            Channel::Ua => "chan3",
            Channel::Ic => "chan4",
            Channel::Iscr => "chan5",
            Channel::Ug1 => "chan6",
        }
    }
}

/// Per-channel scale coefficients resolved from source metadata.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scales([f64; 6]);

impl Default for Scales {
    fn default() -> Self {
        Self([1.0; 6])
    }
}

impl core::ops::Index<Channel> for Scales {
    type Output = f64;

    fn index(&self, ch: Channel) -> &f64 {
        &self.0[ch as usize]
    }
}

impl core::ops::IndexMut<Channel> for Scales {
    fn index_mut(&mut self, ch: Channel) -> &mut f64 {
        &mut self.0[ch as usize]
    }
}

/// Resolve the scale coefficient of one channel binding.
///
/// The coefficient is the numeric `display_unit` of the channel's
/// attribute metadata. A missing or non-numeric field, or a failed
/// metadata query, degrades to unscaled readings (1.0) rather than
/// failing the device.
pub fn resolve_scale<A: AnalogSource>(source: &mut A, name: &str) -> f64 {
    let unit = match source.attribute_info(name) {
        Ok(info) => info.display_unit,
        Err(e) => {
            log::debug!("{name}: no attribute metadata ({e:?}), scale 1.0");
            return 1.0;
        }
    };
    unit.parse().unwrap_or_else(|_| {
        log::debug!("{name}: display_unit {unit:?} is not a coefficient, scale 1.0");
        1.0
    })
}
